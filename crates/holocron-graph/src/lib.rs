//! Relation aggregation and graph projection for the galaxy archive.
//!
//! ```text
//!   list/lookup (holocron-api)
//!        │ select a character
//!        ▼
//!   resolve_details ── bounded fan-out over films, then shared starships
//!        │
//!        ▼
//!   project_graph ──► RelationGraph { nodes, edges } ──► rendering surface
//! ```
//!
//! The aggregator is network-bound and returns a typed error on the first
//! failed fetch (with a fail-soft wrapper for the swallow-and-log contract);
//! the projector is a pure function from aggregated relations to a
//! deterministic node/edge list.

pub mod details;
pub mod graph;

pub use details::{
    resolve_details, resolve_details_lenient, CharacterDetails, DetailOptions, FilmWithStarships,
};
pub use graph::{project_graph, GraphEdge, GraphNode, RelationGraph};
