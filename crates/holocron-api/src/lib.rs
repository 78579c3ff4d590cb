//! Typed async client for the galaxy archive REST API.
//!
//! The archive exposes six entity collections (people, films, planets,
//! species, starships, vehicles), each with a paginated listing endpoint
//! (`/<kind>/?page=<n>`) and an item endpoint (`/<kind>/<id>/`). Entities
//! cross-reference each other via absolute URLs, which this crate treats as
//! opaque reference tokens: fetchable locators that double as identifiers.
//!
//! The fetch seam is the [`GalaxyApi`] trait; [`GalaxyClient`] implements it
//! over reqwest. Listing and lookup failures are wrapped with operation
//! context (`Cannot fetch <kind>[ <id>]: <cause>`) and surfaced to the
//! caller. There is no retry, caching, or fallback: one operation, one
//! request.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{GalaxyApi, GalaxyClient};
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use models::{
    Character, Film, Kind, Page, Planet, ResourceUrl, Species, Starship, UnknownKind, Vehicle,
};
