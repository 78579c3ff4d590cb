//! Projection of aggregated relations into a node/edge graph.
//!
//! The output carries only id/label/position semantics and is the sole
//! contract with whatever surface renders it (JSON for custom frontends,
//! DOT for external layout tooling, SVG for an offline snapshot).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::details::CharacterDetails;

// Layout grid: films fan out to the right of the character, starships hang
// below their film column.
const COLUMN_STEP: f32 = 200.0;
const FILM_ROW: f32 = 100.0;
const STARSHIP_ROW: f32 = 250.0;
const STARSHIP_X_STEP: f32 = 100.0;
const STARSHIP_Y_STEP: f32 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Derive the relation graph for one character.
///
/// Pure and total: identical input yields identical node and edge sequences.
/// Node ids are synthesized as `character-<name>`, `film-<episodeId>` and
/// `starship-<episodeId>-<name>`; the starship id embeds the owning film's
/// episode id because the same starship name may recur across films and must
/// stay a distinct node per film. Repeats of one episode id in the input are
/// an input-validity precondition, not defended against beyond a warning.
pub fn project_graph(details: &CharacterDetails) -> RelationGraph {
    let character = &details.character;
    let character_id = format!("character-{}", character.name);

    let mut nodes = Vec::with_capacity(1 + details.films.len());
    let mut edges = Vec::new();

    nodes.push(GraphNode {
        id: character_id.clone(),
        label: character.name.clone(),
        x: 0.0,
        y: 0.0,
    });

    let mut seen_episodes = HashSet::new();

    for (i, entry) in details.films.iter().enumerate() {
        let film = &entry.film;
        if !seen_episodes.insert(film.episode_id) {
            tracing::warn!(
                episode_id = film.episode_id,
                "duplicate episode id in film sequence; node ids will collide"
            );
        }

        let film_id = format!("film-{}", film.episode_id);
        let column = (i as f32 + 1.0) * COLUMN_STEP;

        nodes.push(GraphNode {
            id: film_id.clone(),
            label: film.title.clone(),
            x: column,
            y: FILM_ROW,
        });
        edges.push(GraphEdge {
            id: format!("character-film-{}", film.episode_id),
            source: character_id.clone(),
            target: film_id.clone(),
        });

        for (j, starship) in entry.starships.iter().enumerate() {
            let starship_id = format!("starship-{}-{}", film.episode_id, starship.name);
            nodes.push(GraphNode {
                id: starship_id.clone(),
                label: starship.name.clone(),
                x: column + j as f32 * STARSHIP_X_STEP,
                y: STARSHIP_ROW + j as f32 * STARSHIP_Y_STEP,
            });
            edges.push(GraphEdge {
                id: format!("film-starship-{}-{}", film.episode_id, starship.name),
                source: film_id.clone(),
                target: starship_id,
            });
        }
    }

    RelationGraph { nodes, edges }
}
