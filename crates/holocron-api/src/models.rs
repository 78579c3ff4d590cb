//! Wire models for the galaxy archive API.
//!
//! Entities cross-reference each other through absolute URLs embedded as
//! string fields. Those URLs are kept opaque ([`ResourceUrl`]): they are both
//! the fetch target for detail resolution and the identity used when
//! intersecting reference sets (exact string equality, no normalization).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Reference tokens
// ============================================================================

/// An opaque reference token: locates and identifies a related entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUrl(pub String);

impl ResourceUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceUrl {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ResourceUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Entity kinds
// ============================================================================

/// The six entity collections the archive exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    People,
    Films,
    Planets,
    Species,
    Starships,
    Vehicles,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::People,
        Kind::Films,
        Kind::Planets,
        Kind::Species,
        Kind::Starships,
        Kind::Vehicles,
    ];

    /// Collection path segment, e.g. `people` in `/people/?page=1`.
    pub fn path(self) -> &'static str {
        match self {
            Kind::People => "people",
            Kind::Films => "films",
            Kind::Planets => "planets",
            Kind::Species => "species",
            Kind::Starships => "starships",
            Kind::Vehicles => "vehicles",
        }
    }

    /// Plural label used in collection error context.
    pub fn plural(self) -> &'static str {
        match self {
            Kind::People => "characters",
            Kind::Films => "films",
            Kind::Planets => "planets",
            Kind::Species => "species",
            Kind::Starships => "starships",
            Kind::Vehicles => "vehicles",
        }
    }

    /// Singular label used in per-resource error context.
    pub fn singular(self) -> &'static str {
        match self {
            Kind::People => "character",
            Kind::Films => "film",
            Kind::Planets => "planet",
            Kind::Species => "species",
            Kind::Starships => "starship",
            Kind::Vehicles => "vehicle",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown entity kind `{0}` (expected people|films|planets|species|starships|vehicles)")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "people" | "characters" | "heroes" => Ok(Kind::People),
            "films" => Ok(Kind::Films),
            "planets" => Ok(Kind::Planets),
            "species" => Ok(Kind::Species),
            "starships" => Ok(Kind::Starships),
            "vehicles" => Ok(Kind::Vehicles),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

// ============================================================================
// Paginated envelope
// ============================================================================

/// One page of a collection, decoded verbatim from the API.
///
/// `next`/`previous` are the server's own page URLs and are passed through
/// untouched so callers can page without reconstructing query strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

// ============================================================================
// Entities
// ============================================================================

/// A person. The archive serializes numeric-ish fields (height, mass) as
/// strings, including sentinel values like `"unknown"`; they are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub mass: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub homeworld: Option<ResourceUrl>,
    #[serde(default)]
    pub films: Vec<ResourceUrl>,
    #[serde(default)]
    pub species: Vec<ResourceUrl>,
    #[serde(default)]
    pub vehicles: Vec<ResourceUrl>,
    #[serde(default)]
    pub starships: Vec<ResourceUrl>,
    #[serde(default)]
    pub url: Option<ResourceUrl>,
}

/// A film. `episode_id` is unique across the saga and serves as the
/// display/grouping key for graph projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    pub episode_id: u64,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub characters: Vec<ResourceUrl>,
    #[serde(default)]
    pub planets: Vec<ResourceUrl>,
    #[serde(default)]
    pub starships: Vec<ResourceUrl>,
    #[serde(default)]
    pub url: Option<ResourceUrl>,
}

/// A starship. Names are not globally unique; graph projection scopes them
/// per film.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Starship {
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub starship_class: String,
    #[serde(default)]
    pub url: Option<ResourceUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    #[serde(default)]
    pub climate: String,
    #[serde(default)]
    pub terrain: String,
    #[serde(default)]
    pub population: String,
    #[serde(default)]
    pub url: Option<ResourceUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub url: Option<ResourceUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub vehicle_class: String,
    #[serde(default)]
    pub url: Option<ResourceUrl>,
}
