//! Character relation aggregation.
//!
//! Resolves the object graph around one character, one hop at a time:
//!
//! ```text
//!   character ──films──► Film ──starships ∩ character.starships──► Starship
//! ```
//!
//! Every referenced film is fetched; per film, only the starship tokens
//! present in both the film's and the character's reference sets are fetched.
//! Each hop is a single ordered buffered stream, so at most
//! [`DetailOptions::max_in_flight`] requests are in flight at any moment, and
//! joins are all-or-nothing: the first failure aborts the aggregation and
//! drops the remaining in-flight requests.

use futures::stream::{self, StreamExt, TryStreamExt};
use holocron_api::{ApiError, Character, Film, GalaxyApi, ResourceUrl, Starship};

/// Knobs for relation fan-out.
#[derive(Debug, Clone)]
pub struct DetailOptions {
    /// Cap on simultaneous outbound requests.
    pub max_in_flight: usize,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self { max_in_flight: 8 }
    }
}

impl From<&holocron_api::ApiConfig> for DetailOptions {
    fn from(config: &holocron_api::ApiConfig) -> Self {
        Self {
            max_in_flight: config.max_in_flight,
        }
    }
}

/// A film paired with the character's starships that appear in it, in the
/// film's own reference order.
#[derive(Debug, Clone)]
pub struct FilmWithStarships {
    pub film: Film,
    pub starships: Vec<Starship>,
}

/// Aggregation result: the character plus one entry per referenced film, in
/// the character's reference order.
#[derive(Debug, Clone)]
pub struct CharacterDetails {
    pub character: Character,
    pub films: Vec<FilmWithStarships>,
}

/// Resolve a character's films and the starships shared with each film.
///
/// Returns the first fetch error unchanged; callers that want the historic
/// swallow-and-continue behavior use [`resolve_details_lenient`].
pub async fn resolve_details<A: GalaxyApi>(
    api: &A,
    character: &Character,
    options: &DetailOptions,
) -> Result<CharacterDetails, ApiError> {
    let limit = options.max_in_flight.max(1);

    let films: Vec<Film> = stream::iter(character.films.iter())
        .map(|token| api.resolve::<Film>(token))
        .buffered(limit)
        .try_collect()
        .await?;

    // Every (film, shared starship) pair, in film order and then the film's
    // own reference order, fetched through one bounded stream so the cap
    // holds across films rather than per film.
    let mut pairs: Vec<(usize, ResourceUrl)> = Vec::new();
    for (index, film) in films.iter().enumerate() {
        for token in &film.starships {
            if character.starships.contains(token) {
                pairs.push((index, token.clone()));
            }
        }
    }

    let fetched: Vec<(usize, Starship)> = stream::iter(pairs.iter())
        .map(|(index, token)| async move {
            let starship = api.resolve::<Starship>(token).await?;
            Ok::<_, ApiError>((*index, starship))
        })
        .buffered(limit)
        .try_collect()
        .await?;

    let mut films: Vec<FilmWithStarships> = films
        .into_iter()
        .map(|film| FilmWithStarships {
            film,
            starships: Vec::new(),
        })
        .collect();
    for (index, starship) in fetched {
        films[index].starships.push(starship);
    }

    Ok(CharacterDetails {
        character: character.clone(),
        films,
    })
}

/// Fail-soft variant: on any fetch error, record it and hand back the
/// character with an empty film list instead of failing.
///
/// An empty film list is therefore ambiguous between "no relations" and
/// "fetch failed"; the emitted error event is the side channel that tells
/// them apart.
pub async fn resolve_details_lenient<A: GalaxyApi>(
    api: &A,
    character: &Character,
    options: &DetailOptions,
) -> CharacterDetails {
    match resolve_details(api, character, options).await {
        Ok(details) => details,
        Err(error) => {
            tracing::error!(character = %character.name, %error, "failed to resolve character relations");
            CharacterDetails {
                character: character.clone(),
                films: Vec::new(),
            }
        }
    }
}
