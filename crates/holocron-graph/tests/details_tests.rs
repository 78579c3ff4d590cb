//! Aggregation tests against a recording fake archive.
//!
//! These pin the fetch discipline: every referenced film is fetched exactly
//! once, starships are fetched only when referenced by both the film and the
//! character, ordering is preserved, and a single failure collapses the whole
//! aggregation.

use async_trait::async_trait;
use holocron_api::{ApiError, Character, Film, GalaxyApi, Starship};
use holocron_graph::{resolve_details, resolve_details_lenient, DetailOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// Fake archive
// ============================================================================

struct FakeArchive {
    responses: HashMap<String, serde_json::Value>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeArchive {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    fn with_film(mut self, url: &str, film: &Film) -> Self {
        self.responses
            .insert(url.to_string(), serde_json::to_value(film).unwrap());
        self
    }

    fn with_starship(mut self, url: &str, starship: &Starship) -> Self {
        self.responses
            .insert(url.to_string(), serde_json::to_value(starship).unwrap());
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn request_count(&self, url: &str) -> usize {
        self.requested().iter().filter(|r| *r == url).count()
    }

    fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GalaxyApi for FakeArchive {
    fn base_url(&self) -> &str {
        "https://galaxy.test/api"
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, ApiError> {
        self.requests.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        // Stay in flight across a poll so overlapping requests are observable.
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                url: url.to_string(),
                message: "not found".to_string(),
            })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn character(name: &str, films: &[&str], starships: &[&str]) -> Character {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "films": films,
        "starships": starships,
    }))
    .unwrap()
}

fn film(title: &str, episode_id: u64, starships: &[&str]) -> Film {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "episode_id": episode_id,
        "starships": starships,
    }))
    .unwrap()
}

fn starship(name: &str) -> Starship {
    serde_json::from_value(serde_json::json!({ "name": name })).unwrap()
}

const FILM_1: &str = "https://galaxy.test/api/films/1/";
const FILM_2: &str = "https://galaxy.test/api/films/2/";
const SHIP_12: &str = "https://galaxy.test/api/starships/12/";
const SHIP_13: &str = "https://galaxy.test/api/starships/13/";
const SHIP_22: &str = "https://galaxy.test/api/starships/22/";

// ============================================================================
// Fetch discipline
// ============================================================================

#[tokio::test]
async fn fetches_each_film_once_and_only_shared_starships() {
    let api = FakeArchive::new()
        .with_film(FILM_1, &film("A New Hope", 4, &[SHIP_12, SHIP_13]))
        .with_film(FILM_2, &film("The Empire Strikes Back", 5, &[SHIP_22]))
        .with_starship(SHIP_12, &starship("X-wing"));
    // Luke references ship 12 and ship 22, but only film 1 shares one of them.
    let luke = character("Luke Skywalker", &[FILM_1, FILM_2], &[SHIP_12]);

    let details = resolve_details(&api, &luke, &DetailOptions::default())
        .await
        .unwrap();

    assert_eq!(details.films.len(), 2);
    assert_eq!(details.films[0].film.title, "A New Hope");
    assert_eq!(details.films[0].starships.len(), 1);
    assert_eq!(details.films[0].starships[0].name, "X-wing");
    assert!(details.films[1].starships.is_empty());

    assert_eq!(api.request_count(FILM_1), 1);
    assert_eq!(api.request_count(FILM_2), 1);
    assert_eq!(api.request_count(SHIP_12), 1);
    // Ship 13 is in the film but not the character's set; ship 22 belongs to
    // a film that shares nothing. Neither is ever requested.
    assert_eq!(api.request_count(SHIP_13), 0);
    assert_eq!(api.request_count(SHIP_22), 0);
    assert_eq!(api.requested().len(), 3);
}

#[tokio::test]
async fn starship_fetch_count_is_the_intersection_size_not_the_reference_count() {
    let api = FakeArchive::new()
        .with_film(FILM_1, &film("A New Hope", 4, &[SHIP_13]))
        .with_film(FILM_2, &film("The Empire Strikes Back", 5, &[SHIP_13]));
    // Two starship references on the character, zero shared with any film.
    let pilot = character("Biggs Darklighter", &[FILM_1, FILM_2], &[SHIP_12, SHIP_22]);

    let details = resolve_details(&api, &pilot, &DetailOptions::default())
        .await
        .unwrap();

    assert!(details.films.iter().all(|f| f.starships.is_empty()));
    assert_eq!(api.requested().len(), 2, "only the two film fetches");
}

#[tokio::test]
async fn film_order_follows_the_character_and_ship_order_follows_the_film() {
    let api = FakeArchive::new()
        .with_film(FILM_2, &film("The Empire Strikes Back", 5, &[]))
        // The film lists 13 before 12; the character lists them reversed.
        .with_film(FILM_1, &film("A New Hope", 4, &[SHIP_13, SHIP_12]))
        .with_starship(SHIP_12, &starship("X-wing"))
        .with_starship(SHIP_13, &starship("TIE Advanced x1"));
    let ace = character("Wedge Antilles", &[FILM_2, FILM_1], &[SHIP_12, SHIP_13]);

    let details = resolve_details(&api, &ace, &DetailOptions::default())
        .await
        .unwrap();

    let titles: Vec<&str> = details
        .films
        .iter()
        .map(|f| f.film.title.as_str())
        .collect();
    assert_eq!(titles, ["The Empire Strikes Back", "A New Hope"]);

    let ships: Vec<&str> = details.films[1]
        .starships
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(ships, ["TIE Advanced x1", "X-wing"]);
}

#[tokio::test]
async fn empty_reference_lists_resolve_without_any_request() {
    let api = FakeArchive::new();
    let droid = character("R2-D2", &[], &[]);

    let details = resolve_details(&api, &droid, &DetailOptions::default())
        .await
        .unwrap();

    assert!(details.films.is_empty());
    assert!(api.requested().is_empty());
}

// ============================================================================
// Failure contracts
// ============================================================================

#[tokio::test]
async fn strict_resolution_surfaces_the_failed_fetch() {
    // Film 2 has no canned response, so its fetch 404s.
    let api = FakeArchive::new().with_film(FILM_1, &film("A New Hope", 4, &[]));
    let luke = character("Luke Skywalker", &[FILM_1, FILM_2], &[]);

    let err = resolve_details(&api, &luke, &DetailOptions::default())
        .await
        .unwrap_err();

    let rendered = err.to_string();
    assert!(rendered.contains(FILM_2), "{rendered}");
    assert!(rendered.contains("404"), "{rendered}");
}

#[tokio::test]
async fn lenient_resolution_swallows_the_failure_into_an_empty_film_list() {
    let api = FakeArchive::new()
        .with_film(FILM_1, &film("A New Hope", 4, &[SHIP_12]))
        .with_film(FILM_2, &film("The Empire Strikes Back", 5, &[]));
    // Ship 12 is shared but has no canned response: the starship hop fails.
    let luke = character("Luke Skywalker", &[FILM_1, FILM_2], &[SHIP_12]);

    let details = resolve_details_lenient(&api, &luke, &DetailOptions::default()).await;

    assert_eq!(details.character.name, "Luke Skywalker");
    assert!(details.films.is_empty(), "no partial result on failure");
}

#[tokio::test]
async fn the_in_flight_cap_bounds_requests_across_films_not_per_film() {
    const FILM_3: &str = "https://galaxy.test/api/films/3/";

    // Three films, each sharing two starships with the character: six
    // starship fetches that must all squeeze through the same cap.
    let api = FakeArchive::new()
        .with_film(FILM_1, &film("A New Hope", 4, &[SHIP_12, SHIP_13]))
        .with_film(FILM_2, &film("The Empire Strikes Back", 5, &[SHIP_12, SHIP_13]))
        .with_film(FILM_3, &film("Return of the Jedi", 6, &[SHIP_12, SHIP_13]))
        .with_starship(SHIP_12, &starship("X-wing"))
        .with_starship(SHIP_13, &starship("TIE Advanced x1"));
    let luke = character(
        "Luke Skywalker",
        &[FILM_1, FILM_2, FILM_3],
        &[SHIP_12, SHIP_13],
    );

    let options = DetailOptions { max_in_flight: 2 };
    let details = resolve_details(&api, &luke, &options).await.unwrap();

    assert_eq!(details.films.len(), 3);
    assert!(details.films.iter().all(|f| f.starships.len() == 2));
    assert!(
        api.peak_in_flight() >= 2,
        "fan-out should actually overlap requests"
    );
    assert!(
        api.peak_in_flight() <= options.max_in_flight,
        "cap exceeded: {} requests in flight",
        api.peak_in_flight()
    );
}

#[tokio::test]
async fn a_single_in_flight_cap_still_resolves_everything() {
    let api = FakeArchive::new()
        .with_film(FILM_1, &film("A New Hope", 4, &[SHIP_12]))
        .with_film(FILM_2, &film("The Empire Strikes Back", 5, &[SHIP_12]))
        .with_starship(SHIP_12, &starship("X-wing"));
    let luke = character("Luke Skywalker", &[FILM_1, FILM_2], &[SHIP_12]);

    let options = DetailOptions { max_in_flight: 1 };
    let details = resolve_details(&api, &luke, &options).await.unwrap();

    assert_eq!(details.films.len(), 2);
    assert_eq!(details.films[0].starships[0].name, "X-wing");
    assert_eq!(details.films[1].starships[0].name, "X-wing");
    assert_eq!(api.request_count(SHIP_12), 2, "one fetch per film pairing");
}
