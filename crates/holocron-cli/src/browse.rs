//! Interactive collection browser.
//!
//! Pagination and selection are modeled as an explicit state value plus a
//! pure reducer over browse events; the surrounding loop only reads input,
//! performs fetches, and prints. Page navigation outside `1..=total_pages`
//! and events that arrive mid-load are ignored rather than queued. `Quit`
//! moves the state to [`Status::Closed`], the terminal state the loop exits
//! on.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

use holocron_api::{Character, GalaxyApi, GalaxyClient, Kind, ResourceUrl};
use holocron_graph::{project_graph, resolve_details, DetailOptions};

use crate::{fetch_page, PageItem};

/// Collection page size used by the archive.
pub const PAGE_SIZE: u64 = 10;

pub fn page_count(count: u64) -> u32 {
    count.div_ceil(PAGE_SIZE).max(1) as u32
}

// ============================================================================
// State and reducer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Loading,
    Ready,
    Failed(String),
    /// Terminal: the browser session is over and no further event applies.
    Closed,
}

#[derive(Debug, Clone)]
pub struct BrowseState {
    pub kind: Kind,
    pub page: u32,
    pub total_pages: u32,
    pub status: Status,
    pub entries: Vec<String>,
    pub selected: Option<usize>,
}

impl BrowseState {
    pub fn new(kind: Kind, page: u32) -> Self {
        Self {
            kind,
            page: page.max(1),
            total_pages: 1,
            status: Status::Loading,
            entries: Vec::new(),
            selected: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BrowseEvent {
    PageLoaded { count: u64, entries: Vec<String> },
    LoadFailed(String),
    Next,
    Prev,
    Goto(u32),
    Select(usize),
    CloseDetail,
    Quit,
}

/// Pure transition function; unknown or out-of-range requests leave the
/// state untouched, and a closed state absorbs everything.
pub fn reduce(state: BrowseState, event: BrowseEvent) -> BrowseState {
    let mut state = state;
    if state.status == Status::Closed {
        return state;
    }
    match event {
        BrowseEvent::PageLoaded { count, entries } => {
            state.total_pages = page_count(count);
            state.entries = entries;
            state.status = Status::Ready;
            state.selected = None;
        }
        BrowseEvent::LoadFailed(message) => {
            // Previous entries stay visible; the failure is shown alongside.
            state.status = Status::Failed(message);
            state.selected = None;
        }
        BrowseEvent::Next => return goto(state, |page| page + 1),
        BrowseEvent::Prev => return goto(state, |page| page.saturating_sub(1)),
        BrowseEvent::Goto(page) => return goto(state, |_| page),
        BrowseEvent::Select(index) => {
            if state.status == Status::Ready && index < state.entries.len() {
                state.selected = Some(index);
            }
        }
        BrowseEvent::CloseDetail => {
            state.selected = None;
        }
        BrowseEvent::Quit => {
            state.status = Status::Closed;
            state.selected = None;
        }
    }
    state
}

fn goto(mut state: BrowseState, target: impl Fn(u32) -> u32) -> BrowseState {
    if state.status == Status::Loading {
        return state;
    }
    let page = target(state.page);
    if page < 1 || page > state.total_pages || page == state.page {
        return state;
    }
    state.page = page;
    state.status = Status::Loading;
    state.selected = None;
    state
}

// ============================================================================
// Interactive loop
// ============================================================================

enum Command {
    Event(BrowseEvent),
    Help,
}

fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["n"] | ["next"] => Some(Command::Event(BrowseEvent::Next)),
        ["p"] | ["prev"] => Some(Command::Event(BrowseEvent::Prev)),
        ["g", n] | ["goto", n] => n.parse().ok().map(|p| Command::Event(BrowseEvent::Goto(p))),
        ["o", n] | ["open", n] => n
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| Command::Event(BrowseEvent::Select(n - 1))),
        ["h"] | ["help"] | ["?"] => Some(Command::Help),
        ["q"] | ["quit"] | ["exit"] => Some(Command::Event(BrowseEvent::Quit)),
        _ => None,
    }
}

fn print_help() {
    println!("  n / next        next page");
    println!("  p / prev        previous page");
    println!("  g / goto <N>    jump to page N");
    println!("  o / open <N>    open entry N of the current page");
    println!("  q / quit        leave the browser");
}

fn render_page(state: &BrowseState) {
    match &state.status {
        Status::Closed => {}
        Status::Loading => println!("{}", "loading...".dimmed()),
        Status::Failed(message) => {
            eprintln!("{} {message}", "error:".red().bold());
        }
        Status::Ready => {
            println!(
                "{} (page {}/{})",
                state.kind.plural().green().bold(),
                state.page,
                state.total_pages
            );
            for (i, entry) in state.entries.iter().enumerate() {
                println!("  {:>2}. {entry}", i + 1);
            }
        }
    }
}

pub async fn cmd_browse(client: &GalaxyClient, kind: Kind, page: u32) -> Result<()> {
    let mut state = BrowseState::new(kind, page);
    let mut items: Vec<PageItem> = Vec::new();

    println!("{}", "Holocron browser".green().bold());
    println!("Type `help` for commands. Type `quit` to leave.\n");

    state = load(client, state, &mut items).await;
    render_page(&state);

    let stdin = io::stdin();
    loop {
        print!("{}", format!("{}> ", state.kind.path()).cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match parse_command(line) {
            Some(Command::Help) => {
                print_help();
                continue;
            }
            Some(Command::Event(event)) => event,
            None => {
                eprintln!("{} unknown command `{line}` (try `help`)", "error:".red().bold());
                continue;
            }
        };

        state = reduce(state, event);

        if state.status == Status::Closed {
            break;
        } else if state.status == Status::Loading {
            state = load(client, state, &mut items).await;
            render_page(&state);
        } else if let Some(index) = state.selected {
            if let Err(e) = show_detail(client, state.kind, items.get(index)).await {
                eprintln!("{} {e}", "error:".red().bold());
            }
            state = reduce(state, BrowseEvent::CloseDetail);
        } else {
            render_page(&state);
        }
    }

    Ok(())
}

async fn load(client: &GalaxyClient, state: BrowseState, items: &mut Vec<PageItem>) -> BrowseState {
    match fetch_page(client, state.kind, state.page).await {
        Ok((count, page_items)) => {
            let entries = page_items.iter().map(|item| item.label.clone()).collect();
            *items = page_items;
            reduce(state, BrowseEvent::PageLoaded { count, entries })
        }
        Err(e) => reduce(state, BrowseEvent::LoadFailed(e.to_string())),
    }
}

/// Detail view for a selected entry. Characters get the full relation
/// treatment (films + shared starships + graph size); other kinds print the
/// resolved entity.
async fn show_detail(client: &GalaxyClient, kind: Kind, item: Option<&PageItem>) -> Result<()> {
    let Some(item) = item else {
        return Ok(());
    };
    let Some(url) = &item.url else {
        println!("{}", item.label.bold());
        return Ok(());
    };

    if kind == Kind::People {
        let character: Character = client.resolve(url).await?;
        let details =
            resolve_details(client, &character, &DetailOptions::from(client.config())).await?;
        let graph = project_graph(&details);

        println!("{}", character.name.bold());
        for entry in &details.films {
            println!(
                "  {} (episode {})",
                entry.film.title.yellow(),
                entry.film.episode_id
            );
            for starship in &entry.starships {
                println!("    {}", starship.name);
            }
        }
        println!(
            "{}",
            format!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len()).dimmed()
        );
    } else {
        let value = fetch_detail(client, url).await?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}

async fn fetch_detail(
    client: &GalaxyClient,
    url: &ResourceUrl,
) -> Result<serde_json::Value, holocron_api::ApiError> {
    client.fetch_json(url.as_str()).await
}
