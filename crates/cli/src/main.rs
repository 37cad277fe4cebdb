use anyhow::{Context, Result, anyhow};
use catalog::{
    CatalogClient, Movie, MovieDetails, MovieId, ProviderEntry, RegionProviders, ThreadRandom,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use filters::FilterSpec;
use selection::{
    Disposition, Shortlist, StorePoller, VoteConfig, VoteRecord, VoteSession, VoteSubscription,
    VoteToggle, new_session_id, rank, take_pending_picks, voter_token,
};
use session::state::{DEFAULT_JOURNAL_CAPACITY, DEFAULT_SWIPE_CAP};
use session::{
    CatalogFetcher, Favorites, Phase, SessionConfig, SessionDriver, SwipeDirection, SwipeJournal,
};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use store::{JsonFileStore, KvStore};

/// ReelSwipe - Tinder-style movie discovery
#[derive(Parser)]
#[command(name = "reel-swipe")]
#[command(about = "Swipe through movies, shortlist keepers, vote with friends", long_about = None)]
struct Cli {
    /// Path to the JSON state store (defaults to the platform data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive swipe session
    Swipe {
        /// Genre name or id to include (repeatable)
        #[arg(long = "genre")]
        genres: Vec<String>,

        /// Longest acceptable runtime in minutes
        #[arg(long)]
        max_runtime: Option<u32>,

        /// Earliest release year to include
        #[arg(long)]
        year_from: Option<u16>,

        /// Latest release year to include
        #[arg(long)]
        year_to: Option<u16>,

        /// Streaming service name or id to include (repeatable)
        #[arg(long = "provider")]
        providers: Vec<String>,

        /// Decisive swipes before the session completes
        #[arg(long, default_value_t = DEFAULT_SWIPE_CAP)]
        cap: u32,
    },

    /// Manage the shortlist of kept movies
    Shortlist {
        #[command(subcommand)]
        action: ShortlistAction,
    },

    /// Run a group vote over shortlisted movies
    Vote {
        #[command(subcommand)]
        action: VoteAction,
    },

    /// List favorited movies
    Favorites,

    /// Show swipe statistics
    Stats,

    /// List selectable genres
    Genres,

    /// List selectable streaming services
    Providers,

    /// Show full details for one movie
    Details {
        /// Movie id as shown in lists
        #[arg(long)]
        movie_id: MovieId,
    },
}

#[derive(Subcommand)]
enum ShortlistAction {
    /// Show all shortlisted movies
    List,

    /// Mark a shortlisted movie as watched
    Watched {
        /// Movie id as shown in the list
        #[arg(long)]
        movie_id: MovieId,
    },

    /// Remove a movie from the shortlist
    Remove {
        /// Movie id as shown in the list
        #[arg(long)]
        movie_id: MovieId,
    },
}

#[derive(Subcommand)]
enum VoteAction {
    /// Create a vote session from the current shortlist
    New,

    /// Show the pool of an existing session
    Join {
        /// Session id shared by the creator
        #[arg(long)]
        session: String,
    },

    /// Toggle your vote on a pool movie
    Cast {
        /// Session id shared by the creator
        #[arg(long)]
        session: String,

        /// Movie id from the pool
        #[arg(long)]
        movie_id: MovieId,
    },

    /// Show the current ranking
    Tally {
        /// Session id shared by the creator
        #[arg(long)]
        session: String,
    },

    /// Follow the ranking as votes come in
    Watch {
        /// Session id shared by the creator
        #[arg(long)]
        session: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Pick up TMDB_API_KEY and friends from a local .env, if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let store_path = cli.store.unwrap_or_else(default_store_path);
    let store = Arc::new(JsonFileStore::open(store_path));

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Swipe {
            genres,
            max_runtime,
            year_from,
            year_to,
            providers,
            cap,
        } => handle_swipe(store, genres, providers, max_runtime, year_from, year_to, cap).await?,
        Commands::Shortlist { action } => handle_shortlist(store.as_ref(), action)?,
        Commands::Vote { action } => handle_vote(store, action).await?,
        Commands::Favorites => handle_favorites(store.as_ref())?,
        Commands::Stats => handle_stats(store.as_ref())?,
        Commands::Genres => handle_genres().await?,
        Commands::Providers => handle_providers().await?,
        Commands::Details { movie_id } => handle_details(movie_id).await?,
    }

    Ok(())
}

/// Handle the 'swipe' command
async fn handle_swipe(
    store: Arc<JsonFileStore>,
    genres: Vec<String>,
    providers: Vec<String>,
    max_runtime: Option<u32>,
    year_from: Option<u16>,
    year_to: Option<u16>,
    cap: u32,
) -> Result<()> {
    let client = catalog_client()?;
    let filter =
        build_filter(&client, &genres, &providers, max_runtime, year_from, year_to).await?;

    let config = SessionConfig::default().with_swipe_cap(cap);
    let fetcher = Arc::new(CatalogFetcher::new(client.clone()));
    let mut driver = SessionDriver::new(fetcher, store.clone(), filter, config);

    println!("{}", "Finding your first movie...".dimmed());
    driver.start().await?;
    println!(
        "{}",
        "Swipe right to keep, left to pass, up to favorite, down for already-seen.".dimmed()
    );

    loop {
        if driver.phase() != Phase::Presenting {
            break;
        }
        let Some(movie) = driver.current().cloned() else {
            break;
        };
        print_movie_card(&movie, driver.swipe_count() + 1, cap);

        let Some(input) = prompt_line("[r/l/u/d] swipe, [i]nfo, [q]uit >")? else {
            break;
        };
        match input.as_str() {
            "r" => driver.swipe(SwipeDirection::Right).await?,
            "l" => driver.swipe(SwipeDirection::Left).await?,
            "u" => driver.swipe(SwipeDirection::Up).await?,
            "d" => driver.swipe(SwipeDirection::Down).await?,
            "i" => match client.enrich(movie.id).await {
                Ok(details) => print_details(&details),
                Err(error) => println!("{} Could not load details: {}", "✗".red(), error),
            },
            "q" => break,
            "" => {}
            other => println!("Unrecognized command '{}'", other),
        }
    }

    if driver.phase() == Phase::SessionComplete {
        println!();
        println!("{} Swipe cap reached", "✓".green());
    }

    // A completed session persists its picks before the driver returns; an
    // early quit leaves them on the driver instead. Offer both.
    let mut picks = take_pending_picks(store.as_ref())?;
    for movie in driver.shortlist() {
        if !picks.iter().any(|pick| pick.id == movie.id) {
            picks.push(movie.clone());
        }
    }
    assign_dispositions(store.as_ref(), picks)?;

    Ok(())
}

/// Prompt a disposition for each picked movie and commit the keepers
fn assign_dispositions(store: &dyn KvStore, picks: Vec<Movie>) -> Result<()> {
    if picks.is_empty() {
        println!("Nothing new for the shortlist.");
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("You kept {} movie(s). When will you watch them?", picks.len())
            .bold()
            .blue()
    );

    let mut shortlist = Shortlist::load(store);
    let mut added = 0;
    for movie in picks {
        let Some(input) = prompt_line(&format!("{}  [n]ow / [l]ater / [s]kip >", movie.title))?
        else {
            break;
        };
        let disposition = match input.as_str() {
            "n" => Disposition::WatchNow,
            "l" | "" => Disposition::WatchLater,
            _ => {
                println!("  skipped");
                continue;
            }
        };
        if shortlist.commit(movie, disposition, Utc::now()) {
            added += 1;
        }
    }
    shortlist.save(store)?;
    println!("{} {} added to the shortlist", "✓".green(), added);
    Ok(())
}

/// Handle the 'shortlist' command
fn handle_shortlist(store: &dyn KvStore, action: ShortlistAction) -> Result<()> {
    let mut shortlist = Shortlist::load(store);
    match action {
        ShortlistAction::List => {
            if shortlist.is_empty() {
                println!("The shortlist is empty. Run 'reel-swipe swipe' to fill it.");
                return Ok(());
            }
            println!("{}", "Shortlist:".bold().blue());
            for entry in shortlist.entries() {
                let when = match entry.disposition {
                    Disposition::WatchNow => "watch now".green(),
                    Disposition::WatchLater => "watch later".yellow(),
                };
                let watched = if entry.watched { "  ✓ watched" } else { "" };
                println!(
                    "{}  {} [{}]{}",
                    format!("{:>8}", entry.movie.id).dimmed(),
                    entry.movie.title,
                    when,
                    watched.dimmed()
                );
            }
        }
        ShortlistAction::Watched { movie_id } => {
            if !shortlist.mark_watched(movie_id) {
                return Err(anyhow!("Movie {} is not on the shortlist", movie_id));
            }
            shortlist.save(store)?;
            println!("{} Marked {} as watched", "✓".green(), movie_id);
        }
        ShortlistAction::Remove { movie_id } => {
            if !shortlist.remove(movie_id) {
                return Err(anyhow!("Movie {} is not on the shortlist", movie_id));
            }
            shortlist.save(store)?;
            println!("{} Removed {}", "✓".green(), movie_id);
        }
    }
    Ok(())
}

/// Handle the 'vote' command
async fn handle_vote(store: Arc<JsonFileStore>, action: VoteAction) -> Result<()> {
    let config = VoteConfig::default();
    match action {
        VoteAction::New => {
            let shortlist = Shortlist::load(store.as_ref());
            if shortlist.is_empty() {
                return Err(anyhow!("The shortlist is empty; swipe some movies first"));
            }
            let movies: Vec<Movie> = shortlist
                .entries()
                .iter()
                .map(|entry| entry.movie.clone())
                .collect();

            let mut rng = ThreadRandom;
            let id = new_session_id(&mut rng);
            let vote_session = VoteSession::create(store.as_ref(), &id, movies, &config)?;

            println!(
                "{} Created vote session {}",
                "✓".green(),
                vote_session.id().bold()
            );
            println!(
                "Share the id; friends vote with 'reel-swipe vote cast --session {} --movie-id <id>'",
                vote_session.id()
            );
            print_pool(vote_session.pool());
        }
        VoteAction::Join { session } => {
            let vote_session = VoteSession::load(store.as_ref(), &session)?;
            let mut rng = ThreadRandom;
            let token = voter_token(store.as_ref(), &session, &mut rng)?;
            println!("Joined session {} as voter {}", session.bold(), token.bold());
            print_pool(vote_session.pool());
        }
        VoteAction::Cast { session, movie_id } => {
            let vote_session = VoteSession::load(store.as_ref(), &session)?;
            if !vote_session.pool().iter().any(|movie| movie.id == movie_id) {
                return Err(anyhow!("Movie {} is not in this session's pool", movie_id));
            }
            let mut rng = ThreadRandom;
            let token = voter_token(store.as_ref(), &session, &mut rng)?;
            match vote_session.toggle_vote(store.as_ref(), movie_id, &token, Utc::now())? {
                VoteToggle::Added => println!("{} Vote cast for {}", "✓".green(), movie_id),
                VoteToggle::Removed => {
                    println!("{} Vote withdrawn from {}", "✓".yellow(), movie_id)
                }
            }
            print_tally(vote_session.pool(), &vote_session.records(store.as_ref()));
        }
        VoteAction::Tally { session } => {
            let vote_session = VoteSession::load(store.as_ref(), &session)?;
            print_tally(vote_session.pool(), &vote_session.records(store.as_ref()));
        }
        VoteAction::Watch { session } => {
            let vote_session = VoteSession::load(store.as_ref(), &session)?;
            print_tally(vote_session.pool(), &vote_session.records(store.as_ref()));
            println!("{}", "Watching for votes (ctrl-c to stop)...".dimmed());

            let mut subscription =
                StorePoller::new(store.clone(), session.clone(), config.poll_interval);
            loop {
                let records = subscription.next_change().await?;
                println!();
                print_tally(vote_session.pool(), &records);
            }
        }
    }
    Ok(())
}

/// Handle the 'favorites' command
fn handle_favorites(store: &dyn KvStore) -> Result<()> {
    let favorites = Favorites::load(store);
    if favorites.is_empty() {
        println!("No favorites yet. Swipe up on a movie you love.");
        return Ok(());
    }
    println!("{}", "Favorites:".bold().blue());
    for movie in favorites.movies() {
        println!(
            "{}  {} ({:.1})",
            format!("{:>8}", movie.id).dimmed(),
            movie.title,
            movie.rating
        );
    }
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(store: &dyn KvStore) -> Result<()> {
    let journal = SwipeJournal::load(store, DEFAULT_JOURNAL_CAPACITY);
    if journal.is_empty() {
        println!("No swipes recorded yet.");
        return Ok(());
    }

    let summary = journal.summary();
    println!("{}", "Swipe stats:".bold().blue());
    println!("{}Total swipes: {}", "• ".green(), summary.total);
    println!("{}Kept (right): {}", "• ".green(), summary.liked);
    println!("{}Passed (left): {}", "• ".green(), summary.passed);
    println!("{}Favorited (up): {}", "• ".green(), summary.favorited);
    println!("{}Already seen (down): {}", "• ".green(), summary.dismissed);
    println!("{}Like rate: {:.0}%", "• ".cyan(), summary.like_rate * 100.0);

    let shortlist = Shortlist::load(store);
    let favorites = Favorites::load(store);
    println!("{}Shortlisted: {}", "• ".cyan(), shortlist.len());
    println!("{}Favorites: {}", "• ".cyan(), favorites.len());

    println!("Recent swipes:");
    let events: Vec<_> = journal.events().collect();
    for event in events.iter().rev().take(5) {
        println!(
            "  - {} movie {} ({})",
            direction_label(event.direction),
            event.movie_id,
            event.recorded_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Handle the 'genres' command
async fn handle_genres() -> Result<()> {
    let client = catalog_client()?;
    let genres = client.genres().await?;
    println!("{}", "Genres (use the id or name with --genre):".bold().blue());
    for genre in genres {
        println!("{}  {}", format!("{:>6}", genre.id).dimmed(), genre.name);
    }
    Ok(())
}

/// Handle the 'providers' command
async fn handle_providers() -> Result<()> {
    let client = catalog_client()?;
    let services = client.streaming_services().await?;
    println!(
        "{}",
        "Streaming services (use the id or name with --provider):".bold().blue()
    );
    for service in services {
        println!(
            "{}  {}",
            format!("{:>6}", service.provider_id).dimmed(),
            service.provider_name
        );
    }
    Ok(())
}

/// Handle the 'details' command
async fn handle_details(movie_id: MovieId) -> Result<()> {
    let client = catalog_client()?;
    let details = client.enrich(movie_id).await?;
    print_details(&details);
    Ok(())
}

/// Build a catalog client from the environment
fn catalog_client() -> Result<CatalogClient> {
    CatalogClient::from_env()
        .context("Catalog access is not configured; set TMDB_API_KEY or add it to .env")
}

/// Resolve CLI filter flags into a FilterSpec
async fn build_filter(
    client: &CatalogClient,
    genres: &[String],
    providers: &[String],
    max_runtime: Option<u32>,
    year_from: Option<u16>,
    year_to: Option<u16>,
) -> Result<FilterSpec> {
    let mut filter = FilterSpec::default()
        .with_genres(resolve_genres(client, genres).await?)
        .with_providers(resolve_providers(client, providers).await?);
    if let Some(minutes) = max_runtime {
        filter = filter.with_max_runtime(minutes);
    }
    if let Some(year) = year_from {
        filter = filter.with_year_from(year);
    }
    if let Some(year) = year_to {
        filter = filter.with_year_to(year);
    }
    Ok(filter)
}

/// Turn genre flags into catalog ids, looking names up when needed
async fn resolve_genres(client: &CatalogClient, wanted: &[String]) -> Result<Vec<u32>> {
    let mut ids = Vec::new();
    let mut names: Vec<&String> = Vec::new();
    for value in wanted {
        match value.parse::<u32>() {
            Ok(id) => ids.push(id),
            Err(_) => names.push(value),
        }
    }
    if !names.is_empty() {
        let known = client.genres().await?;
        for name in names {
            let entry = known
                .iter()
                .find(|genre| genre.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("Unknown genre '{}' (try 'reel-swipe genres')", name))?;
            ids.push(entry.id);
        }
    }
    Ok(ids)
}

/// Turn provider flags into catalog ids, matching names loosely
async fn resolve_providers(client: &CatalogClient, wanted: &[String]) -> Result<Vec<u32>> {
    let mut ids = Vec::new();
    let mut names: Vec<&String> = Vec::new();
    for value in wanted {
        match value.parse::<u32>() {
            Ok(id) => ids.push(id),
            Err(_) => names.push(value),
        }
    }
    if !names.is_empty() {
        let known = client.streaming_services().await?;
        for name in names {
            let lowered = name.to_lowercase();
            let entry = known
                .iter()
                .find(|service| service.provider_name.to_lowercase().contains(&lowered))
                .ok_or_else(|| {
                    anyhow!("Unknown streaming service '{}' (try 'reel-swipe providers')", name)
                })?;
            ids.push(entry.provider_id);
        }
    }
    Ok(ids)
}

/// Print the swipe card for the movie on screen
fn print_movie_card(movie: &Movie, position: u32, cap: u32) {
    println!();
    println!(
        "{}",
        format!("[{}/{}] {}", position, cap, movie.title).bold().blue()
    );
    let runtime = movie
        .runtime
        .map(|minutes| format!("  |  {} min", minutes))
        .unwrap_or_default();
    println!("  ★ {:.1}{}", movie.rating, runtime);
    println!("  {}", movie.overview);
}

/// Print the enriched details view
fn print_details(details: &MovieDetails) {
    let movie = &details.movie;
    let year = details
        .release_year
        .map(|year| format!(" ({})", year))
        .unwrap_or_default();

    println!();
    println!("{}", format!("{}{}", movie.title, year).bold().blue());
    println!("{}Rating: {:.1}", "• ".green(), movie.rating);
    if let Some(minutes) = movie.runtime {
        println!("{}Runtime: {} min", "• ".green(), minutes);
    }
    if !details.directors.is_empty() {
        println!("{}Directed by: {}", "• ".green(), details.directors.join(", "));
    }
    if !details.top_cast.is_empty() {
        println!("{}Starring: {}", "• ".green(), details.top_cast.join(", "));
    }
    println!("{}", movie.overview);
    if let Some(providers) = &details.providers {
        print_region_providers(providers);
    }
}

/// Print streaming availability grouped by offer type
fn print_region_providers(providers: &RegionProviders) {
    fn names(entries: &[ProviderEntry]) -> String {
        entries
            .iter()
            .map(|entry| entry.provider_name.clone())
            .collect::<Vec<_>>()
            .join(", ")
    }

    if !providers.flatrate.is_empty() {
        println!("{}Stream: {}", "• ".cyan(), names(&providers.flatrate));
    }
    if !providers.rent.is_empty() {
        println!("{}Rent: {}", "• ".cyan(), names(&providers.rent));
    }
    if !providers.buy.is_empty() {
        println!("{}Buy: {}", "• ".cyan(), names(&providers.buy));
    }
    if let Some(link) = &providers.link {
        println!("{}", link.dimmed());
    }
}

/// Print a vote pool with the ids used for casting
fn print_pool(pool: &[Movie]) {
    println!("{}", "Pool:".bold().blue());
    for movie in pool {
        println!(
            "{}  {} ({:.1})",
            format!("{:>8}", movie.id).dimmed(),
            movie.title,
            movie.rating
        );
    }
}

/// Print the ranked tally for a pool
fn print_tally(pool: &[Movie], records: &[VoteRecord]) {
    let voters: HashSet<&str> = records.iter().map(|record| record.voter.as_str()).collect();
    println!(
        "{}",
        format!(
            "Standings ({} votes from {} voters):",
            records.len(),
            voters.len()
        )
        .bold()
        .blue()
    );
    for (position, (movie, votes)) in rank(pool, records).iter().enumerate() {
        let count = if *votes > 0 {
            format!("{:>3}", votes).green()
        } else {
            format!("{:>3}", votes).dimmed()
        };
        println!("{}. {} {}", position + 1, count, movie.title);
    }
}

/// Short label for a swipe direction
fn direction_label(direction: SwipeDirection) -> &'static str {
    match direction {
        SwipeDirection::Right => "kept",
        SwipeDirection::Left => "passed",
        SwipeDirection::Up => "favorited",
        SwipeDirection::Down => "seen",
    }
}

/// Prompt on stdout and read one trimmed line; None on end of input
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    print!("{} ", prompt.dimmed());
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

/// Platform data directory, falling back to the working directory
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("reel-swipe").join("store.json"))
        .unwrap_or_else(|| PathBuf::from("reel-swipe-store.json"))
}
