//! Drive a short swipe session against a scripted fetcher.
//!
//! Run with: cargo run --example scripted_swipe -p session

use std::sync::Arc;

use catalog::Movie;
use filters::FilterSpec;
use session::{Phase, ScriptedFetcher, SessionConfig, SessionDriver, SwipeDirection};
use store::MemoryStore;

fn demo_movie(id: u32, title: &str, rating: f32) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        rating,
        poster_path: None,
        overview: format!("{title} is a movie worth arguing about."),
        runtime: Some(90 + id),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fetcher = Arc::new(ScriptedFetcher::found([
        demo_movie(550, "Fight Club", 8.4),
        demo_movie(680, "Pulp Fiction", 8.5),
        demo_movie(13, "Forrest Gump", 8.5),
        demo_movie(27205, "Inception", 8.4),
        demo_movie(603, "The Matrix", 8.2),
    ]));
    let store = Arc::new(MemoryStore::new());
    let config = SessionConfig::default().with_swipe_cap(4);

    let mut driver = SessionDriver::new(fetcher, store, FilterSpec::unconstrained(), config);
    driver.start().await?;

    let plan = [
        SwipeDirection::Right,
        SwipeDirection::Left,
        SwipeDirection::Up,
        SwipeDirection::Right,
    ];

    for direction in plan {
        if let Some(movie) = driver.current() {
            println!(
                "Presenting: {} (rating {:.1}) -> swiping {:?}",
                movie.title, movie.rating, direction
            );
        }
        driver.settle_prefetch().await?;
        driver.swipe(direction).await?;
    }

    assert_eq!(driver.phase(), Phase::SessionComplete);
    let shortlist = driver.take_handoff().unwrap_or_default();
    println!("\nSession complete after {} swipes.", driver.swipe_count());
    println!("Shortlist:");
    for movie in &shortlist {
        println!("  - {}", movie.title);
    }

    let summary = driver.journal().summary();
    println!(
        "\nStats: {} swipes, {} liked, {} favorited, like rate {:.0}%",
        summary.total,
        summary.liked,
        summary.favorited,
        summary.like_rate * 100.0
    );
    Ok(())
}
