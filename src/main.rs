use std::time::Duration;

use anyhow::Result;
use tracing::info;

use scacco_api::Game;
use scacco_engine::SearchLimits;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // A FEN on the command line may arrive as several words.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut game = if args.is_empty() {
        Game::new()
    } else {
        Game::from_fen(&args.join(" "))?
    };
    info!(position = %game.export_fen(), "scacco starting");

    let limits = SearchLimits::new(5, Duration::from_secs(2));
    match game.engine_move(&limits) {
        Some(mv) => {
            let san = game.san(mv);
            game.play(mv);
            println!("{san}");
            println!("{}", game.position().pretty());
            println!("{}", game.export_fen());
        }
        None => println!("no legal moves: {:?}", game.status()),
    }

    Ok(())
}
