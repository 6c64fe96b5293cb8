//! Hexfill runner (default binary).
//!
//! `hexfill` or `hexfill serve` starts the TCP session adapter configured from
//! `HEXFILL_*` environment variables. `hexfill autoplay [--seed N] [--moves N]`
//! lets the planner play one game and prints the result.

use anyhow::Result;
use log::info;

use hexfill::adapter::{run_server, ServerConfig};
use hexfill::autoplay::{autoplay, parse_autoplay_args};
use hexfill::core::GameSession;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Some(config) = parse_autoplay_args(&args)? {
        let mut session = GameSession::seeded(config.seed);
        let report = autoplay(&mut session, config.max_moves)?;
        println!(
            "seed {}: {} moves, score {}, game over: {}",
            config.seed, report.moves, report.score, report.game_over
        );
        return Ok(());
    }

    match args.first().map(String::as_str) {
        None | Some("serve") => {}
        Some(other) => anyhow::bail!("unknown subcommand: {} (expected serve or autoplay)", other),
    }

    let config = ServerConfig::from_env();
    let store = config.open_store();
    info!(
        "best score file: {}",
        config
            .best_score_path
            .as_ref()
            .map_or_else(|| "(memory)".to_string(), |p| p.display().to_string())
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server(config, store, None))
}
