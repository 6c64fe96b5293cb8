//! Headless self-play: the planner picks every move until nothing fits.

use anyhow::{anyhow, Result};
use log::info;

use crate::core::{BestScoreStore, GameSession, RandomSource};
use crate::engine::{apply_place, best_hint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayConfig {
    pub seed: u32,
    /// Stop after this many drops even if the game is still going
    pub max_moves: u32,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            max_moves: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayReport {
    pub moves: u32,
    pub score: u32,
    pub best_score: u32,
    pub game_over: bool,
}

pub fn parse_autoplay_args(args: &[String]) -> Result<Option<AutoplayConfig>> {
    if args.is_empty() || args[0] != "autoplay" {
        return Ok(None);
    }

    let mut config = AutoplayConfig::default();
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("autoplay: missing value for --seed"))?;
                config.seed = v
                    .parse()
                    .map_err(|_| anyhow!("autoplay: invalid --seed value: {}", v))?;
            }
            "--moves" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("autoplay: missing value for --moves"))?;
                config.max_moves = v
                    .parse()
                    .map_err(|_| anyhow!("autoplay: invalid --moves value: {}", v))?;
            }
            other => {
                return Err(anyhow!("autoplay: unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(Some(config))
}

/// Play `session` with the planner's best hint each turn
pub fn autoplay<R: RandomSource, S: BestScoreStore>(
    session: &mut GameSession<R, S>,
    max_moves: u32,
) -> Result<AutoplayReport> {
    let mut moves = 0u32;
    while moves < max_moves && !session.is_over() {
        let points_per_cell = session.config().points_per_cell;
        let Some(hint) = best_hint(session.board(), session.pool(), points_per_cell) else {
            break;
        };
        apply_place(session, hint.placement).map_err(|e| anyhow!("autoplay: {}", e.message()))?;
        moves += 1;
    }

    info!(
        "autoplay finished after {} moves with score {}",
        moves,
        session.score()
    );

    Ok(AutoplayReport {
        moves,
        score: session.score(),
        best_score: session.best_score(),
        game_over: session.is_over(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn other_subcommands_are_not_autoplay() {
        assert_eq!(parse_autoplay_args(&args(&[])).unwrap(), None);
        assert_eq!(parse_autoplay_args(&args(&["serve"])).unwrap(), None);
    }

    #[test]
    fn parses_seed_and_moves() {
        let config = parse_autoplay_args(&args(&["autoplay", "--seed", "9", "--moves", "40"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            config,
            AutoplayConfig {
                seed: 9,
                max_moves: 40
            }
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_autoplay_args(&args(&["autoplay", "--seed"])).is_err());
        assert!(parse_autoplay_args(&args(&["autoplay", "--moves", "many"])).is_err());
        assert!(parse_autoplay_args(&args(&["autoplay", "--fast"])).is_err());
    }

    #[test]
    fn autoplay_respects_move_limit() {
        let mut session = GameSession::seeded(4);
        let report = autoplay(&mut session, 5).unwrap();
        assert!(report.moves <= 5);
        assert_eq!(report.moves, session.figures_placed());
        assert!(report.score >= report.moves);
    }

    #[test]
    fn autoplay_is_deterministic_per_seed() {
        let mut a = GameSession::seeded(17);
        let mut b = GameSession::seeded(17);
        assert_eq!(autoplay(&mut a, 30).unwrap(), autoplay(&mut b, 30).unwrap());
    }
}
