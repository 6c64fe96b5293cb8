//! Session module - the turn cycle of one game
//!
//! A session owns a board, the pool of offered figures, the score and the random
//! source. A successful drop awards points, removes the figure from the pool,
//! offers a replacement and then checks whether any offered figure still fits.
//! Once nothing fits the session is over until [`GameSession::restart`].

use log::{debug, info};

use crate::board::{Board, PlacementResult};
use crate::error::BoardError;
use crate::figure::Figure;
use crate::layout::BoardConfig;
use crate::rng::{FigureFactory, RandomSource, SimpleRng};
use crate::scoring::{calculate_drop_score, BestScoreStore, MemoryBestScore, Scoreboard};
use crate::snapshot::{FigureSnapshot, SessionSnapshot};
use crate::types::{Point, Position, POINTS_PER_CELL, POOL_SIZE, ROTATION_STEPS};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub board: BoardConfig,
    /// Figures offered at a time (at least 1)
    pub pool_size: usize,
    pub points_per_cell: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            pool_size: POOL_SIZE,
            points_per_cell: POINTS_PER_CELL,
        }
    }
}

/// What a drop did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropOutcome {
    pub accepted: bool,
    pub score_delta: u32,
    pub game_over: bool,
    /// The drop raised the best score
    pub new_best: bool,
    pub placement: PlacementResult,
}

/// Whether any figure in `pool` fits on `board` in any rotation
///
/// Shape depends only on size, so one clone per distinct size is tried.
/// The figures in `pool` are never touched.
pub fn has_legal_move(board: &Board, pool: &[Figure]) -> bool {
    let mut representatives: Vec<&Figure> = pool.iter().collect();
    representatives.sort_by_key(|f| f.len());
    representatives.dedup_by_key(|f| f.len());

    representatives.into_iter().any(|figure| {
        let mut candidate = figure.clone();
        (0..ROTATION_STEPS).any(|_| {
            let fits = board.can_place_anywhere(&candidate);
            candidate.rotate();
            fits
        })
    })
}

pub struct GameSession<R: RandomSource = SimpleRng, S: BestScoreStore = MemoryBestScore> {
    config: SessionConfig,
    board: Board,
    pool: Vec<Figure>,
    scoreboard: Scoreboard,
    rng: R,
    store: S,
    game_over: bool,
    /// Increments on restart
    round: u32,
    figures_placed: u32,
}

impl GameSession<SimpleRng, MemoryBestScore> {
    /// Default rules, in-memory best score, deterministic figures from `seed`
    pub fn seeded(seed: u32) -> Self {
        Self::from_board(
            SessionConfig::default(),
            Board::new(),
            SimpleRng::new(seed),
            MemoryBestScore::default(),
        )
    }
}

impl<R: RandomSource, S: BestScoreStore> GameSession<R, S> {
    pub fn new(config: SessionConfig, rng: R, store: S) -> Result<Self, BoardError> {
        let board = Board::with_config(config.board.clone())?;
        Ok(Self::from_board(config, board, rng, store))
    }

    fn from_board(config: SessionConfig, board: Board, rng: R, store: S) -> Self {
        let scoreboard = Scoreboard::new(store.get());
        let mut session = Self {
            config,
            board,
            pool: Vec::new(),
            scoreboard,
            rng,
            store,
            game_over: false,
            round: 0,
            figures_placed: 0,
        };
        session.refill_pool();
        session.game_over = !session.has_legal_move();
        session
    }

    fn pool_target(&self) -> usize {
        self.config.pool_size.max(1)
    }

    fn refill_pool(&mut self) {
        while self.pool.len() < self.pool_target() {
            self.offer_new_figure();
        }
    }

    /// Generate a random figure and add it to the pool
    pub fn offer_new_figure(&mut self) -> &Figure {
        let figure = FigureFactory::make_figure(&mut self.rng);
        debug!("offering {:?} figure of {} cells", figure.color(), figure.len());
        self.pool.push(figure);
        &self.pool[self.pool.len() - 1]
    }

    /// Rotate the figure in `slot`; false if there is no such slot
    pub fn rotate(&mut self, slot: usize) -> bool {
        match self.pool.get_mut(slot) {
            Some(figure) => {
                figure.rotate();
                true
            }
            None => false,
        }
    }

    /// Drop the figure in `slot` with its grab cell at `point`
    pub fn drop(&mut self, slot: usize, point: Point) -> DropOutcome {
        if self.game_over {
            return self.rejected();
        }
        let Some(figure) = self.pool.get(slot) else {
            return self.rejected();
        };
        let result = self.board.try_place(figure, point);
        self.finish_drop(slot, result)
    }

    /// Drop the figure in `slot` with its grab cell on `anchor`
    pub fn drop_at(&mut self, slot: usize, anchor: Position) -> DropOutcome {
        if self.game_over {
            return self.rejected();
        }
        let Some(figure) = self.pool.get(slot) else {
            return self.rejected();
        };
        let result = self.board.try_place_at(figure, anchor);
        self.finish_drop(slot, result)
    }

    fn rejected(&self) -> DropOutcome {
        DropOutcome {
            game_over: self.game_over,
            ..DropOutcome::default()
        }
    }

    fn finish_drop(&mut self, slot: usize, placement: PlacementResult) -> DropOutcome {
        if !placement.accepted {
            return self.rejected();
        }

        let score_delta = calculate_drop_score(&placement, self.config.points_per_cell);
        let new_best = self.scoreboard.add(score_delta);
        if new_best {
            self.store.set(self.scoreboard.best());
        }

        self.pool.remove(slot);
        self.figures_placed += 1;
        self.offer_new_figure();

        self.game_over = !self.has_legal_move();
        if self.game_over {
            info!(
                "round {} over: score {} after {} figures",
                self.round,
                self.scoreboard.score(),
                self.figures_placed
            );
        }

        DropOutcome {
            accepted: true,
            score_delta,
            game_over: self.game_over,
            new_best,
            placement,
        }
    }

    /// No-legal-move check over the current pool
    pub fn has_legal_move(&self) -> bool {
        has_legal_move(&self.board, &self.pool)
    }

    /// Clear the board and score, deal a fresh pool; the best score survives
    pub fn restart(&mut self) {
        self.scoreboard.reset();
        self.board.reset();
        self.pool.clear();
        self.refill_pool();
        self.round += 1;
        self.figures_placed = 0;
        self.game_over = !self.has_legal_move();
        info!("round {} started", self.round);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Hand the cells cleared by the last drop to the presentation layer
    pub fn take_pending_removal(&mut self) -> Vec<Position> {
        self.board.take_pending_removal()
    }

    /// Set up the board directly, e.g. to stage a position
    ///
    /// The game-over flag is recomputed afterwards so the session never
    /// reports a stale state for the edited board.
    pub fn edit_board(&mut self, edit: impl FnOnce(&mut Board)) {
        edit(&mut self.board);
        self.game_over = !self.has_legal_move();
    }

    pub fn pool(&self) -> &[Figure] {
        &self.pool
    }

    pub fn figure(&self, slot: usize) -> Option<&Figure> {
        self.pool.get(slot)
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn best_score(&self) -> u32 {
        self.scoreboard.best()
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn figures_placed(&self) -> u32 {
        self.figures_placed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: SessionSnapshot::board_grid(&self.board),
            pool: self.pool.iter().map(FigureSnapshot::from).collect(),
            score: self.score(),
            best_score: self.best_score(),
            game_over: self.game_over,
            round: self.round,
            figures_placed: self.figures_placed,
            pending_removal: self.board.pending_removal().to_vec(),
        }
    }
}
