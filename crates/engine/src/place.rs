use log::debug;

use hexfill_core::{
    calculate_drop_score, has_legal_move, Board, BestScoreStore, DropOutcome, Figure,
    GameSession, RandomSource,
};
use hexfill_types::{Position, ROTATION_STEPS};

/// A concrete move: which pool slot, which rotation index, where the grab cell goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub slot: usize,
    pub rotation: u8,
    pub anchor: Position,
}

/// A placement together with what it would earn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub placement: Placement,
    pub score_delta: u32,
    pub cells_filled: u32,
    pub hexagons_cleared: u32,
    /// The other offered figures still fit afterwards
    pub keeps_moves: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    UnknownSlot,
    NotPlaceable,
    GameOver,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::UnknownSlot => "invalid_slot",
            PlaceError::NotPlaceable => "invalid_place",
            PlaceError::GameOver => "game_over",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::UnknownSlot => "no figure in the requested slot",
            PlaceError::NotPlaceable => "figure does not fit at the requested anchor",
            PlaceError::GameOver => "session is over",
        }
    }
}

/// Every `(rotation, anchor)` at which `figure` fits, over all six rotations
///
/// Rotation indices are absolute (`Figure::rotation_index` after rotating).
pub fn legal_placements(board: &Board, figure: &Figure) -> Vec<(u8, Position)> {
    let mut out = Vec::new();
    let mut candidate = figure.clone();
    for _ in 0..ROTATION_STEPS {
        let orientation = candidate.first_cell().orientation;
        for cell in board.cells().filter(|c| c.can_fill(orientation)) {
            if board.can_place(&candidate, cell.position) {
                out.push((candidate.rotation_index(), cell.position));
            }
        }
        candidate.rotate();
    }
    out
}

/// Simulate `placement` on a copy of `board`
pub fn evaluate(
    board: &Board,
    pool: &[Figure],
    placement: Placement,
    points_per_cell: u32,
) -> Option<Evaluation> {
    let figure = pool.get(placement.slot)?.rotated_to(placement.rotation);
    let mut scratch = board.clone();
    let result = scratch.try_place_at(&figure, placement.anchor);
    if !result.accepted {
        return None;
    }

    let rest: Vec<Figure> = pool
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != placement.slot)
        .map(|(_, f)| f.clone())
        .collect();

    Some(Evaluation {
        placement,
        score_delta: calculate_drop_score(&result, points_per_cell),
        cells_filled: result.cells_filled,
        hexagons_cleared: result.hexagons_cleared,
        keeps_moves: rest.is_empty() || has_legal_move(&scratch, &rest),
    })
}

/// Best move for the current pool
///
/// Highest score first, then moves that keep the rest of the pool playable.
/// Ties go to the lowest slot, rotation, row, column (enumeration order).
pub fn best_hint(board: &Board, pool: &[Figure], points_per_cell: u32) -> Option<Evaluation> {
    let mut best: Option<Evaluation> = None;
    for (slot, figure) in pool.iter().enumerate() {
        for (rotation, anchor) in legal_placements(board, figure) {
            let placement = Placement {
                slot,
                rotation,
                anchor,
            };
            let Some(eval) = evaluate(board, pool, placement, points_per_cell) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some(b) => (eval.score_delta, eval.keeps_moves) > (b.score_delta, b.keeps_moves),
            };
            if better {
                best = Some(eval);
            }
        }
    }
    if let Some(b) = &best {
        debug!(
            "hint: slot {} rotation {} at {:?} worth {}",
            b.placement.slot, b.placement.rotation, b.placement.anchor, b.score_delta
        );
    }
    best
}

/// Rotate the slot's figure to the target rotation and drop it
pub fn apply_place<R: RandomSource, S: BestScoreStore>(
    session: &mut GameSession<R, S>,
    placement: Placement,
) -> Result<DropOutcome, PlaceError> {
    if session.is_over() {
        return Err(PlaceError::GameOver);
    }
    let Some(figure) = session.figure(placement.slot) else {
        return Err(PlaceError::UnknownSlot);
    };

    let target = placement.rotation % ROTATION_STEPS;
    if !session
        .board()
        .can_place(&figure.rotated_to(target), placement.anchor)
    {
        return Err(PlaceError::NotPlaceable);
    }

    while session
        .figure(placement.slot)
        .is_some_and(|f| f.rotation_index() != target)
    {
        session.rotate(placement.slot);
    }

    let outcome = session.drop_at(placement.slot, placement.anchor);
    if outcome.accepted {
        Ok(outcome)
    } else {
        Err(PlaceError::NotPlaceable)
    }
}
