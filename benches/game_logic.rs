use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexfill::core::{has_legal_move, Board, Figure, GameSession, Hexagon};
use hexfill::engine::best_hint;
use hexfill::types::{Color, Position};

fn crowded_board() -> Board {
    let mut board = Board::new();
    let positions: Vec<Position> = board.cells().map(|c| c.position).collect();
    for p in positions {
        if (p.row * 3 + p.column) % 4 != 0 {
            let color = if p.column % 2 == 0 {
                Color::Red
            } else {
                Color::Teal
            };
            board.set(p, Some(color));
        }
    }
    board
}

fn bench_can_place_anywhere(c: &mut Criterion) {
    let board = crowded_board();
    let figure = Figure::new(Color::Blue, 4);

    c.bench_function("can_place_anywhere_crowded", |b| {
        b.iter(|| board.can_place_anywhere(black_box(&figure)))
    });
}

fn bench_hexagon_clear(c: &mut Criterion) {
    let hex = Hexagon::new(Position::new(2, 4));
    let single = Figure::new(Color::Green, 1);

    c.bench_function("place_and_clear_hexagon", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for &p in &hex.positions()[1..] {
                board.set(p, Some(Color::Green));
            }
            board.try_place_at(black_box(&single), hex.anchor())
        })
    });
}

fn bench_legal_move_check(c: &mut Criterion) {
    let board = crowded_board();
    let pool = vec![
        Figure::new(Color::Red, 6),
        Figure::new(Color::Blue, 5),
        Figure::new(Color::Green, 6),
    ];

    c.bench_function("has_legal_move_crowded", |b| {
        b.iter(|| has_legal_move(black_box(&board), black_box(&pool)))
    });
}

fn bench_best_hint(c: &mut Criterion) {
    let session = GameSession::seeded(12345);

    c.bench_function("best_hint_empty_board", |b| {
        b.iter(|| best_hint(black_box(session.board()), black_box(session.pool()), 1))
    });
}

criterion_group!(
    benches,
    bench_can_place_anywhere,
    bench_hexagon_clear,
    bench_legal_move_check,
    bench_best_hint
);
criterion_main!(benches);
