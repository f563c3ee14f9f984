//! Criterion benchmarks for the per-frame hot path.
//!
//! A render loop flattens, encodes and chunks one frame every tick, so these
//! three steps bound the achievable frame rate on the sender side.
//!
//! Run with:
//! ```bash
//! cargo bench --package ledboard-core --bench frame_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ledboard_core::{chunk_payload, encode_frame, BoardConfig, Graphics, LedBoard};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Reference 96×48 board with the two diagonals drawn, in the given arity.
fn diagonal_board(color_arity: usize) -> LedBoard {
    let config = BoardConfig {
        color_arity,
        ..BoardConfig::default()
    };
    let mut board = LedBoard::from_config(&config).expect("reference geometry must be valid");
    let mut gfx = Graphics::new(&mut board);
    gfx.draw_line(2, 2, 45, 45, [0x7f, 0x40, 0x10]);
    gfx.draw_line(50, 2, 93, 45, [0x7f, 0x40, 0x10]);
    board
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_get_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_surface");

    for arity in [1usize, 3] {
        let board = diagonal_board(arity);
        group.bench_with_input(BenchmarkId::new("arity", arity), &board, |b, board| {
            b.iter(|| black_box(board).get_surface())
        });
    }

    group.finish();
}

fn bench_encode_and_chunk(c: &mut Criterion) {
    let board = diagonal_board(1);
    let frame = board.get_surface();
    let mut group = c.benchmark_group("encode_and_chunk");

    group.bench_function("encode_frame", |b| {
        b.iter(|| encode_frame(black_box(&frame)))
    });

    let bytes = encode_frame(&frame).expect("7-bit components always fit in a byte");
    group.bench_function("chunk_payload_512", |b| {
        b.iter(|| chunk_payload(black_box(&bytes), black_box(512)))
    });

    group.finish();
}

fn bench_scroll(c: &mut Criterion) {
    let mut board = diagonal_board(1);
    c.bench_function("board_scroll_right", |b| {
        b.iter(|| board.scroll(black_box(ledboard_core::ScrollDirection::Right)))
    });
}

criterion_group!(benches, bench_get_surface, bench_encode_and_chunk, bench_scroll);
criterion_main!(benches);
