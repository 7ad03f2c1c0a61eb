use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{Board, Game, GameConfig, PieceSet, Tetromino};
use blockfall::term::{FrameBuffer, GameView, Viewport};
use blockfall::types::{Block, HeldKeys, InputFrame, Intent, PieceId, Rgb};

const X: Block = Block {
    color: Rgb::new(1, 1, 1),
    alias: 'X',
};

fn bench_idle_tick(c: &mut Criterion) {
    let mut game = Game::new(GameConfig::default()).unwrap();
    let idle = InputFrame::idle();

    c.bench_function("game_tick_idle", |b| {
        b.iter(|| {
            if game.game_over() {
                game.restart();
            }
            game.tick(black_box(&idle));
        })
    });
}

fn bench_busy_tick(c: &mut Criterion) {
    let mut game = Game::new(GameConfig::default()).unwrap();
    let mut frame = InputFrame::press(Intent::RotateCw).with_held(HeldKeys {
        left: true,
        soft_drop: true,
        ..HeldKeys::default()
    });
    frame.push(Intent::MoveRight);

    c.bench_function("game_tick_busy", |b| {
        b.iter(|| {
            if game.game_over() {
                game.restart();
            }
            game.tick(black_box(&frame));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::default();
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(X));
                }
            }
            board.clear_lines()
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let board = Board::default();
    let pieces = PieceSet::standard();
    let mut t = Tetromino::spawn(PieceId::T, &pieces, board.width());
    t.y = 8;

    c.bench_function("rotate_cw", |b| {
        b.iter(|| t.rotate_cw(black_box(&board), &pieces))
    });
}

fn bench_hard_drop_session(c: &mut Criterion) {
    c.bench_function("hard_drop_until_top_out", |b| {
        b.iter(|| {
            let mut game = Game::new(GameConfig::default()).unwrap();
            let drop = InputFrame::press(Intent::HardDrop);
            while !game.tick(&drop).game_over {}
            game.score()
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let game = Game::new(GameConfig::default()).unwrap();
    let view = GameView::default();
    let mut fb = FrameBuffer::new(80, 30);

    c.bench_function("render_snapshot", |b| {
        b.iter(|| view.render_into(&game.snapshot(), Viewport::new(80, 30), black_box(&mut fb)))
    });
}

criterion_group!(
    benches,
    bench_idle_tick,
    bench_busy_tick,
    bench_line_clear,
    bench_rotate,
    bench_hard_drop_session,
    bench_render
);
criterion_main!(benches);
