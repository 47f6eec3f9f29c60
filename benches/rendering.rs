//! Benchmarks for screen rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lined::app::Session;
use lined::editor::LineStore;
use ratatui::{Terminal, backend::TestBackend};

fn bench_render(c: &mut Criterion) {
    let text = (0..2_000)
        .map(|i| format!("{i}\tsome tabbed text with a control \x01 char\n"))
        .collect::<String>();
    let store = LineStore::from_bytes("bench.txt", text.as_bytes());
    let mut session = Session::new(store, 80, 22);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

    c.bench_function("render_page", |b| {
        b.iter(|| {
            terminal
                .draw(|frame| lined::ui::render(black_box(&session), frame))
                .unwrap();
        })
    });

    c.bench_function("refresh_screen", |b| b.iter(|| session.refresh_screen()));
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
