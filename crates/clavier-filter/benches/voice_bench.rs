//! Criterion benchmarks for the filter voice
//!
//! Run with: cargo bench -p clavier-filter
#![allow(missing_docs)]

use clavier_core::{Effect, ParameterInfo};
use clavier_filter::{FilterMode, Filterclavier, MidiTarget, PARAM_MODE};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn voice(mode: FilterMode) -> Filterclavier {
    let mut voice = Filterclavier::new(SAMPLE_RATE);
    voice.set_param(PARAM_MODE, mode.as_param());
    voice.activate();
    voice
}

/// Steady state: one held note, no ramps running.
fn bench_sustained(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sustained");

    for mode in [FilterMode::Lp12, FilterMode::Bp18, FilterMode::Br18] {
        for &block_size in BLOCK_SIZES {
            let input = generate_test_signal(block_size);
            let mut voice = voice(mode);
            voice.note_on(69, 100);
            let mut settle = vec![0.0; 4800];
            voice.process_block_inplace(&mut settle);

            group.bench_with_input(
                BenchmarkId::new(mode.id(), block_size),
                &block_size,
                |b, _| {
                    let mut output = vec![0.0; block_size];
                    b.iter(|| {
                        voice.process_block(black_box(&input), &mut output);
                        black_box(output[0])
                    })
                },
            );
        }
    }

    group.finish();
}

/// Worst case: a new note every block, so every tick recalculates.
fn bench_gliding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gliding");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        let mut voice = voice(FilterMode::Bp18);
        let mut note = 40u8;

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut output = vec![0.0; block_size];
                b.iter(|| {
                    note = if note >= 90 { 40 } else { note + 7 };
                    voice.note_on(note, 110);
                    voice.process_block(black_box(&input), &mut output);
                    black_box(output[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_note_events(c: &mut Criterion) {
    let mut voice = voice(FilterMode::Bp12);
    c.bench_function("note_on_off", |b| {
        b.iter(|| {
            voice.note_on(black_box(60), black_box(100));
            voice.note_off(black_box(60), 0);
        })
    });
}

criterion_group!(benches, bench_sustained, bench_gliding, bench_note_events);
criterion_main!(benches);
