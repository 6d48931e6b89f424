// ABOUTME: Criterion benchmarks for per-frame grading and standards lookups
// ABOUTME: Measures grader throughput for every exercise and table scoring cost
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the grading hot path.
//!
//! A camera pipeline delivers around 30 frames per second, so per-frame
//! grading must stay far below a millisecond.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

#[path = "../tests/common/mod.rs"]
mod common;

use common::{plank_frame, pullup_rep, pushup_rep, situp_rep};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ptgrade::grading::{create_grader, GraderOptions};
use ptgrade_core::models::{ExerciseType, Gender, Participant, PoseFrame};
use ptgrade_standards::{PftPerformance, StandardsEngine, UpperBodyEvent};

/// Ten back-to-back reps (or ten seconds of plank) for `exercise`
fn workout(exercise: ExerciseType) -> Vec<PoseFrame> {
    match exercise {
        ExerciseType::Pushup => (0..10).flat_map(|rep| pushup_rep(f64::from(rep), 0.0)).collect(),
        ExerciseType::Pullup => (0..10).flat_map(|rep| pullup_rep(f64::from(rep), 0.0)).collect(),
        ExerciseType::Situp => (0..10).flat_map(|rep| situp_rep(f64::from(rep), 0.0)).collect(),
        ExerciseType::Plank | ExerciseType::Run => (0..300)
            .map(|i| plank_frame(f64::from(i) / 30.0, 0.0))
            .collect(),
    }
}

fn bench_grade_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade_frames");
    let options = GraderOptions::default();

    for exercise in ExerciseType::GRADED {
        let frames = workout(exercise);
        group.throughput(Throughput::Elements(frames.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(exercise), &frames, |b, frames| {
            b.iter(|| {
                let mut grader = create_grader(exercise, &options).unwrap();
                for frame in frames {
                    black_box(grader.grade_pose(black_box(frame)));
                }
                grader.rep_count()
            });
        });
    }

    group.finish();
}

fn bench_standards_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("standards");
    let engine = StandardsEngine::bundled().unwrap();
    let participant = Participant::new(27, Gender::Female);

    group.bench_function("pushup_lookup", |b| {
        b.iter(|| engine.lookup(ExerciseType::Pushup, black_box(42), participant));
    });
    group.bench_function("run_lookup", |b| {
        b.iter(|| engine.lookup(ExerciseType::Run, black_box(23 * 60 + 17), participant));
    });
    group.bench_function("plank_lookup", |b| {
        b.iter(|| engine.lookup(ExerciseType::Plank, black_box(150), participant));
    });

    let performance = PftPerformance {
        upper_body: Some(UpperBodyEvent::Pullups(12)),
        plank_seconds: 165,
        run_seconds: 22 * 60,
    };
    group.bench_function("score_pft", |b| {
        b.iter(|| engine.score_pft(black_box(&performance), participant));
    });

    group.bench_function("load_bundled", |b| {
        b.iter(|| StandardsEngine::bundled().unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_grade_frames, bench_standards_lookup);
criterion_main!(benches);
