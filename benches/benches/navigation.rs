// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use cartograph_gesture::{GestureTracker, GestureUpdate, TouchAction};
use cartograph_viewport::{PanMode, Viewport, ViewportLimits, ZoomLimits, ZoomMode};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Vec2};

fn viewport() -> Viewport {
    let mut vp = Viewport::new();
    let envelope = Rect::new(-20_000.0, -10_000.0, 20_000.0, 10_000.0);
    let _ = vp.try_initialize(Some(envelope), 1280.0, 720.0);
    vp
}

fn navigation_limits(pan_mode: PanMode) -> ViewportLimits {
    ViewportLimits {
        pan_mode,
        zoom_mode: ZoomMode::KeepWithinResolutions,
        zoom_limits: Some(ZoomLimits::new(0.25, 64.0)),
        ..ViewportLimits::default()
    }
}

/// Pointer pairs of a pinch that spreads and twists over `steps` events.
fn pinch_frames(steps: usize) -> Vec<[Point; 2]> {
    let center = Point::new(640.0, 360.0);
    (0..steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let arm = Vec2::from_angle((t * 90.0).to_radians()) * (40.0 + 200.0 * t);
            [center - arm, center + arm]
        })
        .collect()
}

fn drag_frames(steps: usize) -> Vec<Point> {
    (0..steps)
        .map(|i| Point::new(100.0 + i as f64 * 3.0, 200.0 + i as f64))
        .collect()
}

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cartograph_navigation");
    group.sample_size(50);
    let envelope = Some(Rect::new(-20_000.0, -10_000.0, 20_000.0, 10_000.0));

    for &steps in &[60_usize, 600] {
        let frames = drag_frames(steps);
        for pan_mode in [PanMode::KeepCenterWithinExtent, PanMode::KeepWithinExtent] {
            let limits = navigation_limits(pan_mode);
            group.bench_function(format!("drag(steps={steps},{pan_mode:?})"), |b| {
                b.iter_batched(
                    || (viewport(), GestureTracker::default()),
                    |(mut vp, mut tracker)| {
                        tracker.handle(TouchAction::Down, &frames[..1], vp.rotation());
                        for p in &frames {
                            let pointers = core::slice::from_ref(p);
                            if let GestureUpdate::Pan(delta) =
                                tracker.handle(TouchAction::Move, pointers, vp.rotation())
                            {
                                delta.apply_to(&mut vp);
                                limits.limit_extent(&mut vp, envelope);
                            }
                        }
                        black_box(vp.center());
                    },
                    BatchSize::SmallInput,
                );
            });
        }

        let frames = pinch_frames(steps);
        let limits = navigation_limits(PanMode::KeepWithinExtent);
        group.bench_function(format!("pinch_rotate(steps={steps})"), |b| {
            b.iter_batched(
                || (viewport(), GestureTracker::default()),
                |(mut vp, mut tracker)| {
                    tracker.handle(TouchAction::PointerDown(1), &frames[0], vp.rotation());
                    for pair in &frames {
                        if let GestureUpdate::Pinch(delta) =
                            tracker.handle(TouchAction::Move, pair, vp.rotation())
                        {
                            delta.apply_to(&mut vp);
                            limits.limit(&mut vp, envelope);
                        }
                    }
                    black_box((vp.resolution(), vp.rotation()));
                },
                BatchSize::SmallInput,
            );
        });
    }

    let vp = viewport();
    let points: Vec<Point> = (0..1024)
        .map(|i| Point::new(f64::from(i) * 7.0, f64::from(i % 720)))
        .collect();
    group.bench_function("screen_world_roundtrip(n=1024)", |b| {
        b.iter(|| {
            let sum = points
                .iter()
                .map(|p| vp.world_to_screen(vp.screen_to_world(*p)))
                .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
            black_box(sum);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_navigation);
criterion_main!(benches);
