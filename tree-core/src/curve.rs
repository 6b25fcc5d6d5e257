//! Parametric curves: the seed spiral and the trunk helix.
//!
//! Both are the same shape, a circle of fixed radius swept upward along the
//! z axis. The angle and the height advance linearly with the sample index.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::{config::CurveConfig, types::Curve};

/// Evenly spaced values from `start` to `end`, both included.
///
/// `n == 1` yields only `start`; `n == 0` yields nothing.
pub fn linspace(start: f32, end: f32, n: usize) -> impl Iterator<Item = f32> {
    let step = if n > 1 {
        (end - start) / (n - 1) as f32
    } else {
        0.0
    };
    (0..n).map(move |i| {
        // Pin the last sample so it does not drift from `end`.
        if n > 1 && i == n - 1 {
            end
        } else {
            start + step * i as f32
        }
    })
}

/// Samples `samples` points of a circle of `radius` that completes `turns`
/// revolutions while rising from `z = 0` to `z = height`.
pub fn parametric_curve(samples: usize, height: f32, radius: f32, turns: f32) -> Curve {
    let points = linspace(0.0, TAU * turns, samples)
        .zip(linspace(0.0, height, samples))
        .map(|(t, z)| Vec3::new(radius * t.cos(), radius * t.sin(), z))
        .collect();

    Curve { points }
}

/// The low, wide spiral the tree sprouts from.
pub fn seed_spiral(cfg: &CurveConfig) -> Curve {
    let curve = parametric_curve(cfg.samples, cfg.height, cfg.radius, cfg.turns);
    tracing::debug!(points = curve.len(), "generated seed spiral");
    curve
}

/// The trunk, a tight helix rising to the branch origin.
pub fn helix(cfg: &CurveConfig) -> Curve {
    let curve = parametric_curve(cfg.samples, cfg.height, cfg.radius, cfg.turns);
    tracing::debug!(points = curve.len(), "generated trunk helix");
    curve
}
