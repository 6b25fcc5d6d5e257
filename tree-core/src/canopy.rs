use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::{config::CanopyConfig, types::PointCloud};

/// Fills a sphere with points of uniform density.
///
/// The polar angle is drawn through its cosine and the radius through a cube
/// root, so points neither bunch at the poles nor at the center.
pub fn canopy(cfg: &CanopyConfig, rng: &mut impl Rng) -> PointCloud {
    let points = (0..cfg.points)
        .map(|_| cfg.center + random_in_ball(cfg.radius, rng))
        .collect::<Vec<_>>();

    tracing::debug!(points = points.len(), radius = cfg.radius, "generated canopy");

    PointCloud {
        center: cfg.center,
        radius: cfg.radius,
        points,
    }
}

fn random_in_ball(radius: f32, rng: &mut impl Rng) -> Vec3 {
    let phi = rng.random::<f32>() * TAU;
    let cos_theta = rng.random::<f32>() * 2.0 - 1.0;
    let u = rng.random::<f32>();

    let theta = cos_theta.acos();
    let r = radius * u.cbrt();

    Vec3::new(
        r * theta.sin() * phi.cos(),
        r * theta.sin() * phi.sin(),
        r * theta.cos(),
    )
}
