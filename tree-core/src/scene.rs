//! Composition of every generated part into one renderable scene.

use glam::Vec3;
use rand::Rng;

use crate::{
    branch::BranchTree,
    canopy::canopy,
    config::SceneConfig,
    curve::{helix, seed_spiral},
    error::{Result, TreeError},
    types::{Curve, PointCloud},
};

/// An sRGB color.
pub type Rgb = [u8; 3];

pub const GOLD: Rgb = [255, 215, 0];
pub const WHITE: Rgb = [255, 255, 255];
pub const LIGHT_GREEN: Rgb = [144, 238, 144];
pub const BLACK: Rgb = [0, 0, 0];

/// How a group of points is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub color: Rgb,
    /// Marker diameter in screen points.
    pub size: f32,
}

/// Colors and sizes for each part of the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub seed: MarkerStyle,
    pub trunk: MarkerStyle,
    pub branch_color: Rgb,
    pub branch_width: f32,
    pub canopy: MarkerStyle,
    pub background: Rgb,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            seed: MarkerStyle {
                color: GOLD,
                size: 2.0,
            },
            trunk: MarkerStyle {
                color: WHITE,
                size: 2.0,
            },
            branch_color: WHITE,
            branch_width: 1.0,
            canopy: MarkerStyle {
                color: LIGHT_GREEN,
                size: 3.0,
            },
            background: BLACK,
        }
    }
}

/// Axis-aligned box around the scene geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// The generated tree: seed spiral, trunk, branches and canopy.
#[derive(Debug)]
pub struct Scene {
    pub seed: Curve,
    pub trunk: Curve,
    pub branches: BranchTree,
    pub canopy: PointCloud,
    pub style: Style,
}

impl Scene {
    /// Validates `cfg` and runs every generator once.
    ///
    /// ### Parameters
    /// - `cfg` - Parameters for all four parts.
    /// - `rng` - Random source shared by the branch jitter and the canopy.
    ///
    /// ### Returns
    /// The composed scene with the default [`Style`], or
    /// [`crate::error::TreeError::InvalidParameter`] if `cfg` is rejected or
    /// a part overflows to non-finite coordinates.
    pub fn generate(cfg: &SceneConfig, rng: &mut impl Rng) -> Result<Self> {
        cfg.validate()?;

        let seed = seed_spiral(&cfg.seed_spiral);
        ensure_finite("seed_spiral", seed.points.iter())?;
        let trunk = helix(&cfg.trunk);
        ensure_finite("trunk", trunk.points.iter())?;
        let branches = BranchTree::generate(&cfg.branches, rng);
        ensure_finite(
            "branches",
            branches.segments().flat_map(|s| [&s.start, &s.end]),
        )?;
        let canopy = canopy(&cfg.canopy, rng);
        ensure_finite("canopy", canopy.points.iter())?;

        tracing::info!(
            seed_points = seed.len(),
            trunk_points = trunk.len(),
            segments = branches.len(),
            canopy_points = canopy.len(),
            "generated tree scene"
        );

        Ok(Self {
            seed,
            trunk,
            branches,
            canopy,
            style: Style::default(),
        })
    }

    /// Every point of the scene, segment ends included.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.seed
            .points
            .iter()
            .chain(&self.trunk.points)
            .chain(self.branches.segments().flat_map(|s| [&s.start, &s.end]))
            .chain(&self.canopy.points)
            .copied()
    }

    /// Bounding box of all geometry, or `None` for an empty scene.
    pub fn bounds(&self) -> Option<Bounds> {
        self.points().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds { min: p, max: p },
                Some(b) => Bounds {
                    min: b.min.min(p),
                    max: b.max.max(p),
                },
            })
        })
    }
}

/// Finite inputs can still overflow `f32` once scaled, e.g. a large branch
/// decay compounded over every generation.
fn ensure_finite<'a>(part: &str, mut points: impl Iterator<Item = &'a Vec3>) -> Result<()> {
    match points.find(|p| !p.is_finite()) {
        None => Ok(()),
        Some(p) => {
            tracing::warn!(part, "generated coordinate overflowed: {p}");
            Err(TreeError::invalid(
                part,
                format!("parameters overflow to a non-finite coordinate {p}"),
            ))
        }
    }
}
