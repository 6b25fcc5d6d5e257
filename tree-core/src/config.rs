//! Generation parameters for every part of the scene.
//!
//! [`SceneConfig::default`] reproduces the classic figure: a three-turn seed
//! spiral, a five-turn trunk helix six units tall, a depth-4 branch fan
//! starting at the top of the trunk and an 800-point canopy above it.

use std::f32::consts::FRAC_PI_6;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TreeError};

/// Deepest branch recursion accepted by [`SceneConfig::validate`].
///
/// Segment count grows as `2^depth`, so this keeps a scene to ~65k lines.
pub const MAX_BRANCH_DEPTH: u32 = 16;

/// A vertical curve sampled on a circle of `radius` while rising to `height`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    pub samples: usize,
    pub height: f32,
    pub radius: f32,
    /// Full revolutions swept between the first and last sample.
    pub turns: f32,
}

impl CurveConfig {
    pub fn seed_spiral() -> Self {
        Self {
            samples: 300,
            height: 2.0,
            radius: 0.2,
            turns: 3.0,
        }
    }

    pub fn trunk() -> Self {
        Self {
            samples: 400,
            height: 6.0,
            radius: 0.1,
            turns: 5.0,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        check_finite(name, "height", self.height)?;
        check_non_negative(name, "radius", self.radius)?;
        check_finite(name, "turns", self.turns)?;
        Ok(())
    }
}

/// A curve section as written in a config file; omitted fields keep the
/// section's own defaults.
#[derive(Deserialize)]
struct CurvePatch {
    samples: Option<usize>,
    height: Option<f32>,
    radius: Option<f32>,
    turns: Option<f32>,
}

impl CurvePatch {
    fn apply(self, base: CurveConfig) -> CurveConfig {
        CurveConfig {
            samples: self.samples.unwrap_or(base.samples),
            height: self.height.unwrap_or(base.height),
            radius: self.radius.unwrap_or(base.radius),
            turns: self.turns.unwrap_or(base.turns),
        }
    }
}

fn seed_spiral_section<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<CurveConfig, D::Error> {
    CurvePatch::deserialize(d).map(|p| p.apply(CurveConfig::seed_spiral()))
}

fn trunk_section<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<CurveConfig, D::Error> {
    CurvePatch::deserialize(d).map(|p| p.apply(CurveConfig::trunk()))
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    pub origin: Vec3,
    /// Growth direction of the first segment; it is not normalized.
    pub direction: Vec3,
    pub depth: u32,
    pub length: f32,
    /// Length ratio between a child segment and its parent.
    pub decay: f32,
    /// Rotation about the z axis applied to each child, in radians.
    pub spread: f32,
    /// Full width of the per-axis uniform jitter added to each segment end.
    pub jitter: f32,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 0.0, 6.0),
            direction: Vec3::new(0.0, 1.0, 1.0),
            depth: 4,
            length: 2.0,
            decay: 0.7,
            spread: FRAC_PI_6,
            jitter: 0.1,
        }
    }
}

impl BranchConfig {
    fn validate(&self) -> Result<()> {
        check_vec("branches", "origin", self.origin)?;
        check_vec("branches", "direction", self.direction)?;
        if self.depth > MAX_BRANCH_DEPTH {
            return Err(TreeError::invalid(
                "branches.depth",
                format!("{} exceeds the maximum of {MAX_BRANCH_DEPTH}", self.depth),
            ));
        }
        check_non_negative("branches", "length", self.length)?;
        check_non_negative("branches", "decay", self.decay)?;
        check_finite("branches", "spread", self.spread)?;
        check_non_negative("branches", "jitter", self.jitter)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    pub center: Vec3,
    pub radius: f32,
    pub points: usize,
}

impl Default for CanopyConfig {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 0.0, 8.0),
            radius: 1.5,
            points: 800,
        }
    }
}

impl CanopyConfig {
    fn validate(&self) -> Result<()> {
        check_vec("canopy", "center", self.center)?;
        check_non_negative("canopy", "radius", self.radius)?;
        Ok(())
    }
}

/// Parameters for a whole [`crate::scene::Scene`].
///
/// When deserialized, omitted sections and omitted fields fall back to their
/// defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    #[serde(deserialize_with = "seed_spiral_section")]
    pub seed_spiral: CurveConfig,
    #[serde(deserialize_with = "trunk_section")]
    pub trunk: CurveConfig,
    pub branches: BranchConfig,
    pub canopy: CanopyConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed_spiral: CurveConfig::seed_spiral(),
            trunk: CurveConfig::trunk(),
            branches: BranchConfig::default(),
            canopy: CanopyConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Reads a JSON config file.
    ///
    /// The result is validated before it is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TreeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json(&text).map_err(|source| TreeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(cfg)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Rejects non-finite or negative parameters and branch depths beyond
    /// [`MAX_BRANCH_DEPTH`].
    ///
    /// Finite values can still overflow once combined (a huge `decay`
    /// compounded per generation); [`crate::scene::Scene::generate`] checks
    /// the generated coordinates for that.
    pub fn validate(&self) -> Result<()> {
        let res = self
            .seed_spiral
            .validate("seed_spiral")
            .and_then(|_| self.trunk.validate("trunk"))
            .and_then(|_| self.branches.validate())
            .and_then(|_| self.canopy.validate());

        if let Err(e) = &res {
            tracing::warn!("rejected scene config: {e}");
        }
        res
    }
}

fn check_finite(section: &str, name: &str, v: f32) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(TreeError::invalid(format!("{section}.{name}"), format!("{v} is not finite")))
    }
}

fn check_non_negative(section: &str, name: &str, v: f32) -> Result<()> {
    check_finite(section, name, v)?;
    if v < 0.0 {
        return Err(TreeError::invalid(format!("{section}.{name}"), format!("{v} is negative")));
    }
    Ok(())
}

fn check_vec(section: &str, name: &str, v: Vec3) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(TreeError::invalid(format!("{section}.{name}"), format!("{v} is not finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn default_matches_classic_figure() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.seed_spiral.samples, 300);
        assert_eq!(cfg.trunk.samples, 400);
        assert_eq!(cfg.branches.origin, Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(cfg.branches.direction, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(cfg.branches.depth, 4);
        assert_eq!(cfg.canopy.center, Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(cfg.canopy.points, 800);
    }

    #[test]
    fn negative_radius_is_rejected() {
        let mut cfg = SceneConfig::default();
        cfg.canopy.radius = -1.0;

        match cfg.validate() {
            Err(TreeError::InvalidParameter { name, .. }) => assert_eq!(name, "canopy.radius"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut cfg = SceneConfig::default();
        cfg.trunk.height = f32::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = SceneConfig::default();
        cfg.branches.direction = Vec3::new(0.0, f32::INFINITY, 1.0);
        match cfg.validate() {
            Err(TreeError::InvalidParameter { name, .. }) => {
                assert_eq!(name, "branches.direction")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn excessive_depth_is_rejected() {
        let mut cfg = SceneConfig::default();
        cfg.branches.depth = MAX_BRANCH_DEPTH + 1;
        assert!(cfg.validate().is_err());

        cfg.branches.depth = MAX_BRANCH_DEPTH;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_counts_are_accepted() {
        let mut cfg = SceneConfig::default();
        cfg.seed_spiral.samples = 0;
        cfg.branches.depth = 0;
        cfg.canopy.points = 0;
        cfg.canopy.radius = 0.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = SceneConfig::from_json(r#"{ "branches": { "depth": 2 }, "canopy": { "points": 10 } }"#)
            .unwrap();

        assert_eq!(cfg.branches.depth, 2);
        assert_eq!(cfg.branches.length, 2.0);
        assert_eq!(cfg.canopy.points, 10);
        assert_eq!(cfg.canopy.radius, 1.5);
        assert_eq!(cfg.trunk, CurveConfig::trunk());
    }

    #[test]
    fn partial_curve_sections_keep_their_own_defaults() {
        let cfg = SceneConfig::from_json(
            r#"{ "seed_spiral": { "turns": 4.0 }, "trunk": { "samples": 10 } }"#,
        )
        .unwrap();

        assert_eq!(
            cfg.seed_spiral,
            CurveConfig {
                turns: 4.0,
                ..CurveConfig::seed_spiral()
            }
        );
        assert_eq!(
            cfg.trunk,
            CurveConfig {
                samples: 10,
                ..CurveConfig::trunk()
            }
        );
    }

    #[test]
    fn negative_depth_fails_to_parse() {
        let res = SceneConfig::from_json(r#"{ "branches": { "depth": -1 } }"#);
        assert!(res.is_err());
    }

    #[test]
    fn json_round_trips_vectors() {
        let cfg = SceneConfig::from_json(r#"{ "canopy": { "center": [1.0, 2.0, 3.0] } }"#).unwrap();
        assert_eq!(cfg.canopy.center, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn load_reports_missing_file() {
        let res = SceneConfig::load("/nonexistent/tree-scene.json");
        assert!(matches!(res, Err(TreeError::ConfigIo { .. })));
    }
}
