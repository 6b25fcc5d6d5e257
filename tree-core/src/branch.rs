//! Recursive branch generation.
//!
//! Every call emits one segment and forks into two children rotated by
//! `±spread` about the z axis, each `decay` times as long as its parent. The
//! segments are stored in an arena in generation order: depth first, a node
//! before its children, the `+spread` child fully expanded before the
//! `-spread` one.

use glam::{Mat3, Vec3};
use rand::Rng;

use crate::{
    config::{BranchConfig, MAX_BRANCH_DEPTH},
    types::{NodeId, Segment},
};

#[derive(Debug)]
pub struct BranchNode {
    pub segment: Segment,
    /// Direction the segment was grown along, before jitter.
    pub direction: Vec3,
    /// Length multiplier applied to `direction`.
    pub length: f32,
    /// 0 for the first segment, 1 for its children, and so on.
    pub generation: u32,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct BranchTree {
    pub nodes: Vec<BranchNode>,
}

impl BranchTree {
    /// Grows a branch tree from the origin and direction in `cfg`.
    pub fn generate(cfg: &BranchConfig, rng: &mut impl Rng) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(segment_count(cfg.depth.min(MAX_BRANCH_DEPTH))),
        };
        tree.grow(None, cfg.origin, cfg.direction, cfg.depth, cfg.length, cfg, rng);
        tracing::debug!(
            depth = cfg.depth,
            segments = tree.nodes.len(),
            "generated branches"
        );
        tree
    }

    #[allow(clippy::too_many_arguments)]
    fn grow(
        &mut self,
        parent: Option<NodeId>,
        origin: Vec3,
        direction: Vec3,
        depth: u32,
        length: f32,
        cfg: &BranchConfig,
        rng: &mut impl Rng,
    ) {
        if depth == 0 {
            return;
        }

        let end = origin + direction * length + jitter(cfg.jitter, rng);
        let id = self.push(parent, Segment::new(origin, end), direction, length);

        for angle in [cfg.spread, -cfg.spread] {
            let child_dir = Mat3::from_rotation_z(angle) * direction;
            self.grow(Some(id), end, child_dir, depth - 1, length * cfg.decay, cfg, rng);
        }
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        segment: Segment,
        direction: Vec3,
        length: f32,
    ) -> NodeId {
        let id = self.nodes.len();
        let generation = parent.map_or(0, |p| self.nodes[p].generation + 1);
        self.nodes.push(BranchNode {
            segment,
            direction,
            length,
            generation,
            parent,
            children: Vec::with_capacity(2),
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Segments in generation order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.nodes.iter().map(|n| &n.segment)
    }

    /// Nodes without children, i.e. the outermost twigs.
    pub fn tips(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.children.is_empty().then_some(i))
    }
}

/// Generates the flat segment list for a single branch call.
///
/// `origin`, `direction`, `depth` and `length` override those in `cfg`; the
/// decay, spread and jitter settings are taken from it.
pub fn branch(
    origin: Vec3,
    direction: Vec3,
    depth: u32,
    length: f32,
    cfg: &BranchConfig,
    rng: &mut impl Rng,
) -> Vec<Segment> {
    let cfg = BranchConfig {
        origin,
        direction,
        depth,
        length,
        ..*cfg
    };
    BranchTree::generate(&cfg, rng)
        .nodes
        .into_iter()
        .map(|n| n.segment)
        .collect()
}

/// Number of segments produced for a given recursion depth.
///
/// Saturates at `usize::MAX` when the count does not fit.
pub fn segment_count(depth: u32) -> usize {
    1usize.checked_shl(depth).map_or(usize::MAX, |v| v - 1)
}

/// Per-axis offset drawn uniformly from `[-amount / 2, amount / 2)`.
fn jitter(amount: f32, rng: &mut impl Rng) -> Vec3 {
    let x = (rng.random::<f32>() - 0.5) * amount;
    let y = (rng.random::<f32>() - 0.5) * amount;
    let z = (rng.random::<f32>() - 0.5) * amount;
    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::f32::consts::FRAC_PI_6;

    const EPS: f32 = 1e-5;

    fn still() -> BranchConfig {
        BranchConfig {
            origin: Vec3::new(0.0, 0.0, 6.0),
            direction: Vec3::new(0.0, 1.0, 1.0),
            depth: 2,
            length: 2.0,
            jitter: 0.0,
            ..BranchConfig::default()
        }
    }

    #[test]
    fn depth_zero_produces_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = BranchConfig {
            depth: 0,
            ..BranchConfig::default()
        };
        assert!(BranchTree::generate(&cfg, &mut rng).is_empty());
    }

    #[test]
    fn segment_count_doubles_per_generation() {
        let mut rng = StdRng::seed_from_u64(7);
        for (depth, expected) in [(0, 0), (1, 1), (2, 3), (3, 7), (4, 15), (6, 63)] {
            let cfg = BranchConfig {
                depth,
                ..BranchConfig::default()
            };
            let tree = BranchTree::generate(&cfg, &mut rng);
            assert_eq!(tree.len(), expected, "depth {depth}");
            assert_eq!(segment_count(depth), expected);
        }
    }

    #[test]
    fn segment_count_saturates_instead_of_overflowing() {
        assert_eq!(segment_count(usize::BITS - 1), (1usize << (usize::BITS - 1)) - 1);
        assert_eq!(segment_count(usize::BITS), usize::MAX);
        assert_eq!(segment_count(u32::MAX), usize::MAX);
    }

    #[test]
    fn zero_jitter_scenario_matches_hand_computed_ends() {
        let mut rng = StdRng::seed_from_u64(0);
        let segs = branch(
            Vec3::new(0.0, 0.0, 6.0),
            Vec3::new(0.0, 1.0, 1.0),
            2,
            2.0,
            &still(),
            &mut rng,
        );

        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].start, Vec3::new(0.0, 0.0, 6.0));
        assert!((segs[0].end - Vec3::new(0.0, 2.0, 8.0)).length() < EPS);

        let (s, c) = FRAC_PI_6.sin_cos();
        let left = Vec3::new(0.0, 2.0, 8.0) + Vec3::new(-s, c, 1.0) * 1.4;
        let right = Vec3::new(0.0, 2.0, 8.0) + Vec3::new(s, c, 1.0) * 1.4;

        assert!((segs[1].start - segs[0].end).length() < EPS);
        assert!((segs[1].end - left).length() < EPS, "{:?}", segs[1].end);
        assert!((segs[2].start - segs[0].end).length() < EPS);
        assert!((segs[2].end - right).length() < EPS, "{:?}", segs[2].end);
    }

    #[test]
    fn jitter_stays_within_half_width_per_axis() {
        let mut rng = StdRng::seed_from_u64(42);
        let tree = BranchTree::generate(&BranchConfig::default(), &mut rng);

        for n in &tree.nodes {
            let ideal = n.segment.start + n.direction * n.length;
            let off = n.segment.end - ideal;
            assert!(off.abs().max_element() <= 0.05 + EPS, "offset {off:?}");
            assert!(off.length() <= 0.087);
        }
    }

    #[test]
    fn children_decay_to_seventy_percent() {
        let mut rng = StdRng::seed_from_u64(3);
        let tree = BranchTree::generate(&BranchConfig::default(), &mut rng);

        for n in &tree.nodes {
            for &c in &n.children {
                let child = &tree.nodes[c];
                assert!((child.length - n.length * 0.7).abs() < EPS);
                assert!((child.direction.length() - n.direction.length()).abs() < EPS);
            }
        }
    }

    #[test]
    fn still_segments_shrink_by_the_decay() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = BranchConfig {
            depth: 4,
            ..still()
        };
        let tree = BranchTree::generate(&cfg, &mut rng);

        let root = tree.nodes[0].segment.length();
        assert!((root - 2.0 * 2f32.sqrt()).abs() < EPS);

        for n in &tree.nodes {
            for &c in &n.children {
                let ratio = tree.nodes[c].segment.length() / n.segment.length();
                assert!((ratio - 0.7).abs() < EPS, "ratio {ratio}");
            }
        }
    }

    #[test]
    fn children_start_where_parent_ends() {
        let mut rng = StdRng::seed_from_u64(9);
        let tree = BranchTree::generate(&BranchConfig::default(), &mut rng);

        for (id, n) in tree.nodes.iter().enumerate() {
            match n.parent {
                None => assert_eq!(id, 0),
                Some(p) => {
                    assert_eq!(n.segment.start, tree.nodes[p].segment.end);
                    assert_eq!(n.generation, tree.nodes[p].generation + 1);
                    assert!(tree.nodes[p].children.contains(&id));
                }
            }
        }
    }

    #[test]
    fn arena_order_is_depth_first_left_before_right() {
        let mut rng = StdRng::seed_from_u64(5);
        let cfg = BranchConfig {
            depth: 3,
            ..BranchConfig::default()
        };
        let tree = BranchTree::generate(&cfg, &mut rng);

        // 0 -> (1 -> (2, 3), 4 -> (5, 6))
        assert_eq!(tree.nodes[0].children, vec![1, 4]);
        assert_eq!(tree.nodes[1].children, vec![2, 3]);
        assert_eq!(tree.nodes[4].children, vec![5, 6]);
        assert_eq!(tree.tips().collect::<Vec<_>>(), vec![2, 3, 5, 6]);

        // The first child turns towards -x for a +y heading.
        assert!(tree.nodes[1].direction.x < 0.0);
        assert!(tree.nodes[4].direction.x > 0.0);
    }

    #[test]
    fn same_seed_reproduces_the_same_tree() {
        let a = BranchTree::generate(&BranchConfig::default(), &mut StdRng::seed_from_u64(11));
        let b = BranchTree::generate(&BranchConfig::default(), &mut StdRng::seed_from_u64(11));

        let sa: Vec<_> = a.segments().copied().collect();
        let sb: Vec<_> = b.segments().copied().collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn rotation_keeps_the_vertical_component() {
        let mut rng = StdRng::seed_from_u64(2);
        let tree = BranchTree::generate(&still(), &mut rng);
        for n in &tree.nodes {
            assert!((n.direction.z - 1.0).abs() < EPS);
        }
    }
}
