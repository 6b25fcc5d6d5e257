use glam::Vec3;

/// Identifier for a node in a [`crate::branch::BranchTree`].
///
/// This is an index into `BranchTree::nodes`, and is only meaningful within
/// the lifetime of a given `BranchTree` instance.
pub type NodeId = usize;

/// One straight branch piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// Ordered samples of a parametric curve.
///
/// The points carry no connectivity; they are drawn as a scatter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    pub points: Vec<Vec3>,
}

impl Curve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Unordered points filling a sphere.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    pub center: Vec3,
    pub radius: f32,
    pub points: Vec<Vec3>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
