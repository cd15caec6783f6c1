//! Plain data types shared by the mesh and animation loaders.

use glam::{Vec2, Vec3, Vec4};

/// `f32` lanes per packed vertex: position 3, normal 3, UV 2, bone
/// weights 4, bone indices 4
pub const VERTEX_STRIDE: usize = 16;

/// Maximum joint influences carried per vertex in the packed layout
pub const MAX_VERTEX_WEIGHTS: usize = 4;

/// One joint of a model's bind-pose hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    /// Joint name as quoted in the file
    pub name: String,
    /// Parent joint index, `-1` for a root; always below this joint's own index
    pub parent: i32,
    /// World-space bind position
    pub position: Vec3,
    /// World-space bind orientation (unit quaternion)
    pub orientation: glam::Quat,
}

impl Joint {
    /// Parent as an index, `None` for a root joint
    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent).ok()
    }
}

/// One joint influence on a vertex
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Weight {
    /// Index of the influencing joint
    pub joint: usize,
    /// Influence strength; all weights of one vertex sum to 1 in
    /// well-formed files
    pub bias: f32,
    /// Offset in the joint's local space
    pub position: Vec3,
}

/// One mesh vertex with its authored inputs and derived bind-pose data
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    /// Texture coordinate
    pub uv: Vec2,
    /// First entry of this vertex's range in the mesh weight list
    pub start_weight: usize,
    /// Number of weights in the range
    pub count_weight: usize,
    /// Bind-pose position, summed from all weighted joint influences
    pub bind_position: Vec3,
    /// Bind-pose smooth normal, averaged from adjacent triangle faces
    pub bind_normal: Vec3,
    /// Bind normal pre-rotated into joint-local space for CPU re-skinning
    pub joint_normal: Vec3,
    /// Up to four influence biases, largest-first when capped
    pub bone_weights: Vec4,
    /// Joint indices matching `bone_weights`, stored as `f32` for direct
    /// vertex-attribute upload
    pub bone_indices: Vec4,
}

/// One triangle, winding as authored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triangle {
    /// Vertex indices
    pub indices: [u32; 3],
}

/// Axis-aligned bounding box of one animation frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bound {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn parent_index_maps_the_root_sentinel() {
        let mut joint = Joint {
            name: "origin".to_string(),
            parent: -1,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        };
        assert_eq!(joint.parent_index(), None);
        joint.parent = 3;
        assert_eq!(joint.parent_index(), Some(3));
    }
}
