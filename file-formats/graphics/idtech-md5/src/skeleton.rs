//! Skeleton snapshots: per-frame construction and pairwise interpolation.
//!
//! An animation stores each frame as a compact float array; expanding one
//! into world-space joint transforms walks the hierarchy in file order,
//! which is guaranteed (checked at load) to list every parent before its
//! children. Orientations are stored as quaternion `x,y,z` with `w`
//! reconstructed on the negative root; see [`compute_quaternion_w`].

use glam::{Mat4, Quat, Vec3};

use crate::anim::{BaseFrameJoint, ComponentFlags, FrameData, JointInfo};

/// One joint of a resolved skeleton snapshot, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonJoint {
    /// Parent joint index, `-1` for a root
    pub parent: i32,
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
}

impl SkeletonJoint {
    /// Parent as an index, `None` for a root joint
    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent).ok()
    }
}

/// One fully-resolved snapshot of all joints' world transforms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    /// Joints in file order, parents before children
    pub joints: Vec<SkeletonJoint>,
    /// Per-joint `translation * rotation` matrices. Populated on live
    /// (interpolated) skeletons; the per-frame snapshots built at load
    /// leave this empty until they are made live.
    pub matrices: Vec<Mat4>,
}

impl Skeleton {
    /// Number of joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Recomputes the matrix list from the current joints
    pub fn rebuild_matrices(&mut self) {
        self.matrices.clear();
        self.matrices.extend(
            self.joints
                .iter()
                .map(|joint| Mat4::from_translation(joint.position) * Mat4::from_quat(joint.orientation)),
        );
    }

    /// Overwrites `self` with the interpolation of `a` and `b` at `t` and
    /// rebuilds the matrix list.
    ///
    /// Positions interpolate linearly, orientations by shortest-path
    /// slerp. Parent links are taken from `a`; both inputs are expected to
    /// share one hierarchy.
    pub fn interpolate_between(&mut self, a: &Skeleton, b: &Skeleton, t: f32) {
        let count = a.joints.len().min(b.joints.len());
        self.joints.clear();
        self.matrices.clear();
        self.joints.reserve(count);
        self.matrices.reserve(count);
        for index in 0..count {
            let ja = &a.joints[index];
            let jb = &b.joints[index];
            let position = ja.position.lerp(jb.position, t);
            let orientation = ja.orientation.slerp(jb.orientation, t);
            self.joints.push(SkeletonJoint {
                parent: ja.parent,
                position,
                orientation,
            });
            self.matrices
                .push(Mat4::from_translation(position) * Mat4::from_quat(orientation));
        }
    }
}

/// Reconstructs a quaternion's `w` from its stored `x,y,z`.
///
/// The format stores unit quaternions without `w`; this rebuilds it on the
/// *negative* root, `w = -sqrt(max(0, 1 - x^2 - y^2 - z^2))`. The negative
/// convention is used consistently everywhere a quaternion is read, so both
/// slerp endpoints carry the same global sign and the rotation it encodes
/// is unchanged. Inputs with `x^2 + y^2 + z^2 > 1` clamp to exactly `0.0`,
/// never NaN.
pub fn compute_quaternion_w(x: f32, y: f32, z: f32) -> f32 {
    let remainder = 1.0 - x * x - y * y - z * z;
    if remainder < 0.0 { 0.0 } else { -remainder.sqrt() }
}

/// Expands one frame's packed floats into a world-space skeleton.
///
/// Each joint starts from its base-frame pose; components whose flag bits
/// are set are overwritten from the frame array in the fixed order
/// TX, TY, TZ, QX, QY, QZ starting at the joint's `start_index`. Joints are
/// processed in ascending index order so every parent is resolved before
/// its children compose against it.
pub(crate) fn build_frame_skeleton(
    joint_infos: &[JointInfo],
    base_frame: &[BaseFrameJoint],
    frame: &FrameData,
) -> Skeleton {
    let mut joints: Vec<SkeletonJoint> = Vec::with_capacity(joint_infos.len());
    for (index, info) in joint_infos.iter().enumerate() {
        let base = &base_frame[index];
        let mut position = base.position;
        let (mut qx, mut qy, mut qz) = (base.orientation.x, base.orientation.y, base.orientation.z);
        let mut cursor = info.start_index;
        let mut take = |cursor: &mut usize| {
            let value = frame.components[*cursor];
            *cursor += 1;
            value
        };
        if info.flags.contains(ComponentFlags::TRANSLATE_X) {
            position.x = take(&mut cursor);
        }
        if info.flags.contains(ComponentFlags::TRANSLATE_Y) {
            position.y = take(&mut cursor);
        }
        if info.flags.contains(ComponentFlags::TRANSLATE_Z) {
            position.z = take(&mut cursor);
        }
        if info.flags.contains(ComponentFlags::QUAT_X) {
            qx = take(&mut cursor);
        }
        if info.flags.contains(ComponentFlags::QUAT_Y) {
            qy = take(&mut cursor);
        }
        if info.flags.contains(ComponentFlags::QUAT_Z) {
            qz = take(&mut cursor);
        }
        let mut orientation = Quat::from_xyzw(qx, qy, qz, compute_quaternion_w(qx, qy, qz));
        if let Some(parent) = info.parent_index() {
            let parent = &joints[parent];
            position = parent.position + parent.orientation * position;
            orientation = (parent.orientation * orientation).normalize();
        }
        joints.push(SkeletonJoint {
            parent: info.parent,
            position,
            orientation,
        });
    }
    Skeleton {
        joints,
        matrices: Vec::new(),
    }
}
