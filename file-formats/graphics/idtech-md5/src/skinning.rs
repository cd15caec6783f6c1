//! Per-tick vertex skinning against a posed skeleton.
//!
//! CPU skinning rewrites the position and normal floats of the packed
//! vertex buffer in place each tick, using the full weight range of every
//! vertex. GPU skinning leaves the buffer in the bind pose and relies on
//! the joint matrix palette written by
//! [`Md5Model::write_joint_matrices`](crate::model::Md5Model::write_joint_matrices).

use glam::Vec3;

use crate::mesh::Md5Mesh;
use crate::skeleton::Skeleton;
use crate::types::VERTEX_STRIDE;

/// Where vertex posing happens each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkinningMethod {
    /// Rewrite positions and normals on the CPU every tick
    #[default]
    Cpu,
    /// Keep the bind-pose buffer and pose in the vertex shader from the
    /// joint matrix palette
    Gpu,
}

impl Md5Mesh {
    /// Re-poses positions and normals in the packed vertex buffer against
    /// `skeleton`, leaving texture coordinates and influence slots alone.
    ///
    /// The skeleton must expose every joint the mesh weights reference;
    /// skeletons built from animations attached through
    /// [`Md5Model::add_animation`](crate::model::Md5Model::add_animation)
    /// always do.
    pub fn apply_skeleton(&mut self, skeleton: &Skeleton) {
        let weights = &self.weights;
        for (index, vertex) in self.vertices.iter().enumerate() {
            let mut position = Vec3::ZERO;
            let mut normal = Vec3::ZERO;
            let range = &weights[vertex.start_weight..vertex.start_weight + vertex.count_weight];
            for weight in range {
                let joint = &skeleton.joints[weight.joint];
                position += (joint.position + joint.orientation * weight.position) * weight.bias;
                normal += (joint.orientation * vertex.joint_normal) * weight.bias;
            }
            let base = index * VERTEX_STRIDE;
            self.vertex_data[base..base + 3].copy_from_slice(&position.to_array());
            self.vertex_data[base + 3..base + 6].copy_from_slice(&normal.to_array());
        }
    }

    /// Restores the packed vertex buffer to the bind pose
    pub fn reset_to_bind_pose(&mut self) {
        for (index, vertex) in self.vertices.iter().enumerate() {
            let base = index * VERTEX_STRIDE;
            self.vertex_data[base..base + 3].copy_from_slice(&vertex.bind_position.to_array());
            self.vertex_data[base + 3..base + 6].copy_from_slice(&vertex.bind_normal.to_array());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Quat;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::skeleton::SkeletonJoint;
    use crate::tokenizer::TextCursor;
    use crate::types::Joint;

    fn joints() -> Vec<Joint> {
        vec![
            Joint {
                name: "origin".to_string(),
                parent: -1,
                position: Vec3::ZERO,
                orientation: Quat::IDENTITY,
            },
            Joint {
                name: "tip".to_string(),
                parent: 0,
                position: Vec3::new(0.0, 10.0, 0.0),
                orientation: Quat::IDENTITY,
            },
        ]
    }

    fn bind_skeleton() -> Skeleton {
        let mut skeleton = Skeleton::default();
        for joint in joints() {
            skeleton.joints.push(SkeletonJoint {
                parent: joint.parent,
                position: joint.position,
                orientation: joint.orientation,
            });
        }
        skeleton.rebuild_matrices();
        skeleton
    }

    fn quad_mesh() -> Md5Mesh {
        let body = r#"	shader "models/test/quad"
	numverts 3
	vert 0 ( 0 0 ) 0 1
	vert 1 ( 1 0 ) 1 1
	vert 2 ( 0 1 ) 2 1
	numtris 1
	tri 0 0 1 2
	numweights 3
	weight 0 0 1.0 ( 0 0 0 )
	weight 1 0 1.0 ( 1 0 0 )
	weight 2 1 1.0 ( 1 0 0 )
}
"#;
        let mut cursor = TextCursor::new(body);
        Md5Mesh::parse(&mut cursor, &joints()).unwrap()
    }

    #[test]
    fn bind_pose_skeleton_reproduces_the_bind_buffer() {
        let mut mesh = quad_mesh();
        let before = mesh.vertex_data().to_vec();
        mesh.apply_skeleton(&bind_skeleton());
        for (posed, bind) in mesh.vertex_data().iter().zip(&before) {
            assert!((posed - bind).abs() < 1e-5);
        }
    }

    #[test]
    fn translating_a_joint_moves_its_vertices() {
        let mut mesh = quad_mesh();
        let mut skeleton = bind_skeleton();
        skeleton.joints[1].position += Vec3::new(0.0, 2.0, 0.0);
        mesh.apply_skeleton(&skeleton);
        // Vertex 2 is fully bound to `tip`; vertex 0 to `origin`.
        let v2 = &mesh.vertex_data()[2 * VERTEX_STRIDE..2 * VERTEX_STRIDE + 3];
        assert_eq!(v2, &[1.0, 12.0, 0.0]);
        let v0 = &mesh.vertex_data()[..3];
        assert_eq!(v0, &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn rotating_a_joint_rotates_its_normals() {
        let mut mesh = quad_mesh();
        let mut skeleton = bind_skeleton();
        skeleton.joints[0].orientation = Quat::from_rotation_y(FRAC_PI_2);
        mesh.apply_skeleton(&skeleton);
        // Vertex 0 is fully bound to `origin`; its -Z bind normal swings to -X.
        let normal = Vec3::from_slice(&mesh.vertex_data()[3..6]);
        assert!((normal - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn reset_restores_the_bind_pose() {
        let mut mesh = quad_mesh();
        let before = mesh.vertex_data().to_vec();
        let mut skeleton = bind_skeleton();
        skeleton.joints[0].position = Vec3::new(5.0, 5.0, 5.0);
        skeleton.joints[1].position = Vec3::new(-5.0, 0.0, 1.0);
        mesh.apply_skeleton(&skeleton);
        assert_ne!(mesh.vertex_data(), before.as_slice());
        mesh.reset_to_bind_pose();
        assert_eq!(mesh.vertex_data(), before.as_slice());
    }

    #[test]
    fn uvs_and_influences_survive_reskinning() {
        let mut mesh = quad_mesh();
        let before = mesh.vertex_data().to_vec();
        let mut skeleton = bind_skeleton();
        skeleton.joints[1].position = Vec3::new(3.0, 3.0, 3.0);
        mesh.apply_skeleton(&skeleton);
        for index in 0..mesh.vertices().len() {
            let base = index * VERTEX_STRIDE;
            assert_eq!(
                &mesh.vertex_data()[base + 6..base + 16],
                &before[base + 6..base + 16]
            );
        }
    }
}
