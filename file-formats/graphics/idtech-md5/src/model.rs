//! `.md5mesh` models and the animation playback runtime.
//!
//! A model owns the bind-pose joints, its meshes, and any number of
//! attached animations. Two playback slots drive the pose: one slot is
//! plain playback, two slots are blended by a weight factor. Each tick
//! the model advances the active clocks, picks or mixes a skeleton, and
//! either re-skins the vertex buffers on the CPU or leaves them in the
//! bind pose for GPU skinning against the joint matrix palette.

use std::fs;
use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use log::{debug, warn};

use crate::anim::{Md5Animation, check_parent_link};
use crate::error::{Md5Error, Result};
use crate::mesh::Md5Mesh;
use crate::render::{MatrixSink, TextureLookup, UniformSink};
use crate::skeleton::{Skeleton, compute_quaternion_w};
use crate::skinning::SkinningMethod;
use crate::tokenizer::TextCursor;
use crate::types::Joint;
use crate::version::{MESH_EXTENSION, Md5Version, check_extension};

/// Simultaneous playback slots
pub const BLEND_SLOTS: usize = 2;

/// Blend factors above this snap straight to the secondary animation
const BLEND_SNAP: f32 = 0.99;

/// Compact description of a loaded model for tooling output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelSummary {
    /// Model name, derived from the file path
    pub name: String,
    /// Number of bind-pose joints
    pub joint_count: usize,
    /// Number of meshes
    pub mesh_count: usize,
    /// Vertices across all meshes
    pub vertex_count: usize,
    /// Triangles across all meshes
    pub triangle_count: usize,
    /// Weights across all meshes
    pub weight_count: usize,
    /// Per-mesh shader names in file order
    pub shaders: Vec<String>,
    /// Number of attached animations
    pub animation_count: usize,
}

/// A parsed `.md5mesh` model with its attached animations and pose state
#[derive(Debug, Clone)]
pub struct Md5Model {
    name: String,
    version: Md5Version,
    joints: Vec<Joint>,
    meshes: Vec<Md5Mesh>,
    inverse_bind_matrices: Vec<Mat4>,
    animations: Vec<Md5Animation>,
    active: [Option<usize>; BLEND_SLOTS],
    blend_factor: f32,
    blend_skeleton: Skeleton,
    skinning: SkinningMethod,
    position: Vec3,
    rotation: Quat,
    material_color: Vec3,
}

impl Md5Model {
    /// Loads a model from a `.md5mesh` path.
    ///
    /// The path must end in the 7-character `md5mesh` suffix; the model
    /// name is the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        check_extension(path, MESH_EXTENSION)?;
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
        Self::parse(&text, name)
    }

    /// Parses model text that has already been read.
    pub fn parse(text: &str, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut cursor = TextCursor::new(text);
        let mut version: Option<Md5Version> = None;
        let mut joint_count: Option<usize> = None;
        let mut mesh_count: Option<usize> = None;
        let mut joints: Option<Vec<Joint>> = None;
        let mut meshes: Vec<Md5Mesh> = Vec::new();

        while let Some(mut line) = cursor.next_line() {
            let Some(key) = line.next_token() else { continue };
            match key {
                "MD5Version" => {
                    let token = line.expect_token("MD5Version")?;
                    version = Some(Md5Version::parse_token(token)?);
                }
                "commandline" => {} // exporter metadata, ignored
                "numJoints" => joint_count = Some(line.next_usize("numJoints")?),
                "numMeshes" => mesh_count = Some(line.next_usize("numMeshes")?),
                "joints" => {
                    required(version, "MD5Version", "joints", line.line())?;
                    let declared = required(joint_count, "numJoints", "joints", line.line())?;
                    joints = Some(read_joints(&mut cursor, declared)?);
                }
                "mesh" => {
                    required(version, "MD5Version", "mesh", line.line())?;
                    let declared = required(mesh_count, "numMeshes", "mesh", line.line())?;
                    let bind = joints.as_deref().ok_or(Md5Error::MissingDirective {
                        directive: "joints",
                        block: "mesh",
                        line: line.line(),
                    })?;
                    if meshes.len() >= declared {
                        return Err(Md5Error::MalformedBlock {
                            block: "mesh",
                            line: line.line(),
                            reason: format!("more mesh blocks than numMeshes {declared}"),
                        });
                    }
                    meshes.push(Md5Mesh::parse(&mut cursor, bind)?);
                }
                _ => {}
            }
        }

        let version = version.ok_or(Md5Error::MissingDirective {
            directive: "MD5Version",
            block: "md5mesh",
            line: cursor.line_number(),
        })?;
        let joints = joints.unwrap_or_default();
        if let Some(declared) = joint_count {
            if joints.len() != declared {
                return Err(Md5Error::MalformedBlock {
                    block: "joints",
                    line: cursor.line_number(),
                    reason: format!("expected {declared} joints, found {}", joints.len()),
                });
            }
        }
        if let Some(declared) = mesh_count {
            if meshes.len() != declared {
                return Err(Md5Error::MalformedBlock {
                    block: "mesh",
                    line: cursor.line_number(),
                    reason: format!("expected {declared} mesh blocks, found {}", meshes.len()),
                });
            }
        }

        let inverse_bind_matrices = joints
            .iter()
            .map(|joint| {
                (Mat4::from_translation(joint.position) * Mat4::from_quat(joint.orientation))
                    .inverse()
            })
            .collect();
        debug!(
            "loaded model `{name}`: {} joints, {} meshes",
            joints.len(),
            meshes.len()
        );
        Ok(Self {
            name,
            version,
            joints,
            meshes,
            inverse_bind_matrices,
            animations: Vec::new(),
            active: [None; BLEND_SLOTS],
            blend_factor: 0.0,
            blend_skeleton: Skeleton::default(),
            skinning: SkinningMethod::default(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            material_color: Vec3::ONE,
        })
    }

    /// Attaches an animation, returning its playback index.
    ///
    /// The animation hierarchy must match the model skeleton joint for
    /// joint, names and parent links both.
    pub fn add_animation(&mut self, animation: Md5Animation) -> Result<usize> {
        self.check_compatible(&animation)?;
        self.animations.push(animation);
        Ok(self.animations.len() - 1)
    }

    /// Loads a `.md5anim` file and attaches it in one step
    pub fn load_animation(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.add_animation(Md5Animation::load(path)?)
    }

    fn check_compatible(&self, animation: &Md5Animation) -> Result<()> {
        let infos = animation.joint_infos();
        if infos.len() != self.joints.len() {
            return Err(Md5Error::IncompatibleAnimation {
                name: animation.name().to_string(),
                reason: format!(
                    "animation has {} joints, model has {}",
                    infos.len(),
                    self.joints.len()
                ),
            });
        }
        for (info, joint) in infos.iter().zip(&self.joints) {
            if info.name != joint.name || info.parent != joint.parent {
                return Err(Md5Error::IncompatibleAnimation {
                    name: animation.name().to_string(),
                    reason: format!(
                        "animation joint `{}` (parent {}) does not match model joint `{}` (parent {})",
                        info.name, info.parent, joint.name, joint.parent
                    ),
                });
            }
        }
        Ok(())
    }

    /// Starts an animation from its first frame in the primary slot.
    ///
    /// Returns `false` and changes nothing when the index is out of range.
    pub fn play(&mut self, animation: usize) -> bool {
        if animation >= self.animations.len() {
            warn!(
                "cannot play animation {animation}: model has {}",
                self.animations.len()
            );
            return false;
        }
        self.animations[animation].reset();
        self.active = [Some(animation), None];
        true
    }

    /// Starts two animations from their first frames, blending between
    /// them by `blend` (clamped to `0..=1`).
    ///
    /// The same index twice degenerates to plain playback. Returns `false`
    /// and changes nothing when either index is out of range.
    pub fn play_blended(&mut self, first: usize, second: usize, blend: f32) -> bool {
        if first == second {
            return self.play(first);
        }
        let count = self.animations.len();
        if first >= count || second >= count {
            warn!("cannot blend animations {first} and {second}: model has {count}");
            return false;
        }
        self.animations[first].reset();
        self.animations[second].reset();
        self.active = [Some(first), Some(second)];
        if blend.is_finite() {
            self.blend_factor = blend.clamp(0.0, 1.0);
        } else {
            warn!("ignoring non-finite blend factor");
        }
        // Seed the blend skeleton so pose queries before the first tick
        // already see the mixed pose.
        let first_skeleton = self.animations[first].current_skeleton();
        let second_skeleton = self.animations[second].current_skeleton();
        self.blend_skeleton
            .interpolate_between(first_skeleton, second_skeleton, self.blend_factor);
        true
    }

    /// Clears both playback slots and returns the meshes to the bind pose
    pub fn stop(&mut self) {
        self.active = [None; BLEND_SLOTS];
        for mesh in &mut self.meshes {
            mesh.reset_to_bind_pose();
        }
    }

    /// Sets the blend weight toward the secondary slot, clamped to `0..=1`.
    ///
    /// Meaningful only while two animations are active; otherwise the call
    /// leaves the factor alone. `0.0` poses from the primary animation
    /// alone, factors above the snap threshold pose from the secondary
    /// alone, anything between mixes the two skeletons.
    pub fn set_blend_factor(&mut self, factor: f32) {
        if !factor.is_finite() {
            warn!("ignoring non-finite blend factor");
            return;
        }
        let [Some(_), Some(_)] = self.active else {
            return;
        };
        self.blend_factor = factor.clamp(0.0, 1.0);
    }

    /// Current blend weight toward the secondary slot
    pub fn blend_factor(&self) -> f32 {
        self.blend_factor
    }

    /// Advances the active playback clocks and re-poses the meshes.
    ///
    /// With no active animation this is a no-op. With CPU skinning the
    /// vertex buffers are rewritten in place; with GPU skinning only the
    /// skeletons move and the buffers stay in the bind pose.
    pub fn update(&mut self, delta_time: f32) {
        let [primary, secondary] = self.active;
        let Some(fallback) = primary.or(secondary) else {
            return;
        };
        if let Some(index) = primary {
            self.animations[index].update(delta_time);
        }
        if let Some(index) = secondary {
            if primary != Some(index) {
                self.animations[index].update(delta_time);
            }
        }
        let blending = match (primary, secondary) {
            (Some(first), Some(second)) if first != second => Some((first, second)),
            _ => None,
        };
        if let Some((first, second)) = blending {
            if self.blend_factor > 0.0 && self.blend_factor <= BLEND_SNAP {
                let first_skeleton = self.animations[first].current_skeleton();
                let second_skeleton = self.animations[second].current_skeleton();
                self.blend_skeleton.interpolate_between(
                    first_skeleton,
                    second_skeleton,
                    self.blend_factor,
                );
            }
        }
        if self.skinning == SkinningMethod::Cpu {
            let skeleton = match blending {
                Some((first, second)) => {
                    if self.blend_factor <= 0.0 {
                        self.animations[first].current_skeleton()
                    } else if self.blend_factor > BLEND_SNAP {
                        self.animations[second].current_skeleton()
                    } else {
                        &self.blend_skeleton
                    }
                }
                None => self.animations[fallback].current_skeleton(),
            };
            for mesh in &mut self.meshes {
                mesh.apply_skeleton(skeleton);
            }
        }
    }

    fn selected_skeleton(&self) -> Option<&Skeleton> {
        let [primary, secondary] = self.active;
        match (primary, secondary) {
            (Some(first), Some(second)) if first != second => {
                if self.blend_factor <= 0.0 {
                    Some(self.animations[first].current_skeleton())
                } else if self.blend_factor > BLEND_SNAP {
                    Some(self.animations[second].current_skeleton())
                } else {
                    Some(&self.blend_skeleton)
                }
            }
            (Some(index), _) | (None, Some(index)) => {
                Some(self.animations[index].current_skeleton())
            }
            (None, None) => None,
        }
    }

    /// Skeleton currently driving the pose, if any animation is active
    pub fn current_skeleton(&self) -> Option<&Skeleton> {
        self.selected_skeleton()
    }

    /// Writes the GPU skinning palette, 16 column-major floats per joint.
    ///
    /// Each entry is the live joint matrix times the joint's inverse bind
    /// matrix; with no active animation every entry is the identity, so a
    /// skinning shader reproduces the bind pose.
    pub fn write_joint_matrices<S: MatrixSink>(&self, sink: &mut S) {
        let mut palette = Vec::with_capacity(self.joints.len() * 16);
        match self.selected_skeleton() {
            Some(skeleton) => {
                for (live, inverse_bind) in
                    skeleton.matrices.iter().zip(&self.inverse_bind_matrices)
                {
                    palette.extend_from_slice(&(*live * *inverse_bind).to_cols_array());
                }
            }
            None => {
                for _ in 0..self.joints.len() {
                    palette.extend_from_slice(&Mat4::IDENTITY.to_cols_array());
                }
            }
        }
        sink.write_matrices(&palette);
    }

    /// Switches between CPU and GPU vertex skinning.
    ///
    /// Switching to GPU skinning returns the vertex buffers to the bind
    /// pose, which is what a palette-driven skinning shader expects.
    pub fn set_skinning_method(&mut self, method: SkinningMethod) {
        if self.skinning == method {
            return;
        }
        self.skinning = method;
        if method == SkinningMethod::Gpu {
            for mesh in &mut self.meshes {
                mesh.reset_to_bind_pose();
            }
        }
    }

    /// Active vertex skinning method
    pub fn skinning_method(&self) -> SkinningMethod {
        self.skinning
    }

    /// Pushes the model transform and material color uniforms
    pub fn push_uniforms<S: UniformSink>(&self, sink: &mut S) {
        sink.set_uniform("uModelMatrix", &self.transform().to_cols_array());
        sink.set_uniform("uMatColor", &self.material_color.to_array());
    }

    /// World transform built from the model position and rotation
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)
    }

    /// Moves the model origin
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Model origin in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotates the model about its origin
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Model rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Sets the flat material color pushed with the uniforms
    pub fn set_material_color(&mut self, color: Vec3) {
        self.material_color = color;
    }

    /// Flat material color
    pub fn material_color(&self) -> Vec3 {
        self.material_color
    }

    /// Per-mesh shader names in file order
    pub fn texture_names(&self) -> Vec<&str> {
        self.meshes.iter().map(Md5Mesh::shader).collect()
    }

    /// Resolves every mesh shader through a texture lookup, in mesh order
    pub fn resolve_textures<L: TextureLookup>(&self, lookup: &mut L) -> Vec<Option<L::Handle>> {
        self.meshes
            .iter()
            .map(|mesh| {
                let handle = lookup.texture(mesh.shader());
                if handle.is_none() {
                    warn!("no texture for mesh shader `{}`", mesh.shader());
                }
                handle
            })
            .collect()
    }

    /// Model name, derived from the file path
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format version declared by the file
    pub fn version(&self) -> Md5Version {
        self.version
    }

    /// Bind-pose joints in file order
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Meshes in file order
    pub fn meshes(&self) -> &[Md5Mesh] {
        &self.meshes
    }

    /// Number of attached animations
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Attached animations in attachment order
    pub fn animations(&self) -> &[Md5Animation] {
        &self.animations
    }

    /// One attached animation by playback index
    pub fn animation(&self, index: usize) -> Option<&Md5Animation> {
        self.animations.get(index)
    }

    /// Mutable access to one attached animation, for frame scrubbing
    pub fn animation_mut(&mut self, index: usize) -> Option<&mut Md5Animation> {
        self.animations.get_mut(index)
    }

    /// Playback indices currently occupying the two slots
    pub fn playing_animation_indices(&self) -> [Option<usize>; BLEND_SLOTS] {
        self.active
    }

    /// Names of the animations in the two playback slots, idle slots
    /// reporting [`Md5Animation::DEFAULT_NAME`]
    pub fn playing_animation_names(&self) -> [&str; BLEND_SLOTS] {
        self.active.map(|slot| match slot {
            Some(index) => self.animations[index].name(),
            None => Md5Animation::DEFAULT_NAME,
        })
    }

    /// Per-joint inverse bind matrices in joint order
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    /// Builds a compact description for tooling output
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            name: self.name.clone(),
            joint_count: self.joints.len(),
            mesh_count: self.meshes.len(),
            vertex_count: self.meshes.iter().map(|mesh| mesh.vertices().len()).sum(),
            triangle_count: self.meshes.iter().map(|mesh| mesh.triangles().len()).sum(),
            weight_count: self.meshes.iter().map(|mesh| mesh.weights().len()).sum(),
            shaders: self
                .meshes
                .iter()
                .map(|mesh| mesh.shader().to_string())
                .collect(),
            animation_count: self.animations.len(),
        }
    }
}

fn required<T: Copy>(
    value: Option<T>,
    directive: &'static str,
    block: &'static str,
    line: usize,
) -> Result<T> {
    value.ok_or(Md5Error::MissingDirective {
        directive,
        block,
        line,
    })
}

fn read_joints(cursor: &mut TextCursor<'_>, declared: usize) -> Result<Vec<Joint>> {
    let mut joints = Vec::with_capacity(declared);
    loop {
        let mut line = cursor.block_line("joints")?;
        if line.closes_block() {
            break;
        }
        let Some(name) = line.next_token() else {
            continue;
        };
        let parent = line.next_i32("joint parent")?;
        check_parent_link(name, joints.len(), parent)?;
        let position = line.vec3("joint position")?;
        let rotation = line.vec3("joint orientation")?;
        let orientation = Quat::from_xyzw(
            rotation.x,
            rotation.y,
            rotation.z,
            compute_quaternion_w(rotation.x, rotation.y, rotation.z),
        );
        joints.push(Joint {
            name: name.to_string(),
            parent,
            position,
            orientation,
        });
    }
    if joints.len() != declared {
        return Err(Md5Error::MalformedBlock {
            block: "joints",
            line: cursor.line_number(),
            reason: format!("expected {declared} joints, found {}", joints.len()),
        });
    }
    Ok(joints)
}
