//! Parser and playback runtime for id Tech 4 MD5 model and animation files.
//!
//! This crate reads the text-based `.md5mesh` and `.md5anim` formats used
//! by Doom 3-era id Tech 4 games. Models carry a bind-pose skeleton and
//! skinned meshes; animations carry per-frame component arrays that are
//! decompressed into world-space skeletons. The runtime plays animations
//! on a model, blends two of them by a weight factor, and skins vertices
//! either on the CPU or through a joint matrix palette for a GPU shader.
//!
//! # Examples
//!
//! ```no_run
//! use idtech_md5::Md5Model;
//!
//! fn main() -> Result<(), idtech_md5::Md5Error> {
//!     let mut model = Md5Model::load("models/monsters/imp/imp.md5mesh")?;
//!     let idle = model.load_animation("models/monsters/imp/idle1.md5anim")?;
//!     model.play(idle);
//!     model.update(1.0 / 60.0);
//!     for mesh in model.meshes() {
//!         println!("{}: {} floats", mesh.shader(), mesh.vertex_data().len());
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod anim;
pub mod error;
pub mod mesh;
pub mod model;
pub mod render;
pub mod skeleton;
pub mod skinning;
pub mod tokenizer;
pub mod types;
pub mod validation;
pub mod version;

pub use anim::{
    AnimationSummary, BaseFrameJoint, ComponentFlags, FrameData, JointInfo, Md5Animation,
};
pub use error::{Md5Error, Result};
pub use mesh::Md5Mesh;
pub use model::{BLEND_SLOTS, Md5Model, ModelSummary};
pub use render::{MatrixSink, TextureLookup, UniformSink};
pub use skeleton::{Skeleton, SkeletonJoint, compute_quaternion_w};
pub use skinning::SkinningMethod;
pub use types::{Bound, Joint, MAX_VERTEX_WEIGHTS, Triangle, VERTEX_STRIDE, Vertex, Weight};
pub use validation::ValidationWarning;
pub use version::{ANIM_EXTENSION, MESH_EXTENSION, Md5Version};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
