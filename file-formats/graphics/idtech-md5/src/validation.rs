//! Non-fatal checks over loadable data.
//!
//! The parsers reject anything that would break playback; everything
//! here is about data that loads fine but probably means an exporter
//! misbehaved: biases that do not sum to one, duplicated joint names,
//! orientations whose quaternion drifted off the unit sphere. Tooling
//! surfaces these as warnings and leaves the data alone.

use std::collections::HashMap;
use std::fmt;

use crate::anim::Md5Animation;
use crate::model::Md5Model;

/// Weight bias sums may drift this far from one before a warning
const BIAS_EPSILON: f32 = 1e-3;

/// Orientation lengths may drift this far from one before a warning
const UNIT_EPSILON: f32 = 1e-3;

/// A non-fatal oddity found in otherwise loadable data
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A vertex's weight biases do not sum to one
    BiasSum {
        /// Mesh index within the model
        mesh: usize,
        /// Vertex index within the mesh
        vertex: usize,
        /// Actual bias sum
        sum: f32,
    },
    /// Two joints share a name
    DuplicateJointName {
        /// The shared name
        name: String,
        /// Index of the first joint with the name
        first: usize,
        /// Index of the later duplicate
        second: usize,
    },
    /// A vertex references no weights at all
    UnweightedVertex {
        /// Mesh index within the model
        mesh: usize,
        /// Vertex index within the mesh
        vertex: usize,
    },
    /// A bind orientation is not unit length after w reconstruction
    NonUnitOrientation {
        /// Joint name
        joint: String,
        /// Actual quaternion length
        length: f32,
    },
    /// The animation declares a zero frame rate and will never advance
    ZeroFrameRate,
    /// A frame bound has a minimum corner above its maximum
    InvertedBound {
        /// Frame index
        frame: usize,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BiasSum { mesh, vertex, sum } => {
                write!(f, "mesh {mesh} vertex {vertex}: weight biases sum to {sum}")
            }
            Self::DuplicateJointName {
                name,
                first,
                second,
            } => {
                write!(
                    f,
                    "joints {first} and {second} both named `{name}`"
                )
            }
            Self::UnweightedVertex { mesh, vertex } => {
                write!(f, "mesh {mesh} vertex {vertex}: no weights")
            }
            Self::NonUnitOrientation { joint, length } => {
                write!(
                    f,
                    "joint `{joint}`: orientation length {length} after w reconstruction"
                )
            }
            Self::ZeroFrameRate => write!(f, "frame rate is zero; playback will never advance"),
            Self::InvertedBound { frame } => {
                write!(f, "frame {frame}: bound minimum above its maximum")
            }
        }
    }
}

fn duplicate_names<'a>(
    names: impl Iterator<Item = &'a str>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, name) in names.enumerate() {
        match seen.get(name) {
            Some(&first) => warnings.push(ValidationWarning::DuplicateJointName {
                name: name.to_string(),
                first,
                second: index,
            }),
            None => {
                seen.insert(name, index);
            }
        }
    }
}

impl Md5Model {
    /// Scans the model for oddities that load but probably should not.
    ///
    /// An empty result means nothing suspicious was found.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        duplicate_names(
            self.joints().iter().map(|joint| joint.name.as_str()),
            &mut warnings,
        );
        for joint in self.joints() {
            let length = joint.orientation.length();
            if (length - 1.0).abs() > UNIT_EPSILON {
                warnings.push(ValidationWarning::NonUnitOrientation {
                    joint: joint.name.clone(),
                    length,
                });
            }
        }
        for (mesh_index, mesh) in self.meshes().iter().enumerate() {
            for (vertex_index, vertex) in mesh.vertices().iter().enumerate() {
                if vertex.count_weight == 0 {
                    warnings.push(ValidationWarning::UnweightedVertex {
                        mesh: mesh_index,
                        vertex: vertex_index,
                    });
                    continue;
                }
                let range =
                    &mesh.weights()[vertex.start_weight..vertex.start_weight + vertex.count_weight];
                let sum: f32 = range.iter().map(|weight| weight.bias).sum();
                if (sum - 1.0).abs() > BIAS_EPSILON {
                    warnings.push(ValidationWarning::BiasSum {
                        mesh: mesh_index,
                        vertex: vertex_index,
                        sum,
                    });
                }
            }
        }
        warnings
    }
}

impl Md5Animation {
    /// Scans the animation for oddities that load but probably should not.
    ///
    /// An empty result means nothing suspicious was found.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        if self.frame_rate() == 0 {
            warnings.push(ValidationWarning::ZeroFrameRate);
        }
        duplicate_names(
            self.joint_infos().iter().map(|info| info.name.as_str()),
            &mut warnings,
        );
        for (frame, bound) in self.bounds().iter().enumerate() {
            if bound.min.x > bound.max.x || bound.min.y > bound.max.y || bound.min.z > bound.max.z {
                warnings.push(ValidationWarning::InvertedBound { frame });
            }
        }
        warnings
    }
}
