//! MD5 format version handling and file extension gating.
//!
//! Both the mesh and animation formats open with an `MD5Version` directive.
//! Only version 10 (the Doom 3 release format) exists in shipped assets and
//! only it is accepted. Paths are gated on their 7-character format suffix
//! before any read happens, so a mesh loader pointed at an animation file
//! fails fast with [`Md5Error::InvalidExtension`].

use std::path::Path;

use crate::error::{Md5Error, Result};

/// Required suffix for model files
pub const MESH_EXTENSION: &str = "md5mesh";

/// Required suffix for animation files
pub const ANIM_EXTENSION: &str = "md5anim";

/// Supported MD5 format versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Md5Version {
    /// `MD5Version 10`, the only released revision of the format
    V10,
}

impl Md5Version {
    /// Numeric version as written in the directive
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::V10 => 10,
        }
    }

    /// Parses the token following an `MD5Version` directive.
    ///
    /// The token is truncated to its first two characters before the
    /// comparison, mirroring the fixed-width check the format has always
    /// been read with; `10` and `10.0` both resolve to [`Md5Version::V10`].
    pub fn parse_token(token: &str) -> Result<Self> {
        let truncated = token.get(..2).unwrap_or(token);
        if truncated == "10" {
            Ok(Self::V10)
        } else {
            Err(Md5Error::UnsupportedVersion {
                found: truncated.to_string(),
            })
        }
    }
}

impl std::fmt::Display for Md5Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}

/// Checks that `path` ends in the given 7-character format suffix.
///
/// The path must be strictly longer than the suffix itself; the comparison
/// is case-sensitive and ignores whether a dot precedes the suffix, which
/// is exactly as permissive as the original loaders.
pub fn check_extension(path: &Path, expected: &'static str) -> Result<()> {
    let text = path.to_string_lossy();
    if text.len() > expected.len() && text.ends_with(expected) {
        Ok(())
    } else {
        Err(Md5Error::InvalidExtension {
            path: path.to_path_buf(),
            expected,
        })
    }
}
