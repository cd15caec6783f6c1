//! Error types for MD5 model and animation loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error types for MD5 mesh/animation parsing and playback setup
#[derive(Error, Debug)]
pub enum Md5Error {
    /// I/O error while reading a model or animation file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file path does not carry the expected format suffix
    #[error("invalid extension for `{path}`: expected a path ending in `{expected}`")]
    InvalidExtension {
        /// Path that was rejected
        path: PathBuf,
        /// Required 7-character suffix (`md5mesh` or `md5anim`)
        expected: &'static str,
    },

    /// The `MD5Version` directive named a version other than 10
    #[error("unsupported MD5Version `{found}`: only version 10 is supported")]
    UnsupportedVersion {
        /// Version token found in the file, truncated as compared
        found: String,
    },

    /// A block appeared before the directive that defines its size
    #[error("line {line}: `{block}` block before its `{directive}` directive")]
    MissingDirective {
        /// Size-defining directive that was expected first
        directive: &'static str,
        /// Block that appeared too early (or the file kind when absent entirely)
        block: &'static str,
        /// 1-based source line
        line: usize,
    },

    /// A collection entry appeared before its count directive
    #[error("line {line}: `{entry}` entry before its `{directive}` count")]
    UnsizedCollection {
        /// Entry keyword (`vert`, `tri`, `weight`)
        entry: &'static str,
        /// Count directive that must precede it
        directive: &'static str,
        /// 1-based source line
        line: usize,
    },

    /// The input ended inside a block, closing brace never seen
    #[error("line {line}: unexpected end of input inside `{block}` block")]
    UnexpectedEof {
        /// Block that was still open
        block: &'static str,
        /// 1-based source line at which input ended
        line: usize,
    },

    /// A line held fewer tokens than its directive requires
    #[error("line {line}: missing token while reading {context}")]
    MissingToken {
        /// What was being parsed
        context: &'static str,
        /// 1-based source line
        line: usize,
    },

    /// A token could not be parsed as the expected number type
    #[error("line {line}: invalid number `{token}` while reading {context}")]
    InvalidNumber {
        /// Offending token
        token: String,
        /// What was being parsed
        context: &'static str,
        /// 1-based source line
        line: usize,
    },

    /// A block's contents disagree with its declared sizes
    #[error("line {line}: malformed `{block}` block: {reason}")]
    MalformedBlock {
        /// Block keyword
        block: &'static str,
        /// 1-based source line
        line: usize,
        /// Human-readable mismatch description
        reason: String,
    },

    /// A joint's parent index is not `-1` and not strictly below its own index
    #[error("joint `{joint}` (index {index}) has invalid parent index {parent}")]
    InvalidHierarchy {
        /// Joint name from the file
        joint: String,
        /// Index of the joint inside its block
        index: usize,
        /// Parent index as written
        parent: i32,
    },

    /// An animation's skeleton does not match the model it was attached to
    #[error("animation `{name}` does not fit the model skeleton: {reason}")]
    IncompatibleAnimation {
        /// Animation name (derived from its file path)
        name: String,
        /// First mismatch found
        reason: String,
    },
}

/// Result type using `Md5Error`
pub type Result<T> = std::result::Result<T, Md5Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_line_and_context() {
        let err = Md5Error::InvalidNumber {
            token: "abc".to_string(),
            context: "joint position",
            line: 12,
        };
        let text = err.to_string();
        assert!(text.contains("line 12"));
        assert!(text.contains("abc"));
        assert!(text.contains("joint position"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Md5Error = io.into();
        assert!(matches!(err, Md5Error::Io(_)));
    }
}
