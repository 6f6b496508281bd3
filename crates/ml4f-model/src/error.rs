//! Validation error types for ML4F artifacts.

use std::error::Error;
use std::fmt;

/// Reasons a candidate blob is not a usable ML4F artifact.
///
/// Every public operation that takes artifact bytes surfaces one of these
/// rather than proceeding; there is no recovery path — a failed validation
/// is always a terminal answer for that blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// The blob is shorter than the fixed header.
    Truncated {
        /// Actual length of the candidate blob in bytes.
        len: usize,
    },
    /// One of the two magic words does not match the format sentinel.
    BadMagic {
        /// The word as read from the blob.
        found: u32,
        /// The sentinel it was checked against.
        expected: u32,
    },
    /// A tensor type tag other than the supported float32 tag.
    UnsupportedType {
        /// The offending tag value.
        tag: u32,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { len } => {
                write!(f, "blob too short for fixed header: {len} bytes")
            }
            Self::BadMagic { found, expected } => {
                write!(f, "bad magic: found {found:#010x}, expected {expected:#010x}")
            }
            Self::UnsupportedType { tag } => {
                write!(f, "unsupported tensor type tag: {tag}")
            }
        }
    }
}

impl Error for ModelError {}
