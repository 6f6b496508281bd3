//! Artifact header and shape layer for the ML4F model runtime.
//!
//! An ML4F artifact is a single contiguous little-endian blob emitted by the
//! offline model compiler:
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │ Fixed header: 16 × u32 LE (64 bytes)  │
//! ├───────────────────────────────────────┤
//! │ input shape  (u32 LE, 0-terminated)   │
//! │ output shape (u32 LE, 0-terminated)   │ ← header_size counts up to here
//! ├───────────────────────────────────────┤
//! │ compiled inference routine            │
//! ├───────────────────────────────────────┤
//! │ weights                               │
//! ├───────────────────────────────────────┤
//! │ test input / test output (optional)   │
//! └───────────────────────────────────────┘
//! ```
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! read-only view over the header ([`ModelHeader`]), the lazy shape view
//! ([`Shape`]), header validation, and the [`ModelError`] taxonomy. It never
//! touches the compiled routine; transferring control lives in
//! `ml4f-runtime`.
//!
//! # Trust boundary
//!
//! Validation checks the magic pair and the tensor type tags, nothing more.
//! `arena_bytes`, the tensor offsets, and `object_size` are trusted exactly
//! as the producer wrote them. A malicious or corrupt artifact that passes
//! validation can still declare an inconsistent layout; keeping the blob and
//! its offsets coherent is a producer obligation of the format, not
//! something this crate re-verifies.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod header;
pub mod shape;

pub use error::ModelError;
pub use header::{
    is_valid_header, ModelHeader, FIXED_HEADER_BYTES, MAGIC0, MAGIC1, TYPE_FLOAT32,
};
pub use shape::Shape;
