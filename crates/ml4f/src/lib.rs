//! ML4F: a runtime for self-describing machine-learning model artifacts.
//!
//! An ML4F artifact is one contiguous blob containing a fixed header,
//! tensor shape descriptors, weights, optional golden test vectors, and
//! the model's own compiled inference routine. This facade crate
//! re-exports the full public API from the two sub-crates; for most users
//! a single `ml4f` dependency is sufficient. C callers link `ml4f-ffi`
//! instead.
//!
//! # Quick start
//!
//! ```no_run
//! use ml4f::{full_invoke, ModelHeader};
//!
//! // `blob` maps an artifact whose embedded routine is executable on
//! // this target (e.g. in flash on a microcontroller).
//! # let blob: &[u8] = &[];
//! let header = ModelHeader::parse(blob)?;
//! let mut scores = vec![0.0f32; header.output_shape().elements()];
//! // SAFETY: the artifact came from the ML4F compiler for this target
//! // and its routine is executable in place.
//! unsafe { full_invoke(blob, &[0.25, 0.75], &mut scores)? };
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Crates
//!
//! | Module source | Contents |
//! |---------------|----------|
//! | `ml4f-model` | header view, shape views, validation, [`ModelError`] |
//! | `ml4f-runtime` | [`invoke`], [`self_test`], [`full_invoke`], [`Arena`], [`argmax`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use ml4f_model::{
    is_valid_header, ModelError, ModelHeader, Shape, FIXED_HEADER_BYTES, MAGIC0, MAGIC1,
    TYPE_FLOAT32,
};
pub use ml4f_runtime::{
    argmax, full_invoke, full_invoke_argmax, invoke, is_near, self_test, Arena, InvokeError,
    TestOutcome, ENTRY_BIAS, EPSILON,
};
