//! C API for the ML4F model runtime.
//!
//! Mirrors the reference C header symbol-for-symbol so existing device
//! code links against this crate unchanged. All functions taking raw
//! pointers are `unsafe extern "C"` with the caller contract documented on
//! each; null pointers are answered with an error code, never
//! dereferenced. Return-value conventions are bit-compatible with the C
//! reference: `ml4f_invoke` and `ml4f_full_invoke` return 0 or -1,
//! `ml4f_test` returns 1 (passed), 0 (no tests), -1 (invalid) or -2
//! (mismatch).

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod status;

pub use api::Ml4fHeader;
pub use status::Ml4fStatus;
