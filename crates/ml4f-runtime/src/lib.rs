//! Invocation engine, self-test harness, and invoke wrapper for ML4F
//! artifacts.
//!
//! The runtime transfers control into the compiled routine embedded in a
//! model artifact. This is the single highest-risk operation in the stack:
//! a direct, unverified jump into data-derived code. The cast and call are
//! confined to one `unsafe` boundary in [`invoke`]; everything reachable
//! from safe code stops at validation.
//!
//! # Trust boundary
//!
//! Header validation is cheap and shallow by design. The runtime does
//! **not** re-verify `arena_bytes`, the tensor offsets, or `object_size`
//! against each other — those are producer obligations of the format. A
//! producer that lies about the layout gets a panic from safe slicing at
//! best and undefined behavior from its own routine at worst. The embedded
//! routine is trusted completely: it may read and write anywhere in the
//! arena and is assumed not to exceed it.
//!
//! # Concurrency
//!
//! Execution is single-threaded, synchronous, and blocking: an invocation
//! returns only when the embedded routine returns, and there is no
//! cancellation or timeout (a runaway routine must be bounded externally,
//! e.g. by a watchdog). The artifact blob is read-only and may be shared
//! across concurrent invocations; each invocation needs its own arena.
//! Invoking the *same* model concurrently against different arenas is safe
//! only if the compiled routine is reentrant — a property of the producer's
//! code, not something this runtime can enforce.
//!
//! # Byte order
//!
//! Artifacts are little-endian, and the embedded routine operates on native
//! floats in the arena. The runtime therefore assumes a little-endian
//! target, as every architecture the model compiler emits code for is.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod arena;
pub mod classify;
pub mod error;
pub mod invoke;
pub mod selftest;

pub use arena::Arena;
pub use classify::argmax;
pub use error::InvokeError;
pub use invoke::{full_invoke, full_invoke_argmax, invoke, ENTRY_BIAS};
pub use selftest::{is_near, self_test, TestOutcome, EPSILON};

/// Read the little-endian f32 at `off`. Panics if out of bounds — which,
/// given a validated header, can only mean the producer's offsets are
/// inconsistent with the buffer they describe.
pub(crate) fn f32_at(bytes: &[u8], off: usize) -> f32 {
    f32::from_le_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]])
}

/// Write `src` as little-endian f32 words starting at `off`.
pub(crate) fn write_f32s(dst: &mut [u8], off: usize, src: &[f32]) {
    for (i, v) in src.iter().enumerate() {
        let at = off + 4 * i;
        dst[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }
}

/// Read `dst.len()` little-endian f32 words starting at `off`.
pub(crate) fn read_f32s(src: &[u8], off: usize, dst: &mut [f32]) {
    for (i, v) in dst.iter_mut().enumerate() {
        *v = f32_at(src, off + 4 * i);
    }
}
