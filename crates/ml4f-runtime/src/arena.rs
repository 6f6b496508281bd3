//! Caller-owned scratch memory for a single invocation.
//!
//! The arena has no structure of its own: the input tensor, output tensor,
//! and any working memory live at whatever offsets the model's header and
//! compiled routine decided at compile time. It carries no state between
//! invocations — allocate (or [`reset`](Arena::reset)) right before a call,
//! drop right after.

use ml4f_model::ModelHeader;

/// An owned, zero-initialised scratch buffer for one invocation.
///
/// Thin wrapper over `Vec<u8>`; the backing allocation is reused across
/// invocations of the same model when the caller keeps the arena around and
/// resets it instead of reallocating.
pub struct Arena {
    buf: Vec<u8>,
}

impl Arena {
    /// Allocate an arena of exactly `len` bytes, zero-filled.
    pub fn new(len: usize) -> Self {
        Self { buf: vec![0; len] }
    }

    /// Allocate an arena sized to the model's declared `arena_bytes`.
    pub fn for_model(header: &ModelHeader<'_>) -> Self {
        Self::new(header.arena_bytes() as usize)
    }

    /// Zero the buffer for a fresh invocation.
    ///
    /// Does not shrink or reallocate; only the contents are cleared.
    pub fn reset(&mut self) {
        self.buf.fill(0);
    }

    /// Length of the arena in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the arena is empty (a zero-byte arena is legal for a model
    /// that declares `arena_bytes == 0`, though no real routine could use
    /// one).
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The arena bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// The arena bytes, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_is_zeroed() {
        let arena = Arena::new(32);
        assert_eq!(arena.len(), 32);
        assert!(arena.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn reset_clears_contents_without_resizing() {
        let mut arena = Arena::new(8);
        arena.as_mut_slice()[3] = 0xff;
        arena.reset();
        assert_eq!(arena.len(), 8);
        assert!(arena.as_slice().iter().all(|&b| b == 0));
    }
}
