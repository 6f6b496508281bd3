//! Lazy views over zero-terminated tensor shape descriptors.
//!
//! Shapes are packed back-to-back in the artifact with no length prefix:
//! a run of little-endian `u32` element counts ending at a zero word, with
//! the next shape starting immediately after the terminator. [`Shape`] is a
//! restartable view over that run — never an owned container — bounded by
//! the byte region it was cut from, so a blob missing its terminator simply
//! yields a shorter shape instead of reading out of bounds.

use smallvec::SmallVec;

use crate::header::TYPE_FLOAT32;

/// Bytes per element of the supported float32 type.
const F32_BYTES: usize = 4;

/// Read-only view over one zero-terminated shape descriptor.
///
/// Iteration yields the per-dimension element counts, stopping at the zero
/// terminator or at the end of the backing region, whichever comes first.
/// An empty shape (immediate terminator) is legal and denotes a scalar:
/// its element product is 1, the multiplicative identity.
#[derive(Clone, Copy, Debug)]
pub struct Shape<'a> {
    region: &'a [u8],
}

impl<'a> Shape<'a> {
    /// View the shape starting at the front of `region`.
    pub(crate) fn new(region: &'a [u8]) -> Self {
        Self { region }
    }

    /// Iterate over the per-dimension element counts.
    pub fn iter(&self) -> ShapeIter<'a> {
        ShapeIter {
            region: self.region,
            pos: 0,
        }
    }

    /// Number of tensor elements: the product of all dimensions.
    ///
    /// The empty shape yields 1 (scalar semantics, not "empty tensor").
    /// The product saturates at `usize::MAX` rather than wrapping.
    pub fn elements(&self) -> usize {
        self.iter()
            .fold(1usize, |acc, dim| acc.saturating_mul(dim as usize))
    }

    /// Byte size of a tensor with this shape and the given element type.
    ///
    /// Returns 0 for any tag other than the float32 tag. The zero is a
    /// sentinel meaning "unsupported type", not an error channel — callers
    /// sizing buffers must check type support separately if they need to
    /// tell a scalar of the wrong type from an empty result.
    pub fn byte_size(&self, type_tag: u32) -> usize {
        if type_tag != TYPE_FLOAT32 {
            return 0;
        }
        self.elements().saturating_mul(F32_BYTES)
    }

    /// The dimensions as a small owned vector, for diagnostics and tests.
    pub fn dims(&self) -> SmallVec<[u32; 8]> {
        self.iter().collect()
    }

    /// The shape packed immediately after this one's terminator.
    ///
    /// If this shape runs off the end of the region without a terminator,
    /// the result is an empty shape at the region's end.
    pub(crate) fn next_shape(&self) -> Shape<'a> {
        let mut it = self.iter();
        // Drain to advance past the dimensions.
        for _ in it.by_ref() {}
        let after = it.pos_after_terminator().min(self.region.len());
        Shape {
            region: &self.region[after..],
        }
    }
}

impl<'a> IntoIterator for &Shape<'a> {
    type Item = u32;
    type IntoIter = ShapeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a shape's dimensions.
#[derive(Clone, Debug)]
pub struct ShapeIter<'a> {
    region: &'a [u8],
    pos: usize,
}

impl ShapeIter<'_> {
    /// Byte position just past the zero terminator, assuming the iterator
    /// has been drained. Clamped by the caller against the region length
    /// for the missing-terminator case.
    fn pos_after_terminator(&self) -> usize {
        self.pos + 4
    }
}

impl Iterator for ShapeIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.pos + 4 > self.region.len() {
            return None;
        }
        let dim = u32::from_le_bytes([
            self.region[self.pos],
            self.region[self.pos + 1],
            self.region[self.pos + 2],
            self.region[self.pos + 3],
        ]);
        if dim == 0 {
            return None;
        }
        self.pos += 4;
        Some(dim)
    }
}
