//! Fixed-layout artifact header: field access and validation.
//!
//! The header is sixteen little-endian `u32` words. [`ModelHeader`] is a
//! borrowed view over the artifact bytes; no field is ever copied out into
//! an owned record, and nothing here dereferences shape data — validation
//! deliberately reads only the fixed words, so it is safe to call on any
//! blob of at least [`FIXED_HEADER_BYTES`] bytes.

use crate::error::ModelError;
use crate::shape::Shape;

/// First magic word of every ML4F artifact.
pub const MAGIC0: u32 = 0x3047_0f62;
/// Second magic word ("ML4F" in ASCII, little-endian).
pub const MAGIC1: u32 = 0x4634_4c4d;
/// The only tensor element type the format currently defines: 32-bit float.
pub const TYPE_FLOAT32: u32 = 1;
/// Size of the fixed header in bytes; the input shape starts right after.
pub const FIXED_HEADER_BYTES: usize = 64;

// Word indices of the fixed fields, in blob order.
const W_MAGIC0: usize = 0;
const W_MAGIC1: usize = 1;
const W_HEADER_SIZE: usize = 2;
const W_OBJECT_SIZE: usize = 3;
const W_WEIGHTS_OFFSET: usize = 4;
const W_TEST_INPUT_OFFSET: usize = 5;
const W_TEST_OUTPUT_OFFSET: usize = 6;
const W_ARENA_BYTES: usize = 7;
const W_INPUT_OFFSET: usize = 8;
const W_INPUT_TYPE: usize = 9;
const W_OUTPUT_OFFSET: usize = 10;
const W_OUTPUT_TYPE: usize = 11;
const W_RESERVED: usize = 12;

/// Borrowed view over an ML4F artifact, anchored at the header.
///
/// Constructed with [`ModelHeader::read`] (length check only) or
/// [`ModelHeader::parse`] (full validation). Holds the entire blob so that
/// shape views and the embedded test vectors stay in bounds.
#[derive(Clone, Copy, Debug)]
pub struct ModelHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> ModelHeader<'a> {
    /// View `bytes` as an artifact without validating it.
    ///
    /// Fails only if the blob cannot hold the fixed header. Use this when
    /// the fields of a possibly-invalid artifact are needed, e.g. to report
    /// what was wrong with it.
    pub fn read(bytes: &'a [u8]) -> Result<Self, ModelError> {
        if bytes.len() < FIXED_HEADER_BYTES {
            return Err(ModelError::Truncated { len: bytes.len() });
        }
        Ok(Self { bytes })
    }

    /// View `bytes` as an artifact, checking the magic pair and type tags.
    ///
    /// Checks run in blob order: length, `magic0`, `magic1`, `input_type`,
    /// `output_type`. The first failure is returned; shape data is never
    /// touched.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ModelError> {
        let header = Self::read(bytes)?;
        header.validate()?;
        Ok(header)
    }

    /// Re-run the magic and type-tag checks on an already-read header.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.magic0() != MAGIC0 {
            return Err(ModelError::BadMagic {
                found: self.magic0(),
                expected: MAGIC0,
            });
        }
        if self.magic1() != MAGIC1 {
            return Err(ModelError::BadMagic {
                found: self.magic1(),
                expected: MAGIC1,
            });
        }
        if self.input_type() != TYPE_FLOAT32 {
            return Err(ModelError::UnsupportedType {
                tag: self.input_type(),
            });
        }
        if self.output_type() != TYPE_FLOAT32 {
            return Err(ModelError::UnsupportedType {
                tag: self.output_type(),
            });
        }
        Ok(())
    }

    fn word(&self, idx: usize) -> u32 {
        let off = idx * 4;
        u32::from_le_bytes([
            self.bytes[off],
            self.bytes[off + 1],
            self.bytes[off + 2],
            self.bytes[off + 3],
        ])
    }

    /// The full artifact blob this header was read from.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// First magic word.
    pub fn magic0(&self) -> u32 {
        self.word(W_MAGIC0)
    }

    /// Second magic word.
    pub fn magic1(&self) -> u32 {
        self.word(W_MAGIC1)
    }

    /// Bytes from the artifact start to the compiled routine.
    ///
    /// Covers the fixed words *and* both shape arrays — the compiler sets
    /// this to the distance between the header label and the routine's
    /// first instruction, so the entry point is at `header_size` plus the
    /// architecture's entry bias.
    pub fn header_size(&self) -> u32 {
        self.word(W_HEADER_SIZE)
    }

    /// Total artifact length in bytes, as declared by the producer.
    pub fn object_size(&self) -> u32 {
        self.word(W_OBJECT_SIZE)
    }

    /// Byte offset of the weight data within the artifact.
    pub fn weights_offset(&self) -> u32 {
        self.word(W_WEIGHTS_OFFSET)
    }

    /// Byte offset of the golden test input, or 0 if the artifact carries
    /// no test vectors.
    pub fn test_input_offset(&self) -> u32 {
        self.word(W_TEST_INPUT_OFFSET)
    }

    /// Byte offset of the golden test output, or 0 if absent.
    pub fn test_output_offset(&self) -> u32 {
        self.word(W_TEST_OUTPUT_OFFSET)
    }

    /// Minimum scratch-buffer size the compiled routine requires.
    pub fn arena_bytes(&self) -> u32 {
        self.word(W_ARENA_BYTES)
    }

    /// Byte offset of the input tensor *within the arena*.
    pub fn input_offset(&self) -> u32 {
        self.word(W_INPUT_OFFSET)
    }

    /// Input tensor element type tag.
    pub fn input_type(&self) -> u32 {
        self.word(W_INPUT_TYPE)
    }

    /// Byte offset of the output tensor *within the arena*.
    pub fn output_offset(&self) -> u32 {
        self.word(W_OUTPUT_OFFSET)
    }

    /// Output tensor element type tag.
    pub fn output_type(&self) -> u32 {
        self.word(W_OUTPUT_TYPE)
    }

    /// The four reserved words. Unused, but must round-trip unchanged.
    pub fn reserved(&self) -> [u32; 4] {
        [
            self.word(W_RESERVED),
            self.word(W_RESERVED + 1),
            self.word(W_RESERVED + 2),
            self.word(W_RESERVED + 3),
        ]
    }

    /// Region of the blob holding the two shape arrays.
    ///
    /// Bounded by `header_size` (where the routine starts) and the blob
    /// length, so a lying producer cannot push a shape scan past the end of
    /// the buffer.
    fn shape_region(&self) -> &'a [u8] {
        let end = (self.header_size() as usize)
            .min(self.bytes.len())
            .max(FIXED_HEADER_BYTES);
        &self.bytes[FIXED_HEADER_BYTES..end]
    }

    /// The input tensor's shape, starting right after the fixed words.
    pub fn input_shape(&self) -> Shape<'a> {
        Shape::new(self.shape_region())
    }

    /// The output tensor's shape.
    ///
    /// Located by scanning past the input shape's zero terminator; this
    /// scan is the only place the shape-array length is discovered.
    pub fn output_shape(&self) -> Shape<'a> {
        self.input_shape().next_shape()
    }

    /// Byte size of the input tensor (0 if the input type is unsupported).
    pub fn input_tensor_bytes(&self) -> usize {
        self.input_shape().byte_size(self.input_type())
    }

    /// Byte size of the output tensor (0 if the output type is unsupported).
    pub fn output_tensor_bytes(&self) -> usize {
        self.output_shape().byte_size(self.output_type())
    }
}

/// Pure predicate form of [`ModelHeader::parse`].
pub fn is_valid_header(bytes: &[u8]) -> bool {
    ModelHeader::parse(bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal valid header followed by input shape [2, 3] and output
    /// shape [6].
    fn sample_blob() -> Vec<u8> {
        let words: Vec<u32> = vec![
            MAGIC0,
            MAGIC1,
            64 + 5 * 4, // header_size: fixed + 5 shape words
            64 + 5 * 4, // object_size: nothing after the shapes
            0,          // weights_offset
            0,          // test_input_offset
            0,          // test_output_offset
            48,         // arena_bytes
            0,          // input_offset
            TYPE_FLOAT32,
            24, // output_offset
            TYPE_FLOAT32,
            0xaaaa_0001, // reserved
            0xaaaa_0002,
            0xaaaa_0003,
            0xaaaa_0004,
            2, // input shape
            3,
            0,
            6, // output shape
            0,
        ];
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn parse_accepts_valid_header() {
        let blob = sample_blob();
        let header = ModelHeader::parse(&blob).unwrap();
        assert_eq!(header.header_size(), 84);
        assert_eq!(header.arena_bytes(), 48);
        assert_eq!(header.input_offset(), 0);
        assert_eq!(header.output_offset(), 24);
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let blob = sample_blob();
        assert_eq!(
            ModelHeader::parse(&blob[..60]).err(),
            Some(ModelError::Truncated { len: 60 })
        );
    }

    #[test]
    fn wrong_magic0_is_rejected() {
        let mut blob = sample_blob();
        blob[0] ^= 0xff;
        assert!(matches!(
            ModelHeader::parse(&blob),
            Err(ModelError::BadMagic { expected: MAGIC0, .. })
        ));
    }

    #[test]
    fn wrong_magic1_is_rejected() {
        let mut blob = sample_blob();
        blob[4] ^= 0xff;
        assert!(matches!(
            ModelHeader::parse(&blob),
            Err(ModelError::BadMagic { expected: MAGIC1, .. })
        ));
    }

    #[test]
    fn unsupported_input_type_is_rejected() {
        let mut blob = sample_blob();
        blob[9 * 4] = 2;
        assert_eq!(
            ModelHeader::parse(&blob).err(),
            Some(ModelError::UnsupportedType { tag: 2 })
        );
    }

    #[test]
    fn unsupported_output_type_is_rejected() {
        let mut blob = sample_blob();
        blob[11 * 4] = 7;
        assert_eq!(
            ModelHeader::parse(&blob).err(),
            Some(ModelError::UnsupportedType { tag: 7 })
        );
    }

    #[test]
    fn shapes_are_located() {
        let blob = sample_blob();
        let header = ModelHeader::parse(&blob).unwrap();
        assert_eq!(header.input_shape().dims().as_slice(), &[2, 3]);
        assert_eq!(header.output_shape().dims().as_slice(), &[6]);
        assert_eq!(header.input_tensor_bytes(), 24);
        assert_eq!(header.output_tensor_bytes(), 24);
    }

    #[test]
    fn reserved_words_round_trip() {
        let blob = sample_blob();
        let header = ModelHeader::parse(&blob).unwrap();
        assert_eq!(
            header.reserved(),
            [0xaaaa_0001, 0xaaaa_0002, 0xaaaa_0003, 0xaaaa_0004]
        );
    }

    #[test]
    fn is_valid_header_matches_parse() {
        let blob = sample_blob();
        assert!(is_valid_header(&blob));
        assert!(!is_valid_header(&blob[..10]));
        assert!(!is_valid_header(&[]));
    }
}
