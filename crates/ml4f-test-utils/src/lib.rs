//! Synthetic artifact builders for ML4F runtime tests.
//!
//! Real artifacts come out of the offline model compiler; tests need
//! blobs with known contents, including deliberately broken ones. This
//! crate assembles artifacts in memory ([`ArtifactBuilder`]), emits tiny
//! host routines so end-to-end tests perform a real control transfer
//! ([`routines`]), and maps finished blobs into executable memory
//! ([`ExecArtifact`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use ml4f_model::{FIXED_HEADER_BYTES, MAGIC0, MAGIC1, TYPE_FLOAT32};

/// Builder for a complete in-memory artifact.
///
/// Defaults produce a valid header; the magic and type knobs exist so
/// tests can corrupt exactly one field at a time. Layout follows the
/// compiler's emission order: fixed words, shapes, routine, weights, test
/// vectors.
pub struct ArtifactBuilder {
    magic0: u32,
    magic1: u32,
    input_type: u32,
    output_type: u32,
    reserved: [u32; 4],
    input_shape: Vec<u32>,
    output_shape: Vec<u32>,
    input_offset: Option<u32>,
    output_offset: Option<u32>,
    arena_bytes: Option<u32>,
    weights: Vec<f32>,
    test_vectors: Option<(Vec<f32>, Vec<f32>)>,
    routine: Vec<u8>,
}

impl ArtifactBuilder {
    /// Start from a valid artifact with the given tensor shapes.
    pub fn new(input_shape: &[u32], output_shape: &[u32]) -> Self {
        Self {
            magic0: MAGIC0,
            magic1: MAGIC1,
            input_type: TYPE_FLOAT32,
            output_type: TYPE_FLOAT32,
            reserved: [0; 4],
            input_shape: input_shape.to_vec(),
            output_shape: output_shape.to_vec(),
            input_offset: None,
            output_offset: None,
            arena_bytes: None,
            weights: Vec::new(),
            test_vectors: None,
            routine: Vec::new(),
        }
    }

    pub fn magic0(mut self, v: u32) -> Self {
        self.magic0 = v;
        self
    }

    pub fn magic1(mut self, v: u32) -> Self {
        self.magic1 = v;
        self
    }

    pub fn input_type(mut self, v: u32) -> Self {
        self.input_type = v;
        self
    }

    pub fn output_type(mut self, v: u32) -> Self {
        self.output_type = v;
        self
    }

    pub fn reserved(mut self, words: [u32; 4]) -> Self {
        self.reserved = words;
        self
    }

    /// Arena offset of the input tensor. Default 0.
    pub fn input_offset(mut self, v: u32) -> Self {
        self.input_offset = Some(v);
        self
    }

    /// Arena offset of the output tensor. Default: right after the input
    /// tensor.
    pub fn output_offset(mut self, v: u32) -> Self {
        self.output_offset = Some(v);
        self
    }

    /// Arena size. Default: input + output tensor bytes.
    pub fn arena_bytes(mut self, v: u32) -> Self {
        self.arena_bytes = Some(v);
        self
    }

    pub fn weights(mut self, weights: &[f32]) -> Self {
        self.weights = weights.to_vec();
        self
    }

    /// Embed golden test vectors (sets both test offsets).
    pub fn test_vectors(mut self, input: &[f32], output: &[f32]) -> Self {
        self.test_vectors = Some((input.to_vec(), output.to_vec()));
        self
    }

    /// The compiled routine bytes, placed at `header_size`.
    pub fn routine(mut self, code: &[u8]) -> Self {
        self.routine = code.to_vec();
        self
    }

    fn tensor_bytes(shape: &[u32]) -> u32 {
        // The empty product is 1: a scalar still occupies one float.
        shape.iter().product::<u32>() * 4
    }

    /// Assemble the artifact.
    pub fn build(&self) -> Vec<u8> {
        let shape_words = self.input_shape.len() + 1 + self.output_shape.len() + 1;
        let header_size = (FIXED_HEADER_BYTES + 4 * shape_words) as u32;

        let input_bytes = Self::tensor_bytes(&self.input_shape);
        let output_bytes = Self::tensor_bytes(&self.output_shape);
        let input_offset = self.input_offset.unwrap_or(0);
        let output_offset = self.output_offset.unwrap_or(input_offset + input_bytes);
        let arena_bytes = self
            .arena_bytes
            .unwrap_or((input_offset + input_bytes).max(output_offset + output_bytes));

        // Routine padded so the float arrays after it stay word-aligned.
        let routine_bytes = (self.routine.len() + 3) / 4 * 4;
        let weights_offset = header_size + routine_bytes as u32;
        let weights_end = weights_offset + 4 * self.weights.len() as u32;

        let (test_input_offset, test_output_offset, object_size) = match &self.test_vectors {
            Some((test_in, test_out)) => {
                let ti = weights_end;
                let to = ti + 4 * test_in.len() as u32;
                (ti, to, to + 4 * test_out.len() as u32)
            }
            None => (0, 0, weights_end),
        };

        fn word(blob: &mut Vec<u8>, v: u32) {
            blob.extend_from_slice(&v.to_le_bytes());
        }

        let mut blob = Vec::with_capacity(object_size as usize);
        word(&mut blob, self.magic0);
        word(&mut blob, self.magic1);
        word(&mut blob, header_size);
        word(&mut blob, object_size);
        word(&mut blob, weights_offset);
        word(&mut blob, test_input_offset);
        word(&mut blob, test_output_offset);
        word(&mut blob, arena_bytes);
        word(&mut blob, input_offset);
        word(&mut blob, self.input_type);
        word(&mut blob, output_offset);
        word(&mut blob, self.output_type);
        for r in self.reserved {
            word(&mut blob, r);
        }
        for &d in &self.input_shape {
            word(&mut blob, d);
        }
        word(&mut blob, 0);
        for &d in &self.output_shape {
            word(&mut blob, d);
        }
        word(&mut blob, 0);

        blob.extend_from_slice(&self.routine);
        blob.resize(weights_offset as usize, 0);
        for &w in &self.weights {
            blob.extend_from_slice(&w.to_le_bytes());
        }
        if let Some((test_in, test_out)) = &self.test_vectors {
            for &v in test_in {
                blob.extend_from_slice(&v.to_le_bytes());
            }
            for &v in test_out {
                blob.extend_from_slice(&v.to_le_bytes());
            }
        }

        debug_assert_eq!(blob.len(), object_size as usize);
        blob
    }
}

/// Emitters for tiny x86-64 routines used by end-to-end tests.
///
/// The emitted code follows the artifact ABI (artifact base in `rdi`,
/// arena base in `rsi` under the SysV calling convention) and is only
/// runnable on x86-64 unix hosts; emission itself is portable.
pub mod routines {
    /// Copy `words` 4-byte words from `arena + input_offset` to
    /// `arena + output_offset`, then return.
    pub fn copy(input_offset: u32, output_offset: u32, words: u32) -> Vec<u8> {
        let mut code = Vec::new();
        for i in 0..words {
            // mov eax, [rsi + disp32]
            code.extend_from_slice(&[0x8b, 0x86]);
            code.extend_from_slice(&(input_offset + 4 * i).to_le_bytes());
            // mov [rsi + disp32], eax
            code.extend_from_slice(&[0x89, 0x86]);
            code.extend_from_slice(&(output_offset + 4 * i).to_le_bytes());
        }
        code.push(0xc3); // ret
        code
    }

    /// Write `2 * x` to the output region for each input float `x`.
    pub fn double(input_offset: u32, output_offset: u32, words: u32) -> Vec<u8> {
        let mut code = Vec::new();
        for i in 0..words {
            // movss xmm0, [rsi + disp32]
            code.extend_from_slice(&[0xf3, 0x0f, 0x10, 0x86]);
            code.extend_from_slice(&(input_offset + 4 * i).to_le_bytes());
            // addss xmm0, xmm0
            code.extend_from_slice(&[0xf3, 0x0f, 0x58, 0xc0]);
            // movss [rsi + disp32], xmm0
            code.extend_from_slice(&[0xf3, 0x0f, 0x11, 0x86]);
            code.extend_from_slice(&(output_offset + 4 * i).to_le_bytes());
        }
        code.push(0xc3); // ret
        code
    }
}

/// An artifact copied into an anonymous executable mapping.
///
/// On hosts that enforce W^X, a routine embedded in a heap `Vec` cannot be
/// called; the blob has to live in pages mapped executable. On a
/// microcontroller the artifact executes in place from flash and none of
/// this is needed.
pub struct ExecArtifact {
    map: memmap2::Mmap,
    len: usize,
}

impl ExecArtifact {
    /// Map `blob` into executable memory.
    pub fn new(blob: &[u8]) -> std::io::Result<Self> {
        let mut map = memmap2::MmapMut::map_anon(blob.len().max(1))?;
        map[..blob.len()].copy_from_slice(blob);
        Ok(Self {
            map: map.make_exec()?,
            len: blob.len(),
        })
    }

    /// The mapped artifact bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.map[..self.len]
    }
}
