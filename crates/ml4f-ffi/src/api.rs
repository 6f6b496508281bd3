//! The `ml4f_*` entry points.
//!
//! Everything here trusts the caller the way the reference C runtime did:
//! the artifact pointer must address at least the fixed header, and for a
//! valid artifact, `object_size` bytes. The arena pointer must address at
//! least `arena_bytes`. Null pointers are the one caller mistake that is
//! detected and answered with [`Ml4fStatus::InvalidModel`].

#![allow(unsafe_code)]

use std::slice;

use ml4f_model::{ModelHeader, FIXED_HEADER_BYTES, TYPE_FLOAT32};
use ml4f_runtime::{argmax, full_invoke, full_invoke_argmax, invoke, self_test};

use crate::status::Ml4fStatus;

/// The fixed artifact header, as laid out in the blob.
///
/// Exposed for C callers; the Rust side reads fields through the
/// endian-explicit [`ModelHeader`] view instead of this struct.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Ml4fHeader {
    /// First magic word, `0x30470f62`.
    pub magic0: u32,
    /// Second magic word, `"ML4F"`.
    pub magic1: u32,
    /// Bytes from artifact start to the compiled routine.
    pub header_size: u32,
    /// Total artifact length.
    pub object_size: u32,
    /// Byte offset of the weight data.
    pub weights_offset: u32,
    /// Byte offset of the golden test input; 0 = absent.
    pub test_input_offset: u32,
    /// Byte offset of the golden test output; 0 = absent.
    pub test_output_offset: u32,
    /// Minimum scratch buffer size.
    pub arena_bytes: u32,
    /// Input tensor offset within the arena.
    pub input_offset: u32,
    /// Input element type tag (1 = float32).
    pub input_type: u32,
    /// Output tensor offset within the arena.
    pub output_offset: u32,
    /// Output element type tag (1 = float32).
    pub output_type: u32,
    /// Reserved, preserved unchanged.
    pub reserved: [u32; 4],
}

/// View the whole artifact through a validated header.
///
/// # Safety
///
/// `model` must address at least [`FIXED_HEADER_BYTES`] readable bytes,
/// and, when the header validates, `object_size` readable bytes.
unsafe fn model_view<'a>(model: *const Ml4fHeader) -> Option<ModelHeader<'a>> {
    if model.is_null() {
        return None;
    }
    // SAFETY: caller guarantees the fixed header is readable. Validation
    // reads only these bytes.
    let fixed = unsafe { slice::from_raw_parts(model.cast::<u8>(), FIXED_HEADER_BYTES) };
    let header = ModelHeader::parse(fixed).ok()?;
    let len = (header.object_size() as usize).max(FIXED_HEADER_BYTES);
    // SAFETY: the header validated, so per the caller contract the full
    // declared object is readable.
    let blob = unsafe { slice::from_raw_parts(model.cast::<u8>(), len) };
    ModelHeader::parse(blob).ok()
}

/// Check whether `header` points at a usable artifact. Returns 1 or 0.
///
/// # Safety
///
/// `header` must be null or address at least [`FIXED_HEADER_BYTES`]
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn ml4f_is_valid_header(header: *const Ml4fHeader) -> i32 {
    // SAFETY: forwarded caller contract.
    i32::from(unsafe { model_view(header) }.is_some())
}

/// Transfer control into the model's compiled routine.
///
/// Returns 0 on success, -1 for an invalid header or null argument.
///
/// # Safety
///
/// `model` must satisfy [`ml4f_is_valid_header`]'s contract and contain a
/// callable routine for this architecture; `arena` must address at least
/// `arena_bytes` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn ml4f_invoke(model: *const Ml4fHeader, arena: *mut u8) -> i32 {
    // SAFETY: forwarded caller contract.
    let Some(header) = (unsafe { model_view(model) }) else {
        return Ml4fStatus::InvalidModel as i32;
    };
    if arena.is_null() {
        return Ml4fStatus::InvalidModel as i32;
    }
    // SAFETY: caller guarantees arena_bytes writable bytes.
    let arena = unsafe { slice::from_raw_parts_mut(arena, header.arena_bytes() as usize) };
    // SAFETY: forwarded caller contract (routine validity).
    match unsafe { invoke(header.bytes(), arena) } {
        Ok(()) => Ml4fStatus::Ok as i32,
        Err(e) => Ml4fStatus::from(&e) as i32,
    }
}

/// Run the model's embedded self-test vectors.
///
/// Returns 1 if all elements matched, 0 if the artifact has no test
/// vectors, -1 for an invalid header, -2 on mismatch.
///
/// # Safety
///
/// Same contract as [`ml4f_invoke`].
#[no_mangle]
pub unsafe extern "C" fn ml4f_test(model: *const Ml4fHeader, arena: *mut u8) -> i32 {
    // SAFETY: forwarded caller contract.
    let Some(header) = (unsafe { model_view(model) }) else {
        return Ml4fStatus::InvalidModel as i32;
    };
    if arena.is_null() {
        return Ml4fStatus::InvalidModel as i32;
    }
    // SAFETY: caller guarantees arena_bytes writable bytes.
    let arena = unsafe { slice::from_raw_parts_mut(arena, header.arena_bytes() as usize) };
    // SAFETY: forwarded caller contract.
    match unsafe { self_test(header.bytes(), arena) } {
        Ok(outcome) => Ml4fStatus::from(outcome) as i32,
        Err(e) => Ml4fStatus::from(&e) as i32,
    }
}

/// Pointer to the input tensor's zero-terminated shape, or null if the
/// artifact is invalid.
///
/// # Safety
///
/// Same contract as [`ml4f_is_valid_header`].
#[no_mangle]
pub unsafe extern "C" fn ml4f_input_shape(model: *const Ml4fHeader) -> *const u32 {
    // SAFETY: forwarded caller contract.
    match unsafe { model_view(model) } {
        Some(_) => {
            // SAFETY: a valid header is followed by the shape words.
            unsafe { model.cast::<u8>().add(FIXED_HEADER_BYTES).cast::<u32>() }
        }
        None => std::ptr::null(),
    }
}

/// Pointer to the output tensor's zero-terminated shape, located by
/// scanning past the input shape's terminator. Null if invalid.
///
/// # Safety
///
/// Same contract as [`ml4f_is_valid_header`].
#[no_mangle]
pub unsafe extern "C" fn ml4f_output_shape(model: *const Ml4fHeader) -> *const u32 {
    // SAFETY: forwarded caller contract.
    let Some(header) = (unsafe { model_view(model) }) else {
        return std::ptr::null();
    };
    let input_words = header.input_shape().iter().count() + 1;
    let offset = FIXED_HEADER_BYTES + 4 * input_words;
    // SAFETY: offset stays within the shape region of the validated blob.
    unsafe { model.cast::<u8>().add(offset).cast::<u32>() }
}

/// Element count of a zero-terminated shape: the product of its entries,
/// 1 for the empty shape. Returns 0 only for a null pointer.
///
/// # Safety
///
/// `shape` must be null or point at a zero-terminated `u32` sequence.
/// Unlike the slice-based API, this scan trusts the terminator — exactly
/// like the C runtime it replaces.
#[no_mangle]
pub unsafe extern "C" fn ml4f_shape_elements(shape: *const u32) -> u32 {
    if shape.is_null() {
        return 0;
    }
    let mut product: u32 = 1;
    let mut p = shape;
    // SAFETY: caller guarantees the sequence is terminated; reads are
    // unaligned-tolerant so a byte-packed blob is fine.
    unsafe {
        while std::ptr::read_unaligned(p) != 0 {
            product = product.wrapping_mul(std::ptr::read_unaligned(p));
            p = p.add(1);
        }
    }
    product
}

/// Byte size of a tensor: `elements * 4` for float32, 0 for any other
/// type tag.
///
/// # Safety
///
/// Same contract as [`ml4f_shape_elements`].
#[no_mangle]
pub unsafe extern "C" fn ml4f_shape_size(shape: *const u32, type_tag: u32) -> u32 {
    if type_tag != TYPE_FLOAT32 {
        return 0;
    }
    // SAFETY: forwarded caller contract.
    unsafe { ml4f_shape_elements(shape) }.wrapping_shl(2)
}

/// Index of the largest element of `data`, or -1 if `data` is null or
/// `size` is 0.
///
/// # Safety
///
/// `data` must be null or address `size` readable floats.
#[no_mangle]
pub unsafe extern "C" fn ml4f_argmax(data: *const f32, size: u32) -> i32 {
    if data.is_null() || size == 0 {
        return -1;
    }
    // SAFETY: caller guarantees `size` readable floats.
    let data = unsafe { slice::from_raw_parts(data, size as usize) };
    match argmax(data) {
        Some(i) => i as i32,
        None => -1,
    }
}

/// Single-shot invocation: allocates a scratch arena, copies `input` in,
/// invokes, copies the output region out, releases the arena. Returns 0
/// or -1.
///
/// # Safety
///
/// `model` as for [`ml4f_invoke`]; `input` and `output` must address the
/// input and output tensors' element counts respectively.
#[no_mangle]
pub unsafe extern "C" fn ml4f_full_invoke(
    model: *const Ml4fHeader,
    input: *const f32,
    output: *mut f32,
) -> i32 {
    // SAFETY: forwarded caller contract.
    let Some(header) = (unsafe { model_view(model) }) else {
        return Ml4fStatus::InvalidModel as i32;
    };
    if input.is_null() || output.is_null() {
        return Ml4fStatus::InvalidModel as i32;
    }
    // SAFETY: caller guarantees both buffers match the tensor shapes.
    let input = unsafe { slice::from_raw_parts(input, header.input_shape().elements()) };
    let output =
        unsafe { slice::from_raw_parts_mut(output, header.output_shape().elements()) };
    // SAFETY: forwarded caller contract.
    match unsafe { full_invoke(header.bytes(), input, output) } {
        Ok(()) => Ml4fStatus::Ok as i32,
        Err(e) => Ml4fStatus::from(&e) as i32,
    }
}

/// [`ml4f_full_invoke`] followed by argmax over the output tensor.
/// Returns the winning index, or -1 on any failure.
///
/// # Safety
///
/// Same contract as [`ml4f_full_invoke`], minus the output buffer.
#[no_mangle]
pub unsafe extern "C" fn ml4f_full_invoke_argmax(
    model: *const Ml4fHeader,
    input: *const f32,
) -> i32 {
    // SAFETY: forwarded caller contract.
    let Some(header) = (unsafe { model_view(model) }) else {
        return Ml4fStatus::InvalidModel as i32;
    };
    if input.is_null() {
        return Ml4fStatus::InvalidModel as i32;
    }
    // SAFETY: caller guarantees the input buffer matches the input shape.
    let input = unsafe { slice::from_raw_parts(input, header.input_shape().elements()) };
    // SAFETY: forwarded caller contract.
    match unsafe { full_invoke_argmax(header.bytes(), input) } {
        Ok(Some(i)) => i as i32,
        Ok(None) => -1,
        Err(e) => Ml4fStatus::from(&e) as i32,
    }
}
