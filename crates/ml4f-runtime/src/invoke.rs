//! Control transfer into the embedded compiled routine.
//!
//! This module is the runtime's only `unsafe` boundary. The entry address
//! is computed as `artifact base + header_size + ENTRY_BIAS` and called as
//! a C function taking the artifact base and the arena base. Nothing about
//! the routine is verified — not that the bytes are code, not that they
//! are code for this architecture, not what they write. Callers assert all
//! of that through the `unsafe` contract.

#![allow(unsafe_code)]

use ml4f_model::ModelHeader;

use crate::arena::Arena;
use crate::classify::argmax;
use crate::error::InvokeError;
use crate::{read_f32s, write_f32s};

/// Fixed adjustment added to the computed code-start address.
///
/// On ARM this is 1: the low bit of a branch target is the Thumb
/// interworking bit, and the model compiler emits Thumb-2 code, so calling
/// an even address would switch the core to the (unimplemented) ARM
/// instruction set and fault. On every other architecture the routine
/// starts exactly at `header_size`.
#[cfg(target_arch = "arm")]
pub const ENTRY_BIAS: usize = 1;
/// Fixed adjustment added to the computed code-start address (none on
/// non-ARM targets).
#[cfg(not(target_arch = "arm"))]
pub const ENTRY_BIAS: usize = 0;

/// ABI of the embedded routine: artifact base in the first argument, arena
/// base in the second. It reads its input at `arena + input_offset`,
/// writes its output at `arena + output_offset`, and returns nothing.
type ModelFn = unsafe extern "C" fn(model: *const u8, arena: *mut u8);

/// Transfer control into the model's compiled routine.
///
/// Re-validates the header and returns [`InvokeError::InvalidModel`]
/// instead of jumping when validation fails. Returns `Ok(())` once the
/// routine returns; what the routine actually computed is entirely the
/// producer's responsibility.
///
/// # Safety
///
/// The caller asserts that:
///
/// - `model` really is an artifact whose embedded routine is valid machine
///   code for the *current* architecture, starting at
///   `header_size + ENTRY_BIAS` and following the `ModelFn` ABI;
/// - the blob's bytes are executable on targets that enforce W^X (on a
///   microcontroller running from flash this is automatic; on a host the
///   blob must sit in an executable mapping);
/// - `arena` is at least `arena_bytes` long — the routine will address
///   that much without checking.
pub unsafe fn invoke(model: &[u8], arena: &mut [u8]) -> Result<(), InvokeError> {
    let header = ModelHeader::parse(model)?;
    let entry = model
        .as_ptr()
        .wrapping_add(header.header_size() as usize + ENTRY_BIAS);
    // SAFETY: per this function's contract the bytes at `entry` are a
    // callable routine with the ModelFn ABI, and `arena` satisfies the
    // model's declared size. This is the one place the raw address
    // arithmetic becomes a jump.
    unsafe {
        let routine: ModelFn = core::mem::transmute::<*const u8, ModelFn>(entry);
        routine(model.as_ptr(), arena.as_mut_ptr());
    }
    Ok(())
}

/// Single-shot invocation that hides arena management.
///
/// Allocates a scratch arena of `arena_bytes`, copies `input` into the
/// arena's input region, invokes, copies the arena's output region into
/// `output`, and releases the arena on every path. Buffer lengths are
/// checked against the shapes before anything is allocated.
///
/// # Safety
///
/// Same contract as [`invoke`].
pub unsafe fn full_invoke(
    model: &[u8],
    input: &[f32],
    output: &mut [f32],
) -> Result<(), InvokeError> {
    let header = ModelHeader::parse(model)?;

    let in_elements = header.input_shape().elements();
    if input.len() != in_elements {
        return Err(InvokeError::InputSize {
            expected: in_elements,
            found: input.len(),
        });
    }
    let out_elements = header.output_shape().elements();
    if output.len() != out_elements {
        return Err(InvokeError::OutputSize {
            expected: out_elements,
            found: output.len(),
        });
    }

    let mut arena = Arena::for_model(&header);
    write_f32s(arena.as_mut_slice(), header.input_offset() as usize, input);
    // SAFETY: forwarded from this function's contract; the arena was just
    // sized to the model's arena_bytes.
    unsafe { invoke(model, arena.as_mut_slice())? };
    read_f32s(arena.as_slice(), header.output_offset() as usize, output);
    Ok(())
}

/// Invoke and return the index of the largest output element.
///
/// `None` only for a model whose output tensor is empty — which the format
/// cannot express, since the empty shape denotes a scalar.
///
/// # Safety
///
/// Same contract as [`invoke`].
pub unsafe fn full_invoke_argmax(
    model: &[u8],
    input: &[f32],
) -> Result<Option<usize>, InvokeError> {
    let header = ModelHeader::parse(model)?;
    let mut output = vec![0.0f32; header.output_shape().elements()];
    // SAFETY: forwarded from this function's contract.
    unsafe { full_invoke(model, input, &mut output)? };
    Ok(argmax(&output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ml4f_model::ModelError;

    #[test]
    fn invoke_rejects_invalid_header_without_jumping() {
        // Garbage bytes: validation must fail before any control transfer.
        let blob = vec![0u8; 128];
        let mut arena = vec![0u8; 64];
        let result = unsafe { invoke(&blob, &mut arena) };
        assert!(matches!(
            result,
            Err(InvokeError::InvalidModel {
                reason: ModelError::BadMagic { .. }
            })
        ));
    }

    #[test]
    fn invoke_rejects_truncated_blob() {
        let blob = vec![0u8; 16];
        let mut arena = vec![0u8; 64];
        let result = unsafe { invoke(&blob, &mut arena) };
        assert_eq!(
            result,
            Err(InvokeError::InvalidModel {
                reason: ModelError::Truncated { len: 16 }
            })
        );
    }

    #[test]
    fn entry_bias_is_zero_on_non_arm_hosts() {
        #[cfg(not(target_arch = "arm"))]
        assert_eq!(ENTRY_BIAS, 0);
        #[cfg(target_arch = "arm")]
        assert_eq!(ENTRY_BIAS, 1);
    }
}
