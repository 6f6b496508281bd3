//! Self-test harness: run a model against its embedded golden vectors.
//!
//! Artifacts may carry a test input and expected output baked in by the
//! compiler. The harness copies the test input into the arena, invokes the
//! routine, and compares every output element with tolerance. "No tests"
//! is a distinct outcome from pass and fail, so callers can tell "can't
//! tell" apart from "tested and diverged".

#![allow(unsafe_code)]

use ml4f_model::ModelHeader;

use crate::error::InvokeError;
use crate::f32_at;
use crate::invoke::invoke;

/// Tolerance used by [`is_near`], matching the reference runtime.
pub const EPSILON: f32 = 0.00002;

/// Combined absolute/relative approximate equality.
///
/// Two floats match if their absolute difference is below [`EPSILON`], or
/// if the difference divided by the sum of their magnitudes is — the
/// relative arm keeps large-magnitude outputs comparable despite
/// platform-dependent rounding in the compiled routine's arithmetic.
pub fn is_near(a: f32, b: f32) -> bool {
    let diff = (a - b).abs();
    if diff < EPSILON {
        return true;
    }
    diff / (a.abs() + b.abs()) < EPSILON
}

/// Result of running a model's embedded self-test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    /// Every output element matched the expected vector within tolerance.
    Passed,
    /// The artifact carries no test vectors (either offset is 0).
    NoTests,
    /// An output element diverged beyond tolerance.
    Mismatch {
        /// Index of the first diverging element; comparison short-circuits
        /// there.
        index: usize,
    },
}

/// Run the model's embedded test vectors through its compiled routine.
///
/// Validation failures surface as [`InvokeError::InvalidModel`] before
/// anything is copied or invoked.
///
/// # Safety
///
/// Same contract as [`invoke`]: the artifact must contain a callable
/// routine for this architecture and `arena` must be at least
/// `arena_bytes` long.
pub unsafe fn self_test(model: &[u8], arena: &mut [u8]) -> Result<TestOutcome, InvokeError> {
    let header = ModelHeader::parse(model)?;

    if header.test_input_offset() == 0 || header.test_output_offset() == 0 {
        return Ok(TestOutcome::NoTests);
    }

    let input_bytes = header.input_tensor_bytes();
    let arena_in = header.input_offset() as usize;
    let test_in = header.test_input_offset() as usize;
    arena[arena_in..arena_in + input_bytes]
        .copy_from_slice(&model[test_in..test_in + input_bytes]);

    // SAFETY: forwarded from this function's contract.
    unsafe { invoke(model, arena)? };

    let elements = header.output_shape().elements();
    let arena_out = header.output_offset() as usize;
    let test_out = header.test_output_offset() as usize;
    for i in 0..elements {
        let actual = f32_at(arena, arena_out + 4 * i);
        let expected = f32_at(model, test_out + 4 * i);
        if !is_near(actual, expected) {
            return Ok(TestOutcome::Mismatch { index: i });
        }
    }
    Ok(TestOutcome::Passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn near_within_absolute_epsilon() {
        assert!(is_near(1.0, 1.00001));
        assert!(is_near(0.0, 0.0));
        assert!(is_near(-0.0, 0.0));
    }

    #[test]
    fn near_within_relative_epsilon() {
        // Absolute difference is 2.0, far beyond EPSILON, but relative to
        // the magnitudes it is 1e-5.
        assert!(is_near(100000.0, 100002.0));
    }

    #[test]
    fn not_near_when_diverged() {
        assert!(!is_near(1.0, 2.0));
        assert!(!is_near(0.0, 1.0));
        assert!(!is_near(-1.0, 1.0));
    }

    #[test]
    fn self_test_rejects_invalid_model() {
        let blob = vec![0u8; 128];
        let mut arena = vec![0u8; 64];
        let result = unsafe { self_test(&blob, &mut arena) };
        assert!(matches!(result, Err(InvokeError::InvalidModel { .. })));
    }

    proptest! {
        #[test]
        fn near_is_reflexive(a in -1e30f32..1e30) {
            prop_assert!(is_near(a, a));
        }

        #[test]
        fn near_is_symmetric(a in -1e6f32..1e6, b in -1e6f32..1e6) {
            prop_assert_eq!(is_near(a, b), is_near(b, a));
        }
    }
}
