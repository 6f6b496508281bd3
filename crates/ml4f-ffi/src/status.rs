//! C-compatible status codes.

use ml4f_runtime::{InvokeError, TestOutcome};

/// Status code returned by the C entry points.
///
/// Values are ABI-stable and match the reference C runtime: `ml4f_test`
/// historically returned 0 for "no tests ran", so `NoTests` shares the
/// value of `Ok` by contract.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ml4fStatus {
    /// Embedded self-test ran and every element matched.
    TestsPassed = 1,
    /// Success (also: no embedded test vectors to run).
    Ok = 0,
    /// Header validation failed, or a pointer argument was null.
    InvalidModel = -1,
    /// Embedded self-test ran and diverged beyond tolerance.
    TestsFailed = -2,
}

impl From<&InvokeError> for Ml4fStatus {
    fn from(_e: &InvokeError) -> Self {
        // Every runtime error is a refusal to invoke; C callers only ever
        // distinguished "invalid" from "ran".
        Ml4fStatus::InvalidModel
    }
}

impl From<TestOutcome> for Ml4fStatus {
    fn from(outcome: TestOutcome) -> Self {
        match outcome {
            TestOutcome::Passed => Ml4fStatus::TestsPassed,
            TestOutcome::NoTests => Ml4fStatus::Ok,
            TestOutcome::Mismatch { .. } => Ml4fStatus::TestsFailed,
        }
    }
}
