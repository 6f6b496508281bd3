//! Exercise the C entry points from Rust, the way a device caller would.
//!
//! Blobs are re-packed into `u32` storage before casting so the header
//! pointer has the alignment the C contract promises.

use ml4f_ffi::api::{
    ml4f_input_shape, ml4f_invoke, ml4f_is_valid_header, ml4f_output_shape, ml4f_shape_elements,
    ml4f_shape_size, ml4f_test,
};
use ml4f_ffi::Ml4fHeader;
use ml4f_test_utils::ArtifactBuilder;

/// Repack a byte blob into word-aligned storage.
fn aligned(blob: &[u8]) -> Vec<u32> {
    assert_eq!(blob.len() % 4, 0);
    blob.chunks_exact(4)
        .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn header_ptr(words: &[u32]) -> *const Ml4fHeader {
    words.as_ptr().cast()
}

#[test]
fn null_pointers_are_invalid_everywhere() {
    let mut arena = [0u8; 16];
    unsafe {
        assert_eq!(ml4f_is_valid_header(std::ptr::null()), 0);
        assert_eq!(ml4f_invoke(std::ptr::null(), arena.as_mut_ptr()), -1);
        assert_eq!(ml4f_test(std::ptr::null(), arena.as_mut_ptr()), -1);
        assert!(ml4f_input_shape(std::ptr::null()).is_null());
        assert!(ml4f_output_shape(std::ptr::null()).is_null());
        assert_eq!(ml4f_shape_elements(std::ptr::null()), 0);
    }
}

#[test]
fn valid_and_corrupted_headers() {
    let good = aligned(&ArtifactBuilder::new(&[2, 3], &[6]).build());
    let bad_magic = aligned(&ArtifactBuilder::new(&[2, 3], &[6]).magic0(1).build());
    let bad_type = aligned(&ArtifactBuilder::new(&[2, 3], &[6]).output_type(0).build());
    unsafe {
        assert_eq!(ml4f_is_valid_header(header_ptr(&good)), 1);
        assert_eq!(ml4f_is_valid_header(header_ptr(&bad_magic)), 0);
        assert_eq!(ml4f_is_valid_header(header_ptr(&bad_type)), 0);
    }
}

#[test]
fn invoke_and_test_refuse_invalid_models() {
    let bad = aligned(&ArtifactBuilder::new(&[2], &[2]).magic1(0).build());
    let mut arena = [0u8; 16];
    unsafe {
        assert_eq!(ml4f_invoke(header_ptr(&bad), arena.as_mut_ptr()), -1);
        assert_eq!(ml4f_test(header_ptr(&bad), arena.as_mut_ptr()), -1);
        assert_eq!(
            ml4f_invoke(header_ptr(&bad), std::ptr::null_mut()),
            -1
        );
    }
}

#[test]
fn shape_pointers_walk_the_header() {
    let blob = aligned(&ArtifactBuilder::new(&[2, 3], &[6]).build());
    unsafe {
        let input = ml4f_input_shape(header_ptr(&blob));
        assert_eq!(ml4f_shape_elements(input), 6);
        assert_eq!(ml4f_shape_size(input, 1), 24);
        assert_eq!(ml4f_shape_size(input, 2), 0);

        let output = ml4f_output_shape(header_ptr(&blob));
        assert_eq!(ml4f_shape_elements(output), 6);
        // The output shape begins right past the input terminator:
        // 64 bytes of fixed header plus three shape words.
        assert_eq!(output as usize - input as usize, 12);
    }
}

#[test]
fn empty_shape_reads_as_scalar_through_the_c_api() {
    let blob = aligned(&ArtifactBuilder::new(&[], &[4]).build());
    unsafe {
        let input = ml4f_input_shape(header_ptr(&blob));
        assert_eq!(ml4f_shape_elements(input), 1);
        assert_eq!(ml4f_shape_size(input, 1), 4);
        let output = ml4f_output_shape(header_ptr(&blob));
        assert_eq!(ml4f_shape_elements(output), 4);
    }
}

#[test]
fn test_without_vectors_returns_zero() {
    let blob = aligned(&ArtifactBuilder::new(&[2], &[2]).build());
    let mut arena = [0u8; 16];
    unsafe {
        assert_eq!(ml4f_test(header_ptr(&blob), arena.as_mut_ptr()), 0);
    }
}

#[test]
fn argmax_handles_null_and_empty() {
    unsafe {
        assert_eq!(ml4f_ffi::api::ml4f_argmax(std::ptr::null(), 4), -1);
        let data = [0.1f32, 0.9, 0.5];
        assert_eq!(ml4f_ffi::api::ml4f_argmax(data.as_ptr(), 0), -1);
        assert_eq!(ml4f_ffi::api::ml4f_argmax(data.as_ptr(), 3), 1);
    }
}

#[cfg(all(target_arch = "x86_64", unix))]
mod transfer {
    use super::*;
    use ml4f_ffi::api::{ml4f_full_invoke, ml4f_full_invoke_argmax};
    use ml4f_test_utils::{routines, ExecArtifact};

    #[test]
    fn full_invoke_round_trips_through_the_routine() {
        let blob = ArtifactBuilder::new(&[2], &[2])
            .routine(&routines::copy(0, 8, 2))
            .build();
        let model = ExecArtifact::new(&blob).unwrap();
        let input = [3.0f32, -4.0];
        let mut output = [0.0f32; 2];
        let status = unsafe {
            ml4f_full_invoke(
                model.bytes().as_ptr().cast(),
                input.as_ptr(),
                output.as_mut_ptr(),
            )
        };
        assert_eq!(status, 0);
        assert_eq!(output, [3.0, -4.0]);
    }

    #[test]
    fn self_test_statuses_through_the_c_api() {
        let passing = ArtifactBuilder::new(&[2], &[2])
            .routine(&routines::copy(0, 8, 2))
            .test_vectors(&[1.0, 1.0], &[1.0, 1.0])
            .build();
        let failing = ArtifactBuilder::new(&[2], &[2])
            .routine(&routines::copy(0, 8, 2))
            .test_vectors(&[1.0, 1.0], &[1.0, 9.0])
            .build();
        let passing = ExecArtifact::new(&passing).unwrap();
        let failing = ExecArtifact::new(&failing).unwrap();
        let mut arena = [0u8; 16];
        unsafe {
            assert_eq!(
                ml4f_test(passing.bytes().as_ptr().cast(), arena.as_mut_ptr()),
                1
            );
            assert_eq!(
                ml4f_test(failing.bytes().as_ptr().cast(), arena.as_mut_ptr()),
                -2
            );
        }
    }

    #[test]
    fn argmax_composition() {
        let blob = ArtifactBuilder::new(&[3], &[3])
            .output_offset(12)
            .arena_bytes(24)
            .routine(&routines::double(0, 12, 3))
            .build();
        let model = ExecArtifact::new(&blob).unwrap();
        let input = [0.5f32, 2.0, -1.0];
        let best = unsafe { ml4f_full_invoke_argmax(model.bytes().as_ptr().cast(), input.as_ptr()) };
        assert_eq!(best, 1);
    }
}
