//! Generate the C header for device-side consumers.

use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let out = PathBuf::from(&crate_dir).join("include").join("ml4f.h");

    // Header generation is best-effort: a cbindgen parse failure should
    // not fail the build of the library itself.
    if let Ok(bindings) = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("ML4F_H")
        .with_cpp_compat(true)
        .generate()
    {
        bindings.write_to_file(out);
    }
    println!("cargo:rerun-if-changed=src");
}
