use std::env;
use std::fs;
use std::path::PathBuf;

// cortex-m-rt's `device` feature links a `device.x` next to its own link.x.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=device.x");

    if env::var_os("CARGO_FEATURE_RT").is_none() {
        return;
    }
    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        println!("cargo:warning=OUT_DIR not set, device.x not staged");
        return;
    };
    if let Err(e) = fs::copy("device.x", out_dir.join("device.x")) {
        println!("cargo:warning=failed to stage device.x: {e}");
        return;
    }
    println!("cargo:rustc-link-search={}", out_dir.display());
}
