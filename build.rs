//! Build script for Agent Hub
//!
//! The browser UI under `web/` is embedded into the binary, so the crate is
//! rebuilt whenever those assets change.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=web/");
}
