use std::env;

use embed_manifest::{embed_manifest, new_manifest};

fn main() {
    // Only the Windows host has a use for an application manifest.
    if env::var_os("CARGO_CFG_WINDOWS").is_some() {
        embed_manifest(new_manifest("GdiBridge")).expect("unable to embed manifest file");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
