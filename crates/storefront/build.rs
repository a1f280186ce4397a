//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (CSS and JS) so they can
//! be served from immutable, fingerprinted URLs.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Static assets to fingerprint: (path under `static/`, env var for the hash).
const ASSETS: &[(&str, &str)] = &[("css/main.css", "CSS_HASH"), ("js/catalog.js", "JS_HASH")];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    for (asset, var) in ASSETS {
        hash_asset(&static_dir, asset, var);
    }
}

/// Hash one asset and copy it to `derived/` with the hash in its file name.
///
/// `static/css/main.css` becomes `static/css/derived/main.<hash>.css`, and
/// `<var>` is set for use with `env!`.
fn hash_asset(static_dir: &Path, asset: &str, var: &str) {
    let source = static_dir.join(asset);
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {asset}: {e}");
            println!("cargo:rustc-env={var}=");
            return;
        }
    };

    // First 8 hex chars of SHA-256
    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];
    println!("cargo:rustc-env={var}={short_hash}");

    let (Some(parent), Some(stem), Some(ext)) = (
        source.parent(),
        source.file_stem().and_then(|s| s.to_str()),
        source.extension().and_then(|s| s.to_str()),
    ) else {
        println!("cargo:warning=Unexpected asset path {asset}");
        return;
    };

    let derived_dir = parent.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    fs::copy(&source, derived_dir.join(format!("{stem}.{short_hash}.{ext}")))
        .expect("Failed to copy asset to derived directory");
}
