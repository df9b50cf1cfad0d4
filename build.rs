use std::time::{SystemTime, UNIX_EPOCH};

fn emit_build_version() {
    let n = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let version = env!("CARGO_PKG_VERSION");
    println!("cargo:rustc-env=MANELOCA_BUILD_N={n}");
    println!("cargo:rustc-env=MANELOCA_DISPLAY_VERSION={version}");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=assets/translations.csv");
}

fn main() {
    emit_build_version();
}
