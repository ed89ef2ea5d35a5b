// aot-bsp-runtime: build-time validation of schedule sizing constants

use std::env;

fn main() {
    if env::var("PROFILE").unwrap_or_default() == "release" {
        if cfg!(target_arch = "x86_64") {
            println!("cargo:rustc-env=RUSTFLAGS=-C target-cpu=native");
        }
    }

    validate_sizing_constants();

    println!("cargo:warning=Building AOT BSP runtime");
}

fn validate_sizing_constants() {
    const NUM_WORKERS: u32 = 4;
    const MAX_OPS_PER_LAYER: u32 = 16;

    const _: () = {
        if NUM_WORKERS == 0 {
            panic!("NUM_WORKERS must be at least 1");
        }
        if MAX_OPS_PER_LAYER == 0 {
            panic!("MAX_OPS_PER_LAYER must be at least 1");
        }
    };

    println!("cargo:rustc-env=NUM_WORKERS={}", NUM_WORKERS);
    println!("cargo:rustc-env=MAX_OPS_PER_LAYER={}", MAX_OPS_PER_LAYER);
}
