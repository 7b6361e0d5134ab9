//! Build script: pre-flight checks for GPU feature flags.
//!
//! Verifies that required toolkits are installed before whisper-rs-sys tries
//! to compile, and embeds the git hash for the version string.

use std::process::Command;

fn main() {
    // Embed git short hash for version string
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        && output.status.success()
    {
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    if cfg!(feature = "cuda") {
        check_cuda();
    }
    if cfg!(feature = "vulkan") {
        check_vulkan();
    }
    if cfg!(feature = "hipblas") {
        check_rocm();
    }
    if cfg!(feature = "openblas") {
        check_openblas();
    }
}

fn check_cuda() {
    let output = Command::new("nvcc").arg("--version").output();
    match output {
        Ok(out) if out.status.success() => {
            let text = String::from_utf8_lossy(&out.stdout);
            match parse_cuda_version(&text) {
                Some((major, minor)) => {
                    println!("cargo::warning=Building with CUDA {}.{}", major, minor)
                }
                None => println!("cargo::warning=Building with CUDA (version unknown)"),
            }
        }
        _ => {
            panic!(
                "\n`nvcc` not found — CUDA toolkit is not installed.\n\
                 Install: https://developer.nvidia.com/cuda-downloads\n\
                 Or build without CUDA: cargo build --release\n",
            );
        }
    }
}

/// Parse "release X.Y" from nvcc --version output.
fn parse_cuda_version(text: &str) -> Option<(u32, u32)> {
    // nvcc output: "Cuda compilation tools, release 12.4, V12.4.131"
    let release_pos = text.find("release ")?;
    let after = &text[release_pos + 8..];
    let comma = after.find(',')?;
    let version_str = &after[..comma];
    let mut parts = version_str.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

fn check_vulkan() {
    if Command::new("vulkaninfo")
        .arg("--summary")
        .output()
        .is_err()
    {
        panic!(
            "\n`vulkaninfo` not found — Vulkan SDK is not installed.\n\
             Install: https://vulkan.lunarg.com/\n\
             Or build without Vulkan: cargo build --release\n",
        );
    }
    println!("cargo::warning=Vulkan SDK detected");
}

fn check_rocm() {
    if Command::new("rocminfo").output().is_err() {
        panic!(
            "\n`rocminfo` not found — ROCm is not installed.\n\
             Install: https://rocm.docs.amd.com/\n\
             Or build without HipBLAS: cargo build --release\n",
        );
    }
    println!("cargo::warning=ROCm detected");
}

fn check_openblas() {
    let pkg_config_ok = Command::new("pkg-config")
        .args(["--exists", "openblas"])
        .status()
        .is_ok_and(|s| s.success());

    if !pkg_config_ok {
        let lib_exists = std::path::Path::new("/usr/lib/x86_64-linux-gnu/libopenblas.so").exists()
            || std::path::Path::new("/usr/lib/libopenblas.so").exists()
            || std::path::Path::new("/usr/lib64/libopenblas.so").exists();

        if !lib_exists {
            panic!(
                "\nOpenBLAS not found.\n\
                 Install: sudo apt install libopenblas-dev\n\
                 Or build without OpenBLAS: cargo build --release\n",
            );
        }
    }
    println!("cargo::warning=OpenBLAS detected");
}
