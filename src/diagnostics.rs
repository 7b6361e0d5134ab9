//! System diagnostics and dependency checking.
//!
//! Verifies that the tools and services the pipeline depends on are
//! installed and reachable before any call is processed.

use crate::config::Config;
use crate::models;
use std::process::Command;
use std::time::Duration;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Dependency is installed / reachable
    Ok,
    /// Dependency is not found
    NotFound,
    /// Dependency is present but has issues
    Warning(String),
}

/// Check if a command exists and is executable.
fn check_command(command: &str) -> CheckResult {
    match Command::new(command).arg("-version").output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning(format!("'{}' found but -version failed", command)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Probe the translation endpoint with a trivial request.
///
/// Reachability only; an HTTP error status still means the host answers.
fn check_translation_endpoint(endpoint: &str) -> CheckResult {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => return CheckResult::Warning(format!("HTTP client error: {}", e)),
    };

    match client.get(endpoint).send() {
        Ok(_) => CheckResult::Ok,
        Err(e) if e.is_timeout() => CheckResult::Warning("endpoint timed out".to_string()),
        Err(e) if e.is_connect() => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("{}", e)),
    }
}

/// Run all dependency checks and print results.
///
/// Returns true when everything needed to process a call is available.
/// Must be called off the async runtime (uses blocking HTTP).
pub fn check_dependencies(config: &Config) -> bool {
    println!("callscribe {}", crate::version_string());
    println!("Checking dependencies...\n");

    let mut all_ok = true;

    print!("ffmpeg ({}): ", config.audio.ffmpeg_path);
    match check_command(&config.audio.ffmpeg_path) {
        CheckResult::Ok => println!("OK"),
        CheckResult::NotFound => {
            all_ok = false;
            println!("NOT FOUND");
            println!("  Install: sudo apt install ffmpeg  (Debian/Ubuntu)");
            println!("           sudo pacman -S ffmpeg    (Arch)");
        }
        CheckResult::Warning(msg) => {
            println!("WARNING");
            println!("  {}", msg);
        }
    }

    print!("Whisper model ({}): ", config.stt.model);
    if models::is_model_installed(&config.stt.model) {
        println!("OK ({})", models::model_path(&config.stt.model).display());
    } else {
        all_ok = false;
        println!("NOT INSTALLED");
        println!("  Install: callscribe models install {}", config.stt.model);
    }

    print!("Translation endpoint: ");
    match check_translation_endpoint(&config.translation.endpoint) {
        CheckResult::Ok => println!("OK"),
        CheckResult::NotFound => {
            // Degrades results but does not block processing.
            println!("UNREACHABLE");
            println!("  Calls will be processed without English translations.");
        }
        CheckResult::Warning(msg) => {
            println!("WARNING");
            println!("  {}", msg);
        }
    }

    println!(
        "\nCompute backend: {}",
        crate::defaults::gpu_backend()
    );

    all_ok
}
