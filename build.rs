use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let hash = command_stdout("git", &["rev-parse", "--short", "HEAD"])
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let status = match command_stdout("git", &["status", "--porcelain"]) {
        Some(s) if s.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".to_string());
    let rustc = command_stdout("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=FISH_LEDGER_BUILD_HASH={hash}");
    println!("cargo:rustc-env=FISH_LEDGER_BUILD_STATUS={status}");
    println!("cargo:rustc-env=FISH_LEDGER_BUILD_TIMESTAMP={timestamp}");
    println!("cargo:rustc-env=FISH_LEDGER_BUILD_TARGET={target}");
    println!("cargo:rustc-env=FISH_LEDGER_BUILD_PROFILE={profile}");
    println!("cargo:rustc-env=FISH_LEDGER_BUILD_RUSTC={rustc}");
}

/// Runs a tool and returns its trimmed stdout, or `None` when it is missing or fails.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
