use std::{env, process::Command};

const PREFIX: &str = "K1_TUTOR_BUILD";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = command_stdout("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let status = match command_stdout("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rustc = command_stdout("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());

    export("HASH", &hash);
    export("STATUS", status);
    export("TIMESTAMP", &built_at);
    export("TARGET", &cargo_var("TARGET"));
    export("PROFILE", &cargo_var("PROFILE"));
    export("RUSTC", &rustc);
}

fn export(name: &str, value: &str) {
    println!("cargo:rustc-env={PREFIX}_{name}={value}");
}

fn cargo_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| format!("unknown-{}", name.to_ascii_lowercase()))
}

/// Trimmed stdout of a successful command, `None` if it could not run or failed.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
