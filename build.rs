use std::process::Command;

fn git_hash() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let hash = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

fn main() {
    let profile = match std::env::var("PROFILE").as_deref() {
        Ok("release") => "release",
        _ => "development",
    };
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".into());

    println!("cargo:rustc-env=ROTORKIT_PROFILE={}", profile);
    println!("cargo:rustc-env=ROTORKIT_TARGET={}", target);
    println!(
        "cargo:rustc-env=ROTORKIT_GIT_HASH={}",
        git_hash().unwrap_or_else(|| "unknown".into())
    );
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=PROFILE");
}
