use std::process::Command;

/// Run a git subcommand, returning trimmed stdout on success.
fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=VN_API_GIT_HASH={hash}");
    println!("cargo:rustc-env=VN_API_ON_RELEASE_TAG={on_tag}");
}
