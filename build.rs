fn main() {
    // Release builds set TERMADS_VERSION; otherwise derive it from git.
    if let Ok(version) = std::env::var("TERMADS_VERSION") {
        println!("cargo:rustc-env=TERMADS_VERSION={version}");
    } else {
        let hash = std::process::Command::new("git")
            .args(["rev-parse", "--short=7", "HEAD"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .unwrap_or_default()
            .trim()
            .to_string();

        if hash.is_empty() {
            println!("cargo:rustc-env=TERMADS_VERSION=dev");
        } else {
            println!("cargo:rustc-env=TERMADS_VERSION={}-{hash}", env!("CARGO_PKG_VERSION"));
        }
    }
    println!("cargo:rerun-if-env-changed=TERMADS_VERSION");
}
