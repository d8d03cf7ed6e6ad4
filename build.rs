//! Build script: embeds version information at compile time.

use std::process::Command;

fn main() {
    // Prefer WATCHMAKER_VERSION env var if set (e.g., by a release pipeline),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("WATCHMAKER_VERSION") {
        println!("cargo:rustc-env=WATCHMAKER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=WATCHMAKER_VERSION={version}");
    }

    // The bundled default configuration is compiled into the binary.
    println!("cargo:rerun-if-changed=static/config.yaml");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=WATCHMAKER_VERSION");
}
