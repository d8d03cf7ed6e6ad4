//! Command: print version information.

/// Build version: `WATCHMAKER_VERSION` when set at build time, else the
/// crate version.
pub const VERSION: &str = match option_env!("WATCHMAKER_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Print the watchmaker version to stdout.
pub fn run() {
    println!("watchmaker {VERSION}");
}
