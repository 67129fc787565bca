//! Stage Bundler Deb - Debian package builder for staged file trees.
//!
//! Builds `<name>_<version>_<arch>.deb` from `spec/header`, `./helper.db` and
//! the files under `root/`, refusing to overwrite an existing package.

use std::process;

use stage_bundler_deb::cli;

fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
