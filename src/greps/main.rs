//! # Greps CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! The command line stands in for a find/change dialog. A document is a
//! directory; every story file in it (by extension, see `greps config`) is one
//! independent text body, and `--story` names the story holding the current
//! selection. Everything from the API inward is documented in the library.
//!
//! ## Testing Approach
//!
//! - **Engine and commands**: unit tests next to the code, against in-memory stores.
//! - **CLI**: `tests/cli_integration.rs` runs the binary against temporary
//!   document and data directories.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
