//! CLI module for botchat.
//!
//! - Argument parsing
//! - Version and usage output
//!
//! # Usage
//!
//! ```ignore
//! use botchat::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Version => println!("{}", version_string()),
//!     CliCommand::Preview(options) => { /* start a preview chat */ }
//!     ...
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, PreviewOptions, USAGE};
pub use version::{version_string, VERSION};
