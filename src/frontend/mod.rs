//! Front-ends built on [`ChatWidget`](crate::chat::ChatWidget).
//!
//! - `preview` - chatbot configured from command-line overrides
//! - `embed` - stored chatbot looked up by id
//! - `repl` - stdin chat loop
//! - `render` - incremental terminal transcript

pub mod embed;
pub mod preview;
pub mod render;
pub mod repl;

pub use embed::{config_source, EmbedFrontend};
pub use preview::{preview_config, preview_widget};
pub use render::{parse_hex_color, spawn_renderer, Palette, TranscriptRenderer};
pub use repl::run_repl;
