//! Configuration types
//!
//! Compositor configuration is fixed at initialization. Firmware embeds a
//! small TOML file and parses it with [`parse_config`].

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
