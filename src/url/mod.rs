//! Input handling for raw URL strings.
//!
//! This module contains everything that runs before the rewriting pipeline:
//! - Strict percent-decoding
//! - URL structure parsing
//! - Input preparation

pub mod decoder;
pub mod parser;
pub mod prepare;

// Re-export main functionality
pub use decoder::decode_query_component;
pub use parser::parse as parse_url;
pub use prepare::prepare;
