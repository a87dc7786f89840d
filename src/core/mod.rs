//! Core normalization functionality.
//!
//! This module contains the rewriting side of the crate:
//! - The ordered rewriting pipeline
//! - Identifier and canonical URL derivation
//! - Content digests
//! - The one-call normalizer

pub mod deriver;
pub mod hasher;
pub mod normalizer;
pub mod pipeline;

// Re-export main functionality
pub use deriver::{derive, derive_with, url_identifier};
pub use hasher::{hash_hex, md5_hex, DigestAlgorithm};
pub use normalizer::{canonicalize, Normalizer, NormalizerOptions};
pub use pipeline::{normalize, Step};
