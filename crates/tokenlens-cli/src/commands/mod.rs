//! CLI command implementations for tokenlens.

pub mod token;
