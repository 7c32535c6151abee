//! # tokenlens
//!
//! Unverified inspection of JSON Web Tokens for session handling.
//!
//! This crate provides functionality for:
//! - Decoding a token's payload segment into typed claims
//! - Deciding whether a token is expired (fail-closed)
//! - Computing the remaining lifetime of a token
//! - Summarizing a token into a normalized identity
//!
//! ## Fail-closed
//!
//! | Input | `decode` | `is_expired` | `remaining_lifetime` | `summarize` |
//! |-------|----------|--------------|----------------------|-------------|
//! | malformed | `None` | `true` | `0` | `None` |
//! | no `exp` | payload | `true` | `0` | identity, `expires_in = 0` |
//! | `exp` past | payload | `true` | `0` | identity, `expires_in = 0` |
//! | `exp` ahead | payload | `false` | `exp - now` | identity |
//!
//! Signatures are never checked. Anything that needs to trust a token's
//! contents must verify it elsewhere.

pub mod claims;
pub mod clock;
pub mod config;
pub mod error;
pub mod inspector;

pub use claims::{Identity, Payload};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, InspectorConfig, TokenlensConfig};
pub use error::InspectError;
pub use inspector::{
    TokenInspector, decode_token, get_token_expiration_time, get_token_info, is_token_expired,
};
