//! Token decoding and expiry checks.
//!
//! No signature verification happens here. Only the payload segment is
//! read; header and signature are ignored.

use crate::claims::{Identity, Payload};
use crate::clock::{Clock, SystemClock};
use crate::config::InspectorConfig;
use crate::error::InspectError;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde_json::Value;
use tracing::{debug, warn};

/// Reads token payloads and answers expiry questions against a [`Clock`].
///
/// [`inspect`](Self::inspect) and [`validate`](Self::validate) report why a
/// token was rejected. The remaining methods collapse every failure to a
/// fail-closed default (`None`, expired, zero lifetime) and never panic.
#[derive(Debug, Clone, Default)]
pub struct TokenInspector<C = SystemClock> {
    clock: C,
    leeway_secs: i64,
}

impl TokenInspector<SystemClock> {
    /// Create an inspector on the wall clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> TokenInspector<C> {
    /// Create an inspector reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            leeway_secs: 0,
        }
    }

    /// Apply settings from configuration.
    pub fn configured(mut self, config: &InspectorConfig) -> Self {
        self.leeway_secs = i64::try_from(config.leeway_secs).unwrap_or(i64::MAX);
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Decode the payload, reporting why decoding failed.
    pub fn inspect(&self, token: &str) -> Result<Payload, InspectError> {
        parse_payload(token)
    }

    /// Decode the payload and require an `exp` that has not passed.
    pub fn validate(&self, token: &str) -> Result<Payload, InspectError> {
        let payload = self.inspect(token)?;
        self.check_expiry(&payload, self.clock.now())?;
        Ok(payload)
    }

    fn check_expiry(&self, payload: &Payload, now: i64) -> Result<(), InspectError> {
        let exp = payload.exp.ok_or(InspectError::MissingExpiry)?;
        if exp.saturating_add(self.leeway_secs) < now {
            return Err(InspectError::Expired {
                expired_at: exp,
                now,
            });
        }
        Ok(())
    }

    /// Decode the payload, or `None` if the token is malformed.
    pub fn decode(&self, token: &str) -> Option<Payload> {
        match self.inspect(token) {
            Ok(payload) => {
                debug!(sub = ?payload.sub, exp = ?payload.exp, "decoded token payload");
                Some(payload)
            }
            Err(err) => {
                warn!(error = %err, "failed to decode token");
                None
            }
        }
    }

    /// Whether the token should be treated as expired.
    ///
    /// True for malformed tokens and tokens without `exp`, as well as for
    /// tokens whose `exp` is strictly before now.
    pub fn is_expired(&self, token: &str) -> bool {
        match self.validate(token) {
            Ok(_) => false,
            Err(InspectError::Expired { expired_at, now }) => {
                warn!(expired_at, now, "token expired");
                true
            }
            Err(InspectError::MissingExpiry) => {
                warn!("token has no exp claim, treating as expired");
                true
            }
            Err(err) => {
                warn!(error = %err, "malformed token treated as expired");
                true
            }
        }
    }

    /// Seconds until `exp`; zero when malformed, missing `exp`, or past.
    pub fn remaining_lifetime(&self, token: &str) -> u64 {
        self.decode(token)
            .map_or(0, |payload| payload.remaining_lifetime(self.clock.now()))
    }

    /// Normalized identity, or `None` if the token is malformed.
    pub fn summarize(&self, token: &str) -> Option<Identity> {
        let payload = self.decode(token)?;
        let expires_in = payload.remaining_lifetime(self.clock.now());
        Some(Identity::from_payload(&payload, expires_in))
    }
}

fn parse_payload(token: &str) -> Result<Payload, InspectError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(InspectError::SegmentCount {
            found: segments.len(),
        });
    };

    let bytes = decode_segment(payload)?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| InspectError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(claims) => Ok(Payload::from(claims)),
        _ => Err(InspectError::NotAnObject),
    }
}

/// Base64url, padded or not. Standard-alphabet segments are accepted too.
fn decode_segment(segment: &str) -> Result<Vec<u8>, InspectError> {
    let unpadded = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|err| STANDARD_NO_PAD.decode(unpadded).map_err(|_| err))
        .map_err(|e| InspectError::InvalidBase64(e.to_string()))
}

/// Decode a token's payload on the wall clock inspector.
pub fn decode_token(token: &str) -> Option<Payload> {
    TokenInspector::new().decode(token)
}

/// Whether a token is expired, malformed, or missing `exp`.
pub fn is_token_expired(token: &str) -> bool {
    TokenInspector::new().is_expired(token)
}

/// Seconds left before the token expires.
pub fn get_token_expiration_time(token: &str) -> u64 {
    TokenInspector::new().remaining_lifetime(token)
}

/// Identity summary of a token.
pub fn get_token_info(token: &str) -> Option<Identity> {
    TokenInspector::new().summarize(token)
}
