//! Error types for token inspection.

use thiserror::Error;

/// Reasons a token cannot be read, or cannot be treated as currently valid.
///
/// The first four variants are the `MalformedToken` family: the token string
/// itself could not be turned into a payload. The last two only arise once a
/// payload has been decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    /// Token does not split into exactly three dot-separated segments.
    #[error("malformed token: expected 3 segments, found {found}")]
    SegmentCount { found: usize },

    /// Payload segment is not valid base64url.
    #[error("malformed token: payload segment is not base64url: {0}")]
    InvalidBase64(String),

    /// Payload bytes are not valid JSON.
    #[error("malformed token: payload is not valid JSON: {0}")]
    InvalidJson(String),

    /// Payload is valid JSON but not an object.
    #[error("malformed token: payload is not a JSON object")]
    NotAnObject,

    /// Payload carries no usable `exp` claim.
    #[error("token has no exp claim")]
    MissingExpiry,

    /// `exp` lies in the past.
    #[error("token expired at {expired_at} (now {now})")]
    Expired { expired_at: i64, now: i64 },
}

impl InspectError {
    /// Whether the token string itself could not be decoded.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::SegmentCount { .. }
                | Self::InvalidBase64(_)
                | Self::InvalidJson(_)
                | Self::NotAnObject
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_family() {
        assert!(InspectError::SegmentCount { found: 1 }.is_malformed());
        assert!(InspectError::NotAnObject.is_malformed());
        assert!(!InspectError::MissingExpiry.is_malformed());
        assert!(
            !InspectError::Expired {
                expired_at: 1,
                now: 2
            }
            .is_malformed()
        );
    }

    #[test]
    fn test_display() {
        let err = InspectError::SegmentCount { found: 2 };
        assert_eq!(err.to_string(), "malformed token: expected 3 segments, found 2");
    }
}
