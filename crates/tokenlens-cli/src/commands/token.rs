//! Token inspection commands.
//!
//! `tokenlens decode` - Print a token's payload.
//! `tokenlens check` - Report whether a token is still valid.
//! `tokenlens summary` - Print the identity a token carries.
//!
//! Each command writes its report to `out` and returns whether the token
//! passed, so `main` can turn that into the process exit code.

use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use tokenlens::{Clock, InspectError, TokenInspector, TokenlensConfig};

/// Resolve the token from an argument or the configured env var.
///
/// The argument can be:
/// - A path to a file containing the token
/// - The token itself, optionally prefixed with `Bearer `
pub fn resolve_token(arg: Option<String>, config: &TokenlensConfig) -> anyhow::Result<String> {
    let raw = match arg {
        Some(arg) => {
            let path = Path::new(&arg);
            if path.is_file() {
                fs::read_to_string(path)
                    .with_context(|| format!("Failed to read token from file: {}", path.display()))?
            } else {
                arg
            }
        }
        None => config.resolve_token().with_context(|| {
            format!(
                "Token not provided. Either pass TOKEN or set {} env var",
                config.token_env
            )
        })?,
    };

    let trimmed = raw.trim();
    let token = trimmed.strip_prefix("Bearer ").unwrap_or(trimmed).trim();
    Ok(token.to_string())
}

/// Print the decoded payload as pretty JSON.
pub fn decode<C: Clock, W: Write>(
    inspector: &TokenInspector<C>,
    token: &str,
    out: &mut W,
) -> anyhow::Result<bool> {
    match inspector.inspect(token) {
        Ok(payload) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&payload.to_json())?)?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "✖ {}", e)?;
            Ok(false)
        }
    }
}

/// Report validity, expiry time and remaining lifetime.
pub fn check<C: Clock, W: Write>(
    inspector: &TokenInspector<C>,
    token: &str,
    out: &mut W,
) -> anyhow::Result<bool> {
    let now = inspector.clock().now();
    match inspector.validate(token) {
        Ok(payload) => {
            writeln!(out, "✔ Token is valid")?;
            writeln!(out)?;
            writeln!(out, "Token Details:")?;
            writeln!(out, "  Subject: {}", payload.sub.as_deref().unwrap_or("(none)"))?;
            if let Some(issued) = payload.issued_at() {
                writeln!(out, "  Issued: {}", issued.to_rfc3339())?;
            }
            if let Some(expires) = payload.expires_at() {
                writeln!(out, "  Expires: {}", expires.to_rfc3339())?;
            }
            writeln!(out, "  Remaining: {}s", payload.remaining_lifetime(now))?;
            Ok(true)
        }
        Err(InspectError::Expired { expired_at, .. }) => {
            let when = chrono::DateTime::from_timestamp(expired_at, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| expired_at.to_string());
            writeln!(out, "✖ Token expired at {}", when)?;
            Ok(false)
        }
        Err(e) => {
            writeln!(out, "✖ Token is not valid: {}", e)?;
            Ok(false)
        }
    }
}

/// Print the identity summary as JSON.
pub fn summary<C: Clock, W: Write>(
    inspector: &TokenInspector<C>,
    token: &str,
    out: &mut W,
) -> anyhow::Result<bool> {
    match inspector.summarize(token) {
        Some(identity) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&identity)?)?;
            Ok(true)
        }
        None => {
            writeln!(out, "✖ Token could not be decoded")?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::{Value, json};
    use tempfile::tempdir;
    use tokenlens::FixedClock;

    const NOW: i64 = 1_760_000_000;

    fn token_with(claims: Value) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }

    fn inspector() -> TokenInspector<FixedClock> {
        TokenInspector::with_clock(FixedClock(NOW))
    }

    fn run(
        command: fn(&TokenInspector<FixedClock>, &str, &mut Vec<u8>) -> anyhow::Result<bool>,
        token: &str,
    ) -> (bool, String) {
        let mut out = Vec::new();
        let passed = command(&inspector(), token, &mut out).unwrap();
        (passed, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_resolve_token_from_arg() {
        let config = TokenlensConfig::default();
        let token = resolve_token(Some("Bearer  a.b.c \n".to_string()), &config).unwrap();
        assert_eq!(token, "a.b.c");
    }

    #[test]
    fn test_resolve_token_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.jwt");
        fs::write(&path, "x.y.z\n").unwrap();

        let config = TokenlensConfig::default();
        let token = resolve_token(Some(path.to_string_lossy().to_string()), &config).unwrap();
        assert_eq!(token, "x.y.z");
    }

    #[test]
    fn test_resolve_token_from_env() {
        let config = TokenlensConfig {
            token_env: "TOKENLENS_CLI_TEST_TOKEN".to_string(),
            ..TokenlensConfig::default()
        };
        assert!(resolve_token(None, &config).is_err());

        // SAFETY: We're in a test and this variable is unique to it
        unsafe {
            std::env::set_var("TOKENLENS_CLI_TEST_TOKEN", "Bearer e.n.v");
        }
        assert_eq!(resolve_token(None, &config).unwrap(), "e.n.v");
        unsafe {
            std::env::remove_var("TOKENLENS_CLI_TEST_TOKEN");
        }
    }

    #[test]
    fn test_decode_command() {
        let (passed, out) = run(decode, &token_with(json!({ "sub": "alice", "room": "B12" })));
        assert!(passed);
        let printed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(printed, json!({ "sub": "alice", "room": "B12" }));

        let (passed, out) = run(decode, "a.b");
        assert!(!passed);
        assert!(out.contains("expected 3 segments"));
    }

    #[test]
    fn test_check_command() {
        let (passed, out) = run(check, &token_with(json!({ "sub": "alice", "exp": NOW + 90 })));
        assert!(passed);
        assert!(out.contains("✔ Token is valid"));
        assert!(out.contains("Subject: alice"));
        assert!(out.contains("Remaining: 90s"));

        let (passed, out) = run(check, &token_with(json!({ "exp": 0 })));
        assert!(!passed);
        assert!(out.contains("expired at 1970-01-01T00:00:00+00:00"));

        let (passed, out) = run(check, &token_with(json!({ "sub": "alice" })));
        assert!(!passed);
        assert!(out.contains("no exp claim"));

        let (passed, _) = run(check, "not-a-token");
        assert!(!passed);
    }

    #[test]
    fn test_summary_command() {
        let token = token_with(json!({
            "sub": "alice",
            "exp": NOW + 100,
            "authorities": ["ROLE_ADMIN"]
        }));
        let (passed, out) = run(summary, &token);
        assert!(passed);
        let printed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            printed,
            json!({ "username": "alice", "authorities": ["ROLE_ADMIN"], "expiresIn": 100 })
        );

        let (passed, out) = run(summary, "");
        assert!(!passed);
        assert!(out.contains("could not be decoded"));
    }
}
