//! Token payload claims and the identity summary derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Decoded payload of a token.
///
/// The claims this crate understands are lifted into typed fields. Everything
/// else, including a known claim whose value has an unexpected JSON type,
/// stays in `extra` exactly as decoded, so [`Payload::to_json`] gives back the
/// original object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
    /// Subject identifier (usually the username).
    pub sub: Option<String>,

    /// Expiration time, Unix epoch seconds.
    pub exp: Option<i64>,

    /// Issue time, Unix epoch seconds.
    pub iat: Option<i64>,

    /// Granted roles or permissions, in token order.
    pub authorities: Option<Vec<String>>,

    /// Claims not covered by the fields above.
    pub extra: Map<String, Value>,
}

impl Payload {
    /// Check whether the payload grants the given authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|a| a == authority))
    }

    /// When the token was issued.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// When the token expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Seconds left before `exp`, measured from `now`. Zero when `exp` is
    /// missing or already past.
    pub fn remaining_lifetime(&self, now: i64) -> u64 {
        self.exp
            .map_or(0, |exp| u64::try_from(exp.saturating_sub(now)).unwrap_or(0))
    }

    /// Rebuild the JSON object this payload was decoded from.
    pub fn to_json(&self) -> Value {
        let mut claims = self.extra.clone();
        if let Some(sub) = &self.sub {
            claims.insert("sub".to_string(), Value::from(sub.as_str()));
        }
        if let Some(exp) = self.exp {
            claims.insert("exp".to_string(), Value::from(exp));
        }
        if let Some(iat) = self.iat {
            claims.insert("iat".to_string(), Value::from(iat));
        }
        if let Some(authorities) = &self.authorities {
            claims.insert("authorities".to_string(), Value::from(authorities.clone()));
        }
        Value::Object(claims)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(mut claims: Map<String, Value>) -> Self {
        let sub = take_claim(&mut claims, "sub", |v| v.as_str().map(str::to_owned));
        let exp = take_claim(&mut claims, "exp", Value::as_i64);
        let iat = take_claim(&mut claims, "iat", Value::as_i64);
        let authorities = take_claim(&mut claims, "authorities", string_list);

        Self {
            sub,
            exp,
            iat,
            authorities,
            extra: claims,
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}

/// Remove `key` from `claims` only if `read` accepts its value.
fn take_claim<T>(
    claims: &mut Map<String, Value>,
    key: &str,
    read: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = claims.get(key).and_then(read)?;
    claims.remove(key);
    Some(value)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_owned))
        .collect()
}

/// Normalized identity extracted from a token.
///
/// `username` and `authorities` are always present; absent claims become an
/// empty string and an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,
    pub authorities: Vec<String>,
    /// Remaining lifetime in seconds.
    pub expires_in: u64,
}

impl Identity {
    pub fn from_payload(payload: &Payload, expires_in: u64) -> Self {
        Self {
            username: payload.sub.clone().unwrap_or_default(),
            authorities: payload.authorities.clone().unwrap_or_default(),
            expires_in,
        }
    }
}
