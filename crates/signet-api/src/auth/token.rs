//! Token encoding and validation
//!
//! Serializes a [`ClaimSet`] into a compact, self-contained JWT signed with
//! HMAC-SHA256, and verifies such tokens back into claim sets.
//!
//! Validation is layered and short-circuits on the first failing layer:
//! structure, signature, issuer, audience, then temporal validity. The
//! library's own issuer/audience/expiry checks are disabled so the ordering
//! and the inclusive expiry boundary are exactly as specified; `decode`
//! takes the current time as a parameter and is a pure function.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use signet_core::{Claim, ClaimKind, ClaimSet};
use thiserror::Error;

/// Payload fields owned by the codec; claims must not collide with them
const RESERVED_CLAIM_TYPES: &[&str] = &["iss", "aud", "iat", "exp"];

/// Token encoding errors
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("claim type {0:?} collides with a reserved payload field")]
    ReservedClaimType(String),
}

/// Why a presented token was rejected
///
/// Variants are ordered by validation layer; decoding stops at the first
/// failure. The specific variant is logged server-side and never echoed to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token issuer mismatch")]
    IssuerMismatch,

    #[error("token audience mismatch")]
    AudienceMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,
}

/// Audience field: a single identifier or a list of them
///
/// Tokens issued here always carry a single audience; accepting the list
/// form keeps validation honest for tokens minted by other issuers of the
/// same format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::One(aud) => aud == expected,
            Audience::Many(auds) => auds.iter().any(|a| a == expected),
        }
    }
}

/// Wire shape of the signed payload
///
/// Registered fields first, then every claim flattened in as
/// `type -> value` (string) or `type -> [values...]` when a type repeats.
/// The map preserves insertion order, which is how claim order survives
/// the round trip.
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    iss: String,
    aud: Audience,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    claims: serde_json::Map<String, Value>,
}

/// Encode a claim set into a signed token string
///
/// Deterministic given identical inputs. The resulting token verifies only
/// with the same `key`.
pub fn encode(
    claims: &ClaimSet,
    issuer: &str,
    audience: &str,
    issued_at: i64,
    expires_at: i64,
    key: &[u8],
) -> Result<String, EncodeError> {
    let mut claim_map = serde_json::Map::new();

    for claim in claims {
        let claim_type = claim.kind.as_str();
        if RESERVED_CLAIM_TYPES.contains(&claim_type) {
            return Err(EncodeError::ReservedClaimType(claim_type.to_string()));
        }
        match claim_map.get_mut(claim_type) {
            None => {
                claim_map.insert(
                    claim_type.to_string(),
                    Value::String(claim.value.clone()),
                );
            }
            Some(Value::Array(values)) => {
                values.push(Value::String(claim.value.clone()));
            }
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(claim.value.clone())]);
            }
        }
    }

    let payload = TokenPayload {
        iss: issuer.to_string(),
        aud: Audience::One(audience.to_string()),
        iat: issued_at,
        exp: expires_at,
        claims: claim_map,
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(key),
    )?;

    Ok(token)
}

/// Verify a token string and reconstruct its claim set
///
/// Layers, in order:
/// 1. structural well-formedness -> [`ValidationFailure::Malformed`]
/// 2. signature integrity -> [`ValidationFailure::BadSignature`]
/// 3. issuer equality -> [`ValidationFailure::IssuerMismatch`]
/// 4. audience membership -> [`ValidationFailure::AudienceMismatch`]
/// 5. `issued_at <= now <= expires_at` -> [`ValidationFailure::Expired`] /
///    [`ValidationFailure::NotYetValid`]
///
/// `now` is seconds since the Unix epoch. A token is still valid at the
/// exact second it expires.
pub fn decode(
    token: &str,
    expected_issuer: &str,
    expected_audience: &str,
    key: &[u8],
    now: i64,
) -> Result<ClaimSet, ValidationFailure> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = Default::default();

    let data = jsonwebtoken::decode::<TokenPayload>(
        token,
        &DecodingKey::from_secret(key),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::InvalidSignature => ValidationFailure::BadSignature,
        _ => ValidationFailure::Malformed,
    })?;

    let payload = data.claims;

    if payload.iss != expected_issuer {
        return Err(ValidationFailure::IssuerMismatch);
    }
    if !payload.aud.contains(expected_audience) {
        return Err(ValidationFailure::AudienceMismatch);
    }
    if now < payload.iat {
        return Err(ValidationFailure::NotYetValid);
    }
    if now > payload.exp {
        return Err(ValidationFailure::Expired);
    }

    let mut set = ClaimSet::new();
    for (claim_type, value) in payload.claims {
        let kind = ClaimKind::parse(&claim_type);
        match value {
            Value::Array(values) => {
                for item in values {
                    set.push(Claim::new(kind.clone(), value_to_string(item)));
                }
            }
            other => set.push(Claim::new(kind, value_to_string(other))),
        }
    }

    Ok(set)
}

/// Claim values are opaque strings; non-string JSON scalars from foreign
/// tokens are carried as their JSON text
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
