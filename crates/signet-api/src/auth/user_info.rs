//! Identity projection for API consumers
//!
//! Maps a verified claim set plus the raw token into the transport-friendly
//! [`UserInfo`] snapshot returned by the current-identity endpoint. Name
//! claims are surfaced first as a presentation convenience; consumers must
//! not treat that ordering as the authoritative subject identifier.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use signet_core::claims::{NAME_CLAIM, ROLE_CLAIM};
use signet_core::{ClaimKind, ClaimSet};
use utoipa::ToSchema;

/// One claim as transported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClaimEntry {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

/// Read-only identity snapshot for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub is_authenticated: bool,
    pub name_claim_type: String,
    pub role_claim_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub claims: Vec<ClaimEntry>,
}

lazy_static! {
    /// The shared unauthenticated identity: no token, no claims
    pub static ref ANONYMOUS: UserInfo = UserInfo {
        is_authenticated: false,
        name_claim_type: NAME_CLAIM.to_string(),
        role_claim_type: ROLE_CLAIM.to_string(),
        token: None,
        claims: Vec::new(),
    };
}

impl UserInfo {
    /// The anonymous snapshot, by value
    pub fn anonymous() -> UserInfo {
        ANONYMOUS.clone()
    }

    /// Project a verified claim set into an identity snapshot
    ///
    /// Unauthenticated principals collapse to [`ANONYMOUS`] no matter what
    /// claims are passed. Otherwise the claim list carries every name claim
    /// first, then all remaining claims; relative order within each
    /// partition is preserved and values are never deduplicated.
    pub fn project(is_authenticated: bool, claims: &ClaimSet, token: &str) -> UserInfo {
        if !is_authenticated {
            return Self::anonymous();
        }

        let mut entries = Vec::with_capacity(claims.len());
        for claim in claims.iter().filter(|c| c.kind == ClaimKind::Name) {
            entries.push(ClaimEntry {
                claim_type: claim.kind.as_str().to_string(),
                value: claim.value.clone(),
            });
        }
        for claim in claims.iter().filter(|c| c.kind != ClaimKind::Name) {
            entries.push(ClaimEntry {
                claim_type: claim.kind.as_str().to_string(),
                value: claim.value.clone(),
            });
        }

        UserInfo {
            is_authenticated: true,
            name_claim_type: NAME_CLAIM.to_string(),
            role_claim_type: ROLE_CLAIM.to_string(),
            token: Some(token.to_string()),
            claims: entries,
        }
    }
}
