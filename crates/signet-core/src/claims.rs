//! Claims and claim sets
//!
//! A claim is a typed assertion about a principal ("the user's name is
//! alice", "the user holds the Administrator role"). A [`ClaimSet`] is the
//! ordered collection of claims assembled at token issuance and
//! reconstructed at validation.
//!
//! Claim kinds are an enum internally and only become the conventional JWT
//! string identifiers (`sub`, `name`, `given_name`, `role`) at the
//! encode/decode boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of assertion a claim carries
///
/// `Other` preserves claim types this crate does not interpret, so foreign
/// claims survive a decode/re-encode round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    /// Stable subject identifier (the user's unique id)
    Subject,
    /// Login name of the principal
    Name,
    /// Human-readable display name
    DisplayName,
    /// A role membership; one claim per role
    Role,
    /// Any claim type outside the canonical set
    Other(String),
}

/// Wire identifier for the subject claim
pub const SUBJECT_CLAIM: &str = "sub";
/// Wire identifier for the name claim
pub const NAME_CLAIM: &str = "name";
/// Wire identifier for the display-name claim
pub const DISPLAY_NAME_CLAIM: &str = "given_name";
/// Wire identifier for role claims
pub const ROLE_CLAIM: &str = "role";

impl ClaimKind {
    /// Conventional string identifier used on the wire
    pub fn as_str(&self) -> &str {
        match self {
            ClaimKind::Subject => SUBJECT_CLAIM,
            ClaimKind::Name => NAME_CLAIM,
            ClaimKind::DisplayName => DISPLAY_NAME_CLAIM,
            ClaimKind::Role => ROLE_CLAIM,
            ClaimKind::Other(s) => s,
        }
    }

    /// Parse a wire identifier back into a kind
    ///
    /// Never fails: unknown identifiers become [`ClaimKind::Other`].
    pub fn parse(s: &str) -> Self {
        match s {
            SUBJECT_CLAIM => ClaimKind::Subject,
            NAME_CLAIM => ClaimKind::Name,
            DISPLAY_NAME_CLAIM => ClaimKind::DisplayName,
            ROLE_CLAIM => ClaimKind::Role,
            other => ClaimKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable (kind, value) assertion about a principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub kind: ClaimKind,
    pub value: String,
}

impl Claim {
    pub fn new(kind: ClaimKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Ordered collection of claims for one principal
///
/// Append-only while being assembled, then passed around by shared
/// reference. Order is significant: it is preserved through token encoding
/// and surfaced to API consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the canonical claim set for an authenticated identity
    ///
    /// Order: subject id, login name, display name, then one role claim per
    /// distinct role in the order the store returned them. Duplicate role
    /// names are dropped, keeping the first occurrence.
    pub fn for_identity(
        subject: Uuid,
        username: &str,
        display_name: &str,
        roles: &[String],
    ) -> Self {
        let mut set = Self::new();
        set.push(Claim::new(ClaimKind::Subject, subject.to_string()));
        set.push(Claim::new(ClaimKind::Name, username));
        set.push(Claim::new(ClaimKind::DisplayName, display_name));

        let mut seen = Vec::with_capacity(roles.len());
        for role in roles {
            if seen.contains(role) {
                continue;
            }
            seen.push(role.clone());
            set.push(Claim::new(ClaimKind::Role, role.clone()));
        }
        set
    }

    /// Append a claim during assembly
    pub fn push(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Value of the first claim of the given kind, if any
    pub fn first_of(&self, kind: &ClaimKind) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| &c.kind == kind)
            .map(|c| c.value.as_str())
    }

    /// Values of every claim of the given kind, in order
    pub fn values_of<'a>(&'a self, kind: &ClaimKind) -> impl Iterator<Item = &'a str> + 'a {
        let kind = kind.clone();
        self.claims
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| c.value.as_str())
    }

    /// Login name carried by the set, if present
    pub fn name(&self) -> Option<&str> {
        self.first_of(&ClaimKind::Name)
    }

    /// Subject identifier carried by the set, if present
    pub fn subject(&self) -> Option<&str> {
        self.first_of(&ClaimKind::Subject)
    }

    /// Role values in claim order
    pub fn roles(&self) -> Vec<&str> {
        self.values_of(&ClaimKind::Role).collect()
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<T: IntoIterator<Item = Claim>>(iter: T) -> Self {
        Self {
            claims: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_round_trip() {
        for kind in [
            ClaimKind::Subject,
            ClaimKind::Name,
            ClaimKind::DisplayName,
            ClaimKind::Role,
            ClaimKind::Other("department".to_string()),
        ] {
            assert_eq!(ClaimKind::parse(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_unknown_kind_parses_as_other() {
        assert_eq!(
            ClaimKind::parse("email"),
            ClaimKind::Other("email".to_string())
        );
    }

    #[test]
    fn test_for_identity_canonical_order() {
        let id = Uuid::new_v4();
        let set = ClaimSet::for_identity(
            id,
            "alice",
            "Alice Liddell",
            &["admin".to_string(), "auditor".to_string()],
        );

        let kinds: Vec<&ClaimKind> = set.iter().map(|c| &c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &ClaimKind::Subject,
                &ClaimKind::Name,
                &ClaimKind::DisplayName,
                &ClaimKind::Role,
                &ClaimKind::Role,
            ]
        );
        assert_eq!(set.subject(), Some(id.to_string().as_str()));
        assert_eq!(set.name(), Some("alice"));
        assert_eq!(set.roles(), vec!["admin", "auditor"]);
    }

    #[test]
    fn test_for_identity_deduplicates_roles() {
        let roles = vec![
            "admin".to_string(),
            "viewer".to_string(),
            "admin".to_string(),
        ];
        let set = ClaimSet::for_identity(Uuid::new_v4(), "bob", "Bob B", &roles);

        assert_eq!(set.roles(), vec!["admin", "viewer"]);
    }

    #[test]
    fn test_empty_role_set_is_valid() {
        let set = ClaimSet::for_identity(Uuid::new_v4(), "carol", "Carol C", &[]);

        assert!(set.roles().is_empty());
        assert_eq!(set.len(), 3);
        assert!(set.subject().is_some());
        assert!(set.name().is_some());
    }

    #[test]
    fn test_values_of_preserves_order() {
        let mut set = ClaimSet::new();
        set.push(Claim::new(ClaimKind::Role, "first"));
        set.push(Claim::new(ClaimKind::Name, "dave"));
        set.push(Claim::new(ClaimKind::Role, "second"));

        let roles: Vec<&str> = set.values_of(&ClaimKind::Role).collect();
        assert_eq!(roles, vec!["first", "second"]);
    }
}
