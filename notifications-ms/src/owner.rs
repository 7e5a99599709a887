//! Owner matching for bulk reads and deletes.
//!
//! Reads match the full composite identity (`<provider>|<local-id>`) exactly.
//! Deletes match any stored identity that *ends with* the caller's local-id,
//! which is how the service has always behaved. The two rules disagree (a
//! delete for `google|42` also removes rows owned by `auth0|42`), and this
//! looks unintended. It is kept as-is until the product side confirms which rule
//! is correct. Both paths go through this module so that the fix lands here.

pub const IDENTITY_SEPARATOR: char = '|';
pub const LIKE_ESCAPE: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerMatch {
    /// `user_auth0_id = <owner>`
    Exact(String),
    /// `user_auth0_id LIKE '%<local-id>'`
    LocalIdSuffix(String),
    /// Owner id has no usable local-id; matches no rows.
    Nothing,
}

impl OwnerMatch {
    pub fn for_read(owner_id: &str) -> Self {
        Self::Exact(owner_id.to_string())
    }

    pub fn for_delete(owner_id: &str) -> Self {
        match local_id(owner_id) {
            Some(local) if !local.is_empty() => Self::LocalIdSuffix(local.to_string()),
            _ => Self::Nothing,
        }
    }

    pub fn matches(&self, user_auth0_id: &str) -> bool {
        match self {
            Self::Exact(owner) => user_auth0_id == owner,
            Self::LocalIdSuffix(local) => user_auth0_id.ends_with(local.as_str()),
            Self::Nothing => false,
        }
    }

    /// Pattern for a `LIKE ... ESCAPE '\'` clause, when this rule needs one.
    pub fn like_pattern(&self) -> Option<String> {
        match self {
            Self::LocalIdSuffix(local) => Some(format!("%{}", escape_like(local))),
            _ => None,
        }
    }
}

/// The segment after the first separator, if any.
pub fn local_id(owner_id: &str) -> Option<&str> {
    owner_id.split(IDENTITY_SEPARATOR).nth(1)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
