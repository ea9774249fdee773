//! Unique account data so tests sharing a directory never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A username that passes registration rules (3-20 chars of
/// `[A-Za-z0-9_]`): up to 7 chars of `prefix`, `_`, then 12 random chars.
pub fn unique_username(prefix: &str) -> String {
    let prefix: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(7)
        .collect();
    let ulid = Ulid::new().to_string().to_lowercase();
    // The tail of a ULID is its random component
    format!("{}_{}", prefix, &ulid[ulid.len() - 12..])
}

/// `{prefix}-{ulid}@example.test`
pub fn unique_email(prefix: &str) -> String {
    format!("{}@example.test", unique_str(prefix)).to_lowercase()
}
