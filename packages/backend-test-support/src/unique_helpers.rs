//! Unique names for tests that share one server process.

use ulid::Ulid;

/// `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("player");
/// assert_ne!(a, unique_str("player"));
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A display name that fits the server's 24 character limit.
///
/// ```
/// use backend_test_support::unique_helpers::unique_name;
///
/// let name = unique_name("bob");
/// assert!(name.chars().count() <= 24);
/// assert!(name.starts_with("bob-"));
/// ```
pub fn unique_name(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    let prefix: String = prefix.chars().take(11).collect();
    // the ulid's tail is its random part
    format!("{prefix}-{}", &ulid[ulid.len() - 12..])
}
