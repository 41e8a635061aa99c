use regex::Regex;
use std::sync::LazyLock;

/// Shape accepted from the form: optional `@`, then 1-24 of `[A-Za-z0-9_.]`.
pub static RAW_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^@?[A-Za-z0-9_.]{1,24}$").unwrap()
});

static CANONICAL_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^@[A-Za-z0-9_.]{1,24}$").unwrap()
});

/// Prepends `@` when it is missing. Idempotent.
#[must_use]
pub fn normalize(handle: &str) -> String {
    if handle.starts_with('@') { handle.to_owned() } else { format!("@{handle}") }
}

/// Checks a handle against the canonical, `@`-anchored pattern.
#[must_use]
pub fn is_valid(handle: &str) -> bool {
    CANONICAL_HANDLE.is_match(handle)
}

/// Normalizes the handle and returns it when it passes the canonical check.
///
/// This is only a syntactic check. No request is made to the social
/// platform, so an account that does not exist still passes.
#[must_use]
pub fn verify(handle: &str) -> Option<String> {
    let normalized = normalize(handle);
    is_valid(&normalized).then_some(normalized)
}
