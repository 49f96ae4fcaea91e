//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s)
}

/// Parse a group identifier taken from a request path
///
/// Anything that is not a UUID cannot name an existing group, so it is
/// reported as not found rather than as malformed input.
pub fn parse_group_id(s: &str) -> crate::Result<Uuid> {
    parse(s).map_err(|_| crate::Error::group_not_found(s))
}
