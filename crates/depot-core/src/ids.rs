//! ID prefixes for every Depot entity.
//!
//! IDs are generated by the database layer as `{prefix}-{8 hex chars}`.
//! The prefix doubles as the source tag for message IDs: an inbox item whose
//! ID starts with [`PREFIX_CONTACT_US`] came from the public contact form.

pub const PREFIX_DRIVER: &str = "drv";
pub const PREFIX_COORDINATOR: &str = "crd";
pub const PREFIX_ADMIN: &str = "adm";
pub const PREFIX_MESSAGE: &str = "msg";
pub const PREFIX_CONTACT_US: &str = "cus";
pub const PREFIX_SUBJECT: &str = "sub";

/// Every prefix, for ID-generation tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_DRIVER,
    PREFIX_COORDINATOR,
    PREFIX_ADMIN,
    PREFIX_MESSAGE,
    PREFIX_CONTACT_US,
    PREFIX_SUBJECT,
];

/// Returns the prefix portion of an ID (`"msg-a1b2c3d4"` -> `Some("msg")`).
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    id.split_once('-').map(|(prefix, _)| prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_of_splits_on_first_dash() {
        assert_eq!(prefix_of("msg-a1b2c3d4"), Some("msg"));
        assert_eq!(prefix_of("cus-00ff00ff"), Some("cus"));
        assert_eq!(prefix_of("nodash"), None);
    }

    #[test]
    fn prefixes_are_unique_and_three_chars() {
        for (i, a) in ALL_PREFIXES.iter().enumerate() {
            assert_eq!(a.len(), 3, "prefix {a} should be 3 chars");
            for b in &ALL_PREFIXES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
