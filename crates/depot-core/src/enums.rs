//! Roles, identity tables, inbox filters, and message sources.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for the representation stored in SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AdminRole
// ---------------------------------------------------------------------------

/// Privilege sub-role carried by every admin identity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Viewer,
    Editor,
    Admin,
}

impl AdminRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored column value.
    ///
    /// `NULL`, empty and unrecognised values all collapse to [`AdminRole::Viewer`],
    /// the least-privileged sub-role. Returns the parsed role and whether the
    /// stored value was recognised.
    #[must_use]
    pub fn from_column(value: Option<&str>) -> (Self, bool) {
        match value.map(str::trim) {
            Some("viewer") => (Self::Viewer, true),
            Some("editor") => (Self::Editor, true),
            Some("admin") => (Self::Admin, true),
            _ => (Self::default(), false),
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IdentityTable
// ---------------------------------------------------------------------------

/// The three identity tables a principal can be registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IdentityTable {
    Driver,
    Admin,
    Coordinator,
}

impl IdentityTable {
    /// Fixed lookup priority. A principal is expected to appear in at most
    /// one table; when it appears in several, the first match in this order wins.
    pub const RESOLUTION_ORDER: [Self; 3] = [Self::Driver, Self::Admin, Self::Coordinator];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Admin => "admin",
            Self::Coordinator => "coordinator",
        }
    }

    /// SQL table backing this identity kind.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Driver => "drivers",
            Self::Admin => "admins",
            Self::Coordinator => "coordinators",
        }
    }

    /// ID prefix for records in this table.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Driver => crate::ids::PREFIX_DRIVER,
            Self::Admin => crate::ids::PREFIX_ADMIN,
            Self::Coordinator => crate::ids::PREFIX_COORDINATOR,
        }
    }
}

impl fmt::Display for IdentityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InboxFilter
// ---------------------------------------------------------------------------

/// Inbox tab selected by the principal.
///
/// Only `Inbox`, `Sent`, `Starred` and `Important` narrow the result set.
/// The remaining tabs are placeholders that apply the role's base predicate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InboxFilter {
    #[default]
    Inbox,
    Sent,
    Starred,
    Snoozed,
    Important,
    Drafts,
    Spam,
    Junk,
    Trash,
}

impl InboxFilter {
    pub const ALL: [Self; 9] = [
        Self::Inbox,
        Self::Sent,
        Self::Starred,
        Self::Snoozed,
        Self::Important,
        Self::Drafts,
        Self::Spam,
        Self::Junk,
        Self::Trash,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Sent => "sent",
            Self::Starred => "starred",
            Self::Snoozed => "snoozed",
            Self::Important => "important",
            Self::Drafts => "drafts",
            Self::Spam => "spam",
            Self::Junk => "junk",
            Self::Trash => "trash",
        }
    }

    /// Whether this tab carries its own visibility semantics.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::Inbox | Self::Sent | Self::Starred | Self::Important
        )
    }
}

impl fmt::Display for InboxFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MessageSource
// ---------------------------------------------------------------------------

/// Which store an inbox item was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    /// The application's own `contact` thread store.
    Internal,
    /// The public `contact_us` form-submission log.
    External,
}

impl MessageSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }

    /// Classify a message ID by its prefix. Unknown prefixes return `None`.
    #[must_use]
    pub fn of_id(id: &str) -> Option<Self> {
        match crate::ids::prefix_of(id)? {
            crate::ids::PREFIX_MESSAGE => Some(Self::Internal),
            crate::ids::PREFIX_CONTACT_US => Some(Self::External),
            _ => None,
        }
    }
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MergeOrder
// ---------------------------------------------------------------------------

/// How internal and external items are combined in one inbox listing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MergeOrder {
    /// Internal block first, then external block; each newest first.
    #[default]
    Grouped,
    /// Both sources interleaved, newest first.
    Chronological,
}

impl MergeOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grouped => "grouped",
            Self::Chronological => "chronological",
        }
    }
}

impl fmt::Display for MergeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, AdminRole::Viewer, false)]
    #[case(Some(""), AdminRole::Viewer, false)]
    #[case(Some("superuser"), AdminRole::Viewer, false)]
    #[case(Some("viewer"), AdminRole::Viewer, true)]
    #[case(Some("editor"), AdminRole::Editor, true)]
    #[case(Some("admin"), AdminRole::Admin, true)]
    fn admin_role_from_column(
        #[case] input: Option<&str>,
        #[case] expected: AdminRole,
        #[case] recognised: bool,
    ) {
        assert_eq!(AdminRole::from_column(input), (expected, recognised));
    }

    #[test]
    fn resolution_order_is_driver_admin_coordinator() {
        assert_eq!(
            IdentityTable::RESOLUTION_ORDER,
            [
                IdentityTable::Driver,
                IdentityTable::Admin,
                IdentityTable::Coordinator
            ]
        );
    }

    #[test]
    fn inbox_filter_serde_matches_as_str() {
        for filter in InboxFilter::ALL {
            let json = serde_json::to_value(filter).unwrap();
            assert_eq!(json, serde_json::Value::String(filter.as_str().into()));
        }
    }

    #[test]
    fn only_four_filters_are_active() {
        let active: Vec<_> = InboxFilter::ALL
            .into_iter()
            .filter(|f| f.is_active())
            .collect();
        assert_eq!(
            active,
            vec![
                InboxFilter::Inbox,
                InboxFilter::Sent,
                InboxFilter::Starred,
                InboxFilter::Important
            ]
        );
    }

    #[test]
    fn message_source_of_id() {
        assert_eq!(MessageSource::of_id("msg-0a0b0c0d"), Some(MessageSource::Internal));
        assert_eq!(MessageSource::of_id("cus-0a0b0c0d"), Some(MessageSource::External));
        assert_eq!(MessageSource::of_id("drv-0a0b0c0d"), None);
        assert_eq!(MessageSource::of_id("garbage"), None);
    }
}
