use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AdminRole, IdentityTable};

/// The single role a principal holds.
///
/// "Admin without a sub-role" cannot be represented: every admin carries an
/// [`AdminRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    Driver,
    Coordinator,
    Admin { sub_role: AdminRole },
}

impl Role {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    /// The identity table this role is resolved from.
    #[must_use]
    pub const fn table(self) -> IdentityTable {
        match self {
            Self::Driver => IdentityTable::Driver,
            Self::Coordinator => IdentityTable::Coordinator,
            Self::Admin { .. } => IdentityTable::Admin,
        }
    }

    /// Short label, `admin:<sub_role>` for admins.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Driver => "driver".into(),
            Self::Coordinator => "coordinator".into(),
            Self::Admin { sub_role } => format!("admin:{sub_role}"),
        }
    }
}

/// Resolved identity of an authenticated principal.
///
/// Only produced by role resolution from a non-banned identity record, so a
/// live `Identity` is never banned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Identity {
    pub role: Role,
    /// Row ID in the identity table the role was resolved from.
    pub id: String,
    pub email: String,
}

impl Identity {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A raw row from one of the identity tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IdentityRecord {
    pub table: IdentityTable,
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub banned: bool,
    /// Stored privilege sub-role; only meaningful for the admin table.
    pub admin_role: Option<String>,
}

impl IdentityRecord {
    /// Build the role this record grants. Missing or unknown admin sub-roles
    /// resolve to [`AdminRole::Viewer`].
    #[must_use]
    pub fn role(&self) -> Role {
        match self.table {
            IdentityTable::Driver => Role::Driver,
            IdentityTable::Coordinator => Role::Coordinator,
            IdentityTable::Admin => Role::Admin {
                sub_role: AdminRole::from_column(self.admin_role.as_deref()).0,
            },
        }
    }

    /// Convert to an [`Identity`], ignoring the ban flag. Callers gate on `banned` first.
    #[must_use]
    pub fn to_identity(&self) -> Identity {
        Identity {
            role: self.role(),
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(table: IdentityTable, admin_role: Option<&str>) -> IdentityRecord {
        IdentityRecord {
            table,
            id: "adm-00000001".into(),
            email: "a@x.com".into(),
            name: None,
            banned: false,
            admin_role: admin_role.map(String::from),
        }
    }

    #[test]
    fn admin_without_sub_role_is_viewer() {
        let role = record(IdentityTable::Admin, None).role();
        assert_eq!(role, Role::Admin { sub_role: AdminRole::Viewer });
    }

    #[test]
    fn admin_role_ignored_for_non_admin_tables() {
        assert_eq!(record(IdentityTable::Driver, Some("admin")).role(), Role::Driver);
        assert_eq!(
            record(IdentityTable::Coordinator, Some("admin")).role(),
            Role::Coordinator
        );
    }

    #[test]
    fn role_serializes_as_tagged_variant() {
        let json = serde_json::to_value(Role::Admin { sub_role: AdminRole::Editor }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "admin", "sub_role": "editor"}));
        let json = serde_json::to_value(Role::Driver).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "driver"}));
    }

    #[test]
    fn label_includes_sub_role() {
        assert_eq!(Role::Admin { sub_role: AdminRole::Admin }.label(), "admin:admin");
        assert_eq!(Role::Coordinator.label(), "coordinator");
    }
}
