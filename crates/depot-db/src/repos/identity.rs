//! Identity table repository: lookup by email, registration, ban flag.

use chrono::Utc;

use depot_core::entities::IdentityRecord;
use depot_core::enums::IdentityTable;

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, get_flag, get_opt_string};
use crate::service::DepotService;

/// Only `admins` stores a privilege sub-role.
const fn role_column(table: IdentityTable) -> &'static str {
    match table {
        IdentityTable::Admin => "role",
        IdentityTable::Driver | IdentityTable::Coordinator => "NULL",
    }
}

fn row_to_record(table: IdentityTable, row: &libsql::Row) -> Result<IdentityRecord, DatabaseError> {
    Ok(IdentityRecord {
        table,
        id: row.get::<String>(0)?,
        email: row.get::<String>(1)?,
        name: get_opt_string(row, 2)?,
        banned: get_flag(row, 3)?,
        admin_role: get_opt_string(row, 4)?,
    })
}

impl DepotService {
    /// Look up a principal in one identity table by exact email.
    pub async fn find_identity_record(
        &self,
        table: IdentityTable,
        email: &str,
    ) -> Result<Option<IdentityRecord>, DatabaseError> {
        let sql = format!(
            "SELECT id, email, name, banned, {} FROM {} WHERE email = ?1",
            role_column(table),
            table.table_name()
        );
        let mut rows = self.db().query_with(&sql, || [email]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_record(table, &row)?)),
            None => Ok(None),
        }
    }

    /// Insert a principal into an identity table. `admin_role` is ignored for
    /// non-admin tables.
    pub async fn register_identity(
        &self,
        table: IdentityTable,
        email: &str,
        name: Option<&str>,
        admin_role: Option<&str>,
    ) -> Result<IdentityRecord, DatabaseError> {
        let id = self.db().generate_id(table.id_prefix()).await?;
        let now = format_timestamp(Utc::now());

        if table == IdentityTable::Admin {
            self.db()
                .execute_with(
                    "INSERT INTO admins (id, email, name, role, banned, created_at)
                     VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                    || libsql::params![id.as_str(), email, name, admin_role, now.as_str()],
                )
                .await?;
        } else {
            let sql = format!(
                "INSERT INTO {} (id, email, name, banned, created_at) VALUES (?1, ?2, ?3, 0, ?4)",
                table.table_name()
            );
            self.db()
                .execute_with(&sql, || libsql::params![id.as_str(), email, name, now.as_str()])
                .await?;
        }

        tracing::debug!(%table, %email, %id, "registered identity");

        Ok(IdentityRecord {
            table,
            id,
            email: email.to_string(),
            name: name.map(String::from),
            banned: false,
            admin_role: if table == IdentityTable::Admin {
                admin_role.map(String::from)
            } else {
                None
            },
        })
    }

    /// Set or clear the ban flag for `email` in one table. Returns whether a
    /// row was updated.
    pub async fn set_identity_banned(
        &self,
        table: IdentityTable,
        email: &str,
        banned: bool,
    ) -> Result<bool, DatabaseError> {
        let sql = format!("UPDATE {} SET banned = ?1 WHERE email = ?2", table.table_name());
        let n = self
            .db()
            .execute_with(&sql, || libsql::params![i64::from(banned), email])
            .await?;
        if n > 0 {
            tracing::info!(%table, %email, banned, "ban flag updated");
        }
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;
    use depot_core::enums::{AdminRole, IdentityTable};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn find_returns_none_for_unknown_email() {
        let svc = test_service().await;
        for table in IdentityTable::RESOLUTION_ORDER {
            assert_eq!(svc.find_identity_record(table, "nobody@x.com").await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn register_then_find_roundtrips() {
        let svc = test_service().await;
        let created = svc
            .register_identity(IdentityTable::Admin, "a@x.com", Some("Ada"), Some("editor"))
            .await
            .unwrap();
        assert!(created.id.starts_with("adm-"));

        let found = svc
            .find_identity_record(IdentityTable::Admin, "a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, created);
        assert_eq!(
            found.role(),
            depot_core::entities::Role::Admin {
                sub_role: AdminRole::Editor
            }
        );
    }

    #[tokio::test]
    async fn admin_without_role_column_value_reads_none() {
        let svc = test_service().await;
        svc.register_identity(IdentityTable::Admin, "a@x.com", None, None)
            .await
            .unwrap();
        let found = svc
            .find_identity_record(IdentityTable::Admin, "a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.admin_role, None);
    }

    #[tokio::test]
    async fn non_admin_tables_never_carry_a_role() {
        let svc = test_service().await;
        let rec = svc
            .register_identity(IdentityTable::Driver, "d@x.com", None, Some("admin"))
            .await
            .unwrap();
        assert_eq!(rec.admin_role, None);
        let found = svc
            .find_identity_record(IdentityTable::Driver, "d@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.admin_role, None);
    }

    #[tokio::test]
    async fn ban_flag_is_persisted() {
        let svc = test_service().await;
        svc.register_identity(IdentityTable::Coordinator, "c@x.com", None, None)
            .await
            .unwrap();
        assert!(svc
            .set_identity_banned(IdentityTable::Coordinator, "c@x.com", true)
            .await
            .unwrap());
        let found = svc
            .find_identity_record(IdentityTable::Coordinator, "c@x.com")
            .await
            .unwrap()
            .unwrap();
        assert!(found.banned);

        assert!(!svc
            .set_identity_banned(IdentityTable::Driver, "c@x.com", true)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_in_same_table_is_rejected() {
        let svc = test_service().await;
        svc.register_identity(IdentityTable::Driver, "d@x.com", None, None)
            .await
            .unwrap();
        assert!(svc
            .register_identity(IdentityTable::Driver, "d@x.com", None, None)
            .await
            .is_err());
    }
}
