//! Public contact-form submissions (`contact_us` table). Append-only.

use chrono::Utc;

use depot_core::entities::{ContactSubmission, ExternalMessage};
use depot_core::ids::PREFIX_CONTACT_US;

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, get_opt_string, parse_datetime};
use crate::service::DepotService;

const SELECT_CONTACT_US: &str =
    "SELECT id, name, email, phone, company, subject, message, created_at FROM contact_us";

fn row_to_external(row: &libsql::Row) -> Result<ExternalMessage, DatabaseError> {
    Ok(ExternalMessage {
        id: row.get::<String>(0)?,
        name: get_opt_string(row, 1)?,
        email: get_opt_string(row, 2)?,
        phone: get_opt_string(row, 3)?,
        company: get_opt_string(row, 4)?,
        subject: get_opt_string(row, 5)?,
        body: row.get::<String>(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl DepotService {
    /// Every submission, newest first. There is no owner to filter on.
    pub async fn list_contact_us(&self, limit: u32) -> Result<Vec<ExternalMessage>, DatabaseError> {
        let sql = format!("{SELECT_CONTACT_US} ORDER BY created_at DESC, id DESC LIMIT ?1");
        let mut rows = self
            .db()
            .query_with(&sql, || [i64::from(limit)])
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_external(&row)?);
        }
        Ok(out)
    }

    pub async fn get_contact_us(&self, id: &str) -> Result<ExternalMessage, DatabaseError> {
        let sql = format!("{SELECT_CONTACT_US} WHERE id = ?1");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_external(&row)
    }

    /// Store a validated contact-form submission.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if name, email, or message is
    /// missing.
    pub async fn submit_contact_us(
        &self,
        submission: &ContactSubmission,
    ) -> Result<ExternalMessage, DatabaseError> {
        submission
            .validate()
            .map_err(|e| DatabaseError::InvalidState(e.to_string()))?;

        let id = self.db().generate_id(PREFIX_CONTACT_US).await?;
        let now = format_timestamp(Utc::now());
        let blank_to_none = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        let phone = blank_to_none(&submission.phone);
        let company = blank_to_none(&submission.company);
        let subject = blank_to_none(&submission.subject);

        self.db()
            .execute_with(
                "INSERT INTO contact_us (id, name, email, phone, company, subject, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                || {
                    libsql::params![
                        id.as_str(),
                        submission.name.as_str(),
                        submission.email.as_str(),
                        phone.as_deref(),
                        company.as_deref(),
                        subject.as_deref(),
                        submission.message.as_str(),
                        now.as_str()
                    ]
                },
            )
            .await?;

        tracing::info!(%id, "contact form submission stored");
        self.get_contact_us(&id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use pretty_assertions::assert_eq;

    fn submission(name: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.into(),
            email: "pat@y.org".into(),
            phone: Some("  ".into()),
            company: Some("Acme".into()),
            subject: None,
            message: "Where is bus 4?".into(),
        }
    }

    #[tokio::test]
    async fn submit_then_list_newest_first() {
        let svc = test_service().await;
        let first = svc.submit_contact_us(&submission("Pat")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = svc.submit_contact_us(&submission("Sam")).await.unwrap();

        let listed = svc.list_contact_us(100).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert!(first.id.starts_with("cus-"));
    }

    #[tokio::test]
    async fn blank_optional_fields_are_stored_as_null() {
        let svc = test_service().await;
        let stored = svc.submit_contact_us(&submission("Pat")).await.unwrap();
        assert_eq!(stored.phone, None);
        assert_eq!(stored.company.as_deref(), Some("Acme"));
        assert_eq!(stored.subject, None);
        assert_eq!(stored.body, "Where is bus 4?");
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected() {
        let svc = test_service().await;
        let err = svc.submit_contact_us(&submission("")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
        assert!(svc.list_contact_us(100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_missing_is_no_result() {
        let svc = test_service().await;
        assert!(matches!(
            svc.get_contact_us("cus-00000000").await,
            Err(DatabaseError::NoResult)
        ));
    }
}
