//! Subject lookup table.

use depot_core::ids::PREFIX_SUBJECT;

use crate::error::DatabaseError;
use crate::service::DepotService;

impl DepotService {
    /// Return the ID of the subject with this exact text, inserting it first
    /// if needed.
    pub async fn ensure_subject(&self, name: &str) -> Result<String, DatabaseError> {
        if let Some(id) = self.find_subject(name).await? {
            return Ok(id);
        }
        let id = self.db().generate_id(PREFIX_SUBJECT).await?;
        self.db()
            .execute_with(
                "INSERT INTO subjects (id, name) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
                || libsql::params![id.as_str(), name],
            )
            .await?;
        // A concurrent writer may have won the insert.
        self.find_subject(name).await?.ok_or(DatabaseError::NoResult)
    }

    async fn find_subject(&self, name: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with("SELECT id FROM subjects WHERE name = ?1", || [name])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn ensure_subject_reuses_existing_row() {
        let svc = test_service().await;
        let a = svc.ensure_subject("Issue").await.unwrap();
        let b = svc.ensure_subject("Issue").await.unwrap();
        let c = svc.ensure_subject("Payroll").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("sub-"));
    }
}
