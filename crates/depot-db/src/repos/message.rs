//! Internal message repository (`contact` table): listing under a visibility
//! predicate, flag updates, and creation.

use chrono::Utc;

use depot_core::entities::{Identity, InternalMessage, NewMessage};
use depot_core::ids::PREFIX_MESSAGE;
use depot_core::policy::QueryPredicate;

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, get_flag, get_opt_string, parse_datetime};
use crate::predicate::predicate_sql;
use crate::service::DepotService;
use crate::updates::message::FlagUpdate;

const SELECT_MESSAGE: &str = "SELECT c.id, c.sender_email, c.receiver_email, c.sender_name, \
     c.receiver_name, c.subject_id, s.name, c.message, c.attachment, c.coordinator_id, \
     c.driver_id, c.is_read, c.is_starred, c.created_at \
     FROM contact c LEFT JOIN subjects s ON s.id = c.subject_id";

fn row_to_message(row: &libsql::Row) -> Result<InternalMessage, DatabaseError> {
    Ok(InternalMessage {
        id: row.get::<String>(0)?,
        sender_email: row.get::<String>(1)?,
        receiver_email: row.get::<String>(2)?,
        sender_display: get_opt_string(row, 3)?,
        receiver_display: get_opt_string(row, 4)?,
        subject_ref: get_opt_string(row, 5)?,
        subject: get_opt_string(row, 6)?,
        body: row.get::<String>(7)?,
        attachment_ref: get_opt_string(row, 8)?,
        coordinator_ref: get_opt_string(row, 9)?,
        driver_ref: get_opt_string(row, 10)?,
        is_read: get_flag(row, 11)?,
        is_starred: get_flag(row, 12)?,
        created_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

/// SET clauses and params for a flag update, numbered from `?1`.
fn flag_sets(update: &FlagUpdate) -> (Vec<String>, Vec<libsql::Value>) {
    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1;

    if let Some(is_read) = update.is_read {
        sets.push(format!("is_read = ?{idx}"));
        params.push(i64::from(is_read).into());
        idx += 1;
    }
    if let Some(is_starred) = update.is_starred {
        sets.push(format!("is_starred = ?{idx}"));
        params.push(i64::from(is_starred).into());
    }
    (sets, params)
}

impl DepotService {
    /// List internal messages matching `predicate`, newest first.
    pub async fn list_messages(
        &self,
        predicate: &QueryPredicate,
        limit: u32,
    ) -> Result<Vec<InternalMessage>, DatabaseError> {
        let (filter, mut params) = predicate_sql(predicate, 1);
        let limit_idx = params.len() + 1;
        params.push(i64::from(limit).into());
        let sql = format!(
            "{SELECT_MESSAGE} WHERE 1 = 1 {filter} ORDER BY c.created_at DESC, c.id DESC LIMIT ?{limit_idx}"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            messages.push(row_to_message(&row)?);
        }
        Ok(messages)
    }

    pub async fn get_message(&self, id: &str) -> Result<InternalMessage, DatabaseError> {
        let sql = format!("{SELECT_MESSAGE} WHERE c.id = ?1");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_message(&row)
    }

    /// Create an internal message from `sender`. The new message is unread
    /// and unstarred.
    pub async fn create_message(
        &self,
        sender: &Identity,
        new: &NewMessage,
    ) -> Result<InternalMessage, DatabaseError> {
        let subject_ref = match new.subject.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(self.ensure_subject(s).await?),
            _ => None,
        };
        let id = self.db().generate_id(PREFIX_MESSAGE).await?;
        let now = format_timestamp(Utc::now());

        self.db()
            .execute_with(
                "INSERT INTO contact (id, sender_email, receiver_email, sender_name, receiver_name,
                     subject_id, message, attachment, coordinator_id, driver_id, is_read, is_starred,
                     created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, 0, ?11)",
                || {
                    libsql::params![
                        id.as_str(),
                        sender.email.as_str(),
                        new.receiver_email.as_str(),
                        new.sender_display.as_deref(),
                        new.receiver_display.as_deref(),
                        subject_ref.as_deref(),
                        new.body.as_str(),
                        new.attachment_ref.as_deref(),
                        new.coordinator_ref.as_deref(),
                        new.driver_ref.as_deref(),
                        now.as_str()
                    ]
                },
            )
            .await?;

        tracing::debug!(%id, sender = %sender.email, receiver = %new.receiver_email, "message created");
        self.get_message(&id).await
    }

    /// Apply a flag update and return the row as persisted afterwards.
    ///
    /// An empty update only re-reads the row.
    pub async fn update_message_flags(
        &self,
        id: &str,
        update: &FlagUpdate,
    ) -> Result<InternalMessage, DatabaseError> {
        let (sets, mut params) = flag_sets(update);
        if sets.is_empty() {
            return self.get_message(id).await;
        }

        let id_idx = params.len() + 1;
        params.push(id.into());
        let sql = format!("UPDATE contact SET {} WHERE id = ?{id_idx}", sets.join(", "));
        let n = self
            .db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        if n == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_message(id).await
    }

    /// Apply one flag update to many messages. Returns the number of rows updated.
    pub async fn update_message_flags_many(
        &self,
        ids: &[String],
        update: &FlagUpdate,
    ) -> Result<u64, DatabaseError> {
        let (sets, mut params) = flag_sets(update);
        if sets.is_empty() || ids.is_empty() {
            return Ok(0);
        }

        let first = params.len() + 1;
        let placeholders: Vec<String> = (first..first + ids.len()).map(|i| format!("?{i}")).collect();
        params.extend(ids.iter().map(|id| libsql::Value::from(id.as_str())));
        let sql = format!(
            "UPDATE contact SET {} WHERE id IN ({})",
            sets.join(", "),
            placeholders.join(", ")
        );
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await
    }
}
