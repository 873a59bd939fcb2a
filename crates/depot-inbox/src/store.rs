//! Store seams consumed by [`crate::Inbox`].

use std::future::Future;
use std::sync::Arc;

use depot_core::entities::{
    ContactSubmission, ExternalMessage, Identity, InternalMessage, NewMessage,
};
use depot_core::policy::QueryPredicate;
use depot_db::error::DatabaseError;
use depot_db::service::DepotService;
use depot_db::updates::message::FlagUpdate;

/// The internal `contact` thread store.
pub trait MessageStore: Send + Sync {
    fn list_internal(
        &self,
        predicate: &QueryPredicate,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<InternalMessage>, DatabaseError>> + Send;

    fn get_internal(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<InternalMessage, DatabaseError>> + Send;

    /// Returns the row as persisted after the update.
    fn update_flags(
        &self,
        id: &str,
        update: &FlagUpdate,
    ) -> impl Future<Output = Result<InternalMessage, DatabaseError>> + Send;

    fn update_flags_many(
        &self,
        ids: &[String],
        update: &FlagUpdate,
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send;

    fn create_internal(
        &self,
        sender: &Identity,
        new: &NewMessage,
    ) -> impl Future<Output = Result<InternalMessage, DatabaseError>> + Send;
}

/// The public contact-form log. No predicate: it has no owner concept.
pub trait ContactFormStore: Send + Sync {
    fn list_external(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<ExternalMessage>, DatabaseError>> + Send;

    fn get_external(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ExternalMessage, DatabaseError>> + Send;

    fn submit_external(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = Result<ExternalMessage, DatabaseError>> + Send;
}

impl MessageStore for DepotService {
    async fn list_internal(
        &self,
        predicate: &QueryPredicate,
        limit: u32,
    ) -> Result<Vec<InternalMessage>, DatabaseError> {
        self.list_messages(predicate, limit).await
    }

    async fn get_internal(&self, id: &str) -> Result<InternalMessage, DatabaseError> {
        self.get_message(id).await
    }

    async fn update_flags(
        &self,
        id: &str,
        update: &FlagUpdate,
    ) -> Result<InternalMessage, DatabaseError> {
        self.update_message_flags(id, update).await
    }

    async fn update_flags_many(
        &self,
        ids: &[String],
        update: &FlagUpdate,
    ) -> Result<u64, DatabaseError> {
        self.update_message_flags_many(ids, update).await
    }

    async fn create_internal(
        &self,
        sender: &Identity,
        new: &NewMessage,
    ) -> Result<InternalMessage, DatabaseError> {
        self.create_message(sender, new).await
    }
}

impl ContactFormStore for DepotService {
    async fn list_external(&self, limit: u32) -> Result<Vec<ExternalMessage>, DatabaseError> {
        self.list_contact_us(limit).await
    }

    async fn get_external(&self, id: &str) -> Result<ExternalMessage, DatabaseError> {
        self.get_contact_us(id).await
    }

    async fn submit_external(
        &self,
        submission: &ContactSubmission,
    ) -> Result<ExternalMessage, DatabaseError> {
        self.submit_contact_us(submission).await
    }
}

impl<S: MessageStore> MessageStore for Arc<S> {
    fn list_internal(
        &self,
        predicate: &QueryPredicate,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<InternalMessage>, DatabaseError>> + Send {
        (**self).list_internal(predicate, limit)
    }

    fn get_internal(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<InternalMessage, DatabaseError>> + Send {
        (**self).get_internal(id)
    }

    fn update_flags(
        &self,
        id: &str,
        update: &FlagUpdate,
    ) -> impl Future<Output = Result<InternalMessage, DatabaseError>> + Send {
        (**self).update_flags(id, update)
    }

    fn update_flags_many(
        &self,
        ids: &[String],
        update: &FlagUpdate,
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send {
        (**self).update_flags_many(ids, update)
    }

    fn create_internal(
        &self,
        sender: &Identity,
        new: &NewMessage,
    ) -> impl Future<Output = Result<InternalMessage, DatabaseError>> + Send {
        (**self).create_internal(sender, new)
    }
}

impl<S: ContactFormStore> ContactFormStore for Arc<S> {
    fn list_external(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<ExternalMessage>, DatabaseError>> + Send {
        (**self).list_external(limit)
    }

    fn get_external(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ExternalMessage, DatabaseError>> + Send {
        (**self).get_external(id)
    }

    fn submit_external(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = Result<ExternalMessage, DatabaseError>> + Send {
        (**self).submit_external(submission)
    }
}
