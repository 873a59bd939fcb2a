//! Shared test utilities for depot-db unit tests.

use depot_core::entities::Identity;
use depot_core::enums::{AdminRole, IdentityTable};

use crate::DepotDb;
use crate::service::DepotService;

/// In-memory service with the schema applied.
pub async fn test_service() -> DepotService {
    DepotService::from_db(DepotDb::open_local(":memory:").await.unwrap())
}

/// Register a principal (admins get the `admin` sub-role) and return its identity.
pub async fn register(svc: &DepotService, table: IdentityTable, email: &str) -> Identity {
    let admin_role = (table == IdentityTable::Admin).then_some(AdminRole::Admin.as_str());
    svc.register_identity(table, email, None, admin_role)
        .await
        .unwrap()
        .to_identity()
}
