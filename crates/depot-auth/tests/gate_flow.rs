use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pretty_assertions::assert_eq;

use depot_auth::cache::RoleCacheStore;
use depot_auth::moderation::Moderator;
use depot_auth::{
    AuthError, AuthSource, MemorySessionProvider, SessionGate, SessionProvider, TableRoleResolver,
};
use depot_core::entities::{IdentityRecord, Role};
use depot_core::enums::{AdminRole, IdentityTable};
use depot_db::error::DatabaseError;
use depot_db::service::DepotService;

type Gate = SessionGate<TableRoleResolver<Arc<DepotService>>, Arc<MemorySessionProvider>>;

struct Harness {
    svc: Arc<DepotService>,
    provider: Arc<MemorySessionProvider>,
    cache: RoleCacheStore,
    gate: Gate,
}

async fn harness(window: Duration) -> Harness {
    let svc = Arc::new(DepotService::new_local(":memory:").await.unwrap());
    let provider = Arc::new(MemorySessionProvider::new());
    let cache = RoleCacheStore::memory();
    let gate = SessionGate::new(
        TableRoleResolver::new(Arc::clone(&svc)),
        Arc::clone(&provider),
        cache.clone(),
        window,
    );
    Harness {
        svc,
        provider,
        cache,
        gate,
    }
}

async fn register(h: &Harness, table: IdentityTable, email: &str, role: Option<&str>) {
    h.svc.register_identity(table, email, None, role).await.unwrap();
}

#[tokio::test]
async fn sign_in_resolves_then_serves_from_cache() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Driver, "d@x.com", None).await;

    let first = h.gate.sign_in("d@x.com").await.unwrap();
    assert_eq!(first.identity().role, Role::Driver);
    assert_eq!(first.source(), AuthSource::Fresh);

    let second = h.gate.authorize().await.unwrap();
    assert_eq!(second.source(), AuthSource::Cached);
    assert_eq!(second.identity(), first.identity());
}

#[tokio::test]
async fn admin_without_sub_role_is_viewer() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Admin, "a@x.com", None).await;
    let auth = h.gate.sign_in("a@x.com").await.unwrap();
    assert_eq!(
        auth.identity().role,
        Role::Admin {
            sub_role: AdminRole::Viewer
        }
    );
}

#[tokio::test]
async fn banned_sign_in_tears_down_session() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Coordinator, "c@x.com", None).await;
    h.svc
        .set_identity_banned(IdentityTable::Coordinator, "c@x.com", true)
        .await
        .unwrap();

    let err = h.gate.sign_in("c@x.com").await.unwrap_err();
    assert!(matches!(err, AuthError::Banned { ref email } if email == "c@x.com"));
    assert_eq!(h.provider.current_principal().unwrap(), None);
}

#[tokio::test]
async fn ban_is_enforced_at_next_store_resolution() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Driver, "d@x.com", None).await;
    let principal_session = h.gate.sign_in("d@x.com").await.unwrap();
    assert_eq!(principal_session.source(), AuthSource::Fresh);

    h.svc
        .set_identity_banned(IdentityTable::Driver, "d@x.com", true)
        .await
        .unwrap();

    // Inside the revalidation window the cached identity is still served.
    assert_eq!(h.gate.authorize().await.unwrap().source(), AuthSource::Cached);

    let err = h.gate.authorize_fresh().await.unwrap_err();
    assert!(matches!(err, AuthError::Banned { .. }));
    assert_eq!(h.provider.current_principal().unwrap(), None);
    assert!(matches!(h.gate.authorize().await, Err(AuthError::NotSignedIn)));
}

#[tokio::test]
async fn zero_window_always_revalidates() {
    let h = harness(Duration::ZERO).await;
    register(&h, IdentityTable::Driver, "d@x.com", None).await;
    h.gate.sign_in("d@x.com").await.unwrap();
    assert_eq!(h.gate.authorize().await.unwrap().source(), AuthSource::Fresh);
}

#[tokio::test]
async fn expired_cache_entry_triggers_resolution() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Driver, "d@x.com", None).await;
    let auth = h.gate.sign_in("d@x.com").await.unwrap();

    let session = h.provider.current_principal().unwrap().unwrap().session_id;
    h.cache
        .for_session(&session)
        .set(auth.identity(), Utc::now() - chrono::Duration::minutes(5))
        .unwrap();

    assert_eq!(h.gate.authorize().await.unwrap().source(), AuthSource::Fresh);
}

#[tokio::test]
async fn cache_entry_for_another_principal_is_ignored() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Driver, "d@x.com", None).await;
    register(&h, IdentityTable::Admin, "a@x.com", Some("admin")).await;
    let admin = h.gate.sign_in("a@x.com").await.unwrap();

    // Same session ID, different principal.
    let mut principal = h.provider.current_principal().unwrap().unwrap();
    principal.email = "d@x.com".into();
    h.provider.restore(principal).unwrap();
    assert!(admin.identity().is_admin());

    let auth = h.gate.authorize().await.unwrap();
    assert_eq!(auth.identity().role, Role::Driver);
    assert_eq!(auth.source(), AuthSource::Fresh);
}

#[tokio::test]
async fn unknown_email_is_unresolved_not_defaulted() {
    let h = harness(Duration::from_secs(60)).await;
    let err = h.gate.sign_in("nobody@x.com").await.unwrap_err();
    assert!(matches!(err, AuthError::Unresolved { .. }));
}

#[tokio::test]
async fn not_signed_in() {
    let h = harness(Duration::from_secs(60)).await;
    assert!(matches!(h.gate.authorize().await, Err(AuthError::NotSignedIn)));
    assert_eq!(h.gate.cached_identity().unwrap(), None);
}

#[tokio::test]
async fn multi_table_match_carries_warning() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Coordinator, "p@x.com", None).await;
    register(&h, IdentityTable::Driver, "p@x.com", None).await;

    let auth = h.gate.sign_in("p@x.com").await.unwrap();
    assert_eq!(auth.identity().role, Role::Driver);
    let warning = auth.warning().expect("integrity warning");
    assert_eq!(
        warning.tables,
        vec![IdentityTable::Driver, IdentityTable::Coordinator]
    );
}

#[tokio::test]
async fn sign_out_clears_cache_and_session() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Driver, "d@x.com", None).await;
    h.gate.sign_in("d@x.com").await.unwrap();
    assert!(h.gate.cached_identity().unwrap().is_some());

    let session = h.provider.current_principal().unwrap().unwrap().session_id;
    h.gate.sign_out().unwrap();
    assert_eq!(h.cache.for_session(&session).get().unwrap(), None);
    assert_eq!(h.provider.current_principal().unwrap(), None);
}

// ---------------------------------------------------------------------------
// Store failures
// ---------------------------------------------------------------------------

struct DownStore;

impl depot_auth::IdentityStore for DownStore {
    async fn find_by_email(
        &self,
        _table: IdentityTable,
        _email: &str,
    ) -> Result<Option<IdentityRecord>, DatabaseError> {
        Err(DatabaseError::Query("connection refused".into()))
    }

    async fn set_banned(
        &self,
        _table: IdentityTable,
        _email: &str,
        _banned: bool,
    ) -> Result<bool, DatabaseError> {
        Err(DatabaseError::Query("connection refused".into()))
    }
}

#[tokio::test]
async fn store_failure_is_surfaced_not_replaced_by_cache() {
    let provider = Arc::new(MemorySessionProvider::signed_in("d@x.com").unwrap());
    let cache = RoleCacheStore::memory();
    let session = provider.current_principal().unwrap().unwrap().session_id;
    cache
        .for_session(&session)
        .set(
            &depot_core::entities::Identity {
                role: Role::Driver,
                id: "drv-00000001".into(),
                email: "d@x.com".into(),
            },
            Utc::now(),
        )
        .unwrap();

    let gate = SessionGate::new(
        TableRoleResolver::new(DownStore),
        Arc::clone(&provider),
        cache,
        Duration::from_secs(60),
    );
    let err = gate.authorize_fresh().await.unwrap_err();
    assert!(matches!(err, AuthError::StoreUnavailable { retryable: false, .. }));
    // A failed check never signs the principal out.
    assert!(provider.current_principal().unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_fresh_full_admins_may_ban() {
    let h = harness(Duration::from_secs(60)).await;
    register(&h, IdentityTable::Admin, "a@x.com", Some("admin")).await;
    register(&h, IdentityTable::Admin, "e@x.com", Some("editor")).await;
    register(&h, IdentityTable::Driver, "d@x.com", None).await;
    let moderator = Moderator::new(Arc::clone(&h.svc), Duration::from_secs(5));

    let editor = h.gate.sign_in("e@x.com").await.unwrap();
    assert!(matches!(
        moderator
            .set_ban(&editor, IdentityTable::Driver, "d@x.com", true)
            .await,
        Err(AuthError::Forbidden(_))
    ));

    let admin = h.gate.sign_in("a@x.com").await.unwrap();
    assert!(moderator
        .set_ban(&admin, IdentityTable::Driver, "d@x.com", true)
        .await
        .unwrap());
    assert!(matches!(
        moderator
            .set_ban(&admin, IdentityTable::Admin, "a@x.com", true)
            .await,
        Err(AuthError::Forbidden(_))
    ));

    let session = h.provider.current_principal().unwrap().unwrap().session_id;
    h.cache
        .for_session(&session)
        .set(admin.identity(), Utc::now() - chrono::Duration::seconds(30))
        .unwrap();
    let stale = h.gate.authorize().await.unwrap();
    assert_eq!(stale.source(), AuthSource::Cached);
    assert!(matches!(
        moderator
            .set_ban(&stale, IdentityTable::Driver, "d@x.com", false)
            .await,
        Err(AuthError::Forbidden(_))
    ));
}
