#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use depot_auth::cache::RoleCacheStore;
use depot_auth::{Authorized, MemorySessionProvider, SessionGate, SessionProvider, TableRoleResolver};
use depot_core::entities::NewMessage;
use depot_core::enums::{IdentityTable, MergeOrder};
use depot_db::service::DepotService;
use depot_inbox::{Inbox, InboxSettings};

pub struct World {
    pub svc: Arc<DepotService>,
    pub inbox: Inbox<Arc<DepotService>>,
}

pub async fn world() -> World {
    world_with(MergeOrder::Grouped).await
}

pub async fn world_with(merge_order: MergeOrder) -> World {
    let svc = Arc::new(DepotService::new_local(":memory:").await.unwrap());
    let inbox = Inbox::new(
        Arc::clone(&svc),
        InboxSettings {
            merge_order,
            ..InboxSettings::default()
        },
    );
    World { svc, inbox }
}

impl World {
    pub async fn register(&self, table: IdentityTable, email: &str) {
        let role = (table == IdentityTable::Admin).then_some("admin");
        self.svc
            .register_identity(table, email, None, role)
            .await
            .unwrap();
    }

    fn gate(
        &self,
    ) -> (
        SessionGate<TableRoleResolver<Arc<DepotService>>, Arc<MemorySessionProvider>>,
        Arc<MemorySessionProvider>,
        RoleCacheStore,
    ) {
        let provider = Arc::new(MemorySessionProvider::new());
        let cache = RoleCacheStore::memory();
        let gate = SessionGate::new(
            TableRoleResolver::new(Arc::clone(&self.svc)),
            Arc::clone(&provider),
            cache.clone(),
            Duration::from_secs(60),
        );
        (gate, provider, cache)
    }

    /// Fresh authorization for a registered principal.
    pub async fn login(&self, email: &str) -> Authorized {
        let (gate, _, _) = self.gate();
        gate.sign_in(email).await.unwrap()
    }

    /// Authorization served from a 30-second-old cache entry.
    pub async fn stale_login(&self, email: &str) -> Authorized {
        let (gate, provider, cache) = self.gate();
        let fresh = gate.sign_in(email).await.unwrap();
        let session = provider.current_principal().unwrap().unwrap().session_id;
        cache
            .for_session(&session)
            .set(fresh.identity(), Utc::now() - chrono::Duration::seconds(30))
            .unwrap();
        gate.authorize().await.unwrap()
    }

    pub async fn send(&self, from: &Authorized, to: &str, subject: &str, body: &str) -> String {
        let view = self
            .inbox
            .send(
                from,
                &NewMessage {
                    receiver_email: to.into(),
                    subject: Some(subject.into()),
                    body: body.into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // Distinct timestamps for ordering assertions.
        tokio::time::sleep(Duration::from_millis(2)).await;
        view.id
    }
}
