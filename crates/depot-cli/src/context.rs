use std::sync::Arc;

use anyhow::Context;
use depot_auth::cache::RoleCacheStore;
use depot_auth::moderation::Moderator;
use depot_auth::{SessionGate, StoredSession, TableRoleResolver};
use depot_config::DepotConfig;
use depot_db::retry::RetryConfig;
use depot_db::service::DepotService;
use depot_inbox::{Inbox, InboxSettings};

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;

pub type Gate = SessionGate<TableRoleResolver<Arc<DepotService>>, StoredSession>;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: DepotConfig,
    pub gate: Gate,
    pub inbox: Inbox<Arc<DepotService>>,
    pub moderator: Moderator<Arc<DepotService>>,
}

impl AppContext {
    pub async fn init(config: DepotConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let service = Arc::new(open_service(&config).await?);

        let cache_dir = config
            .session
            .cache_dir()
            .context("cannot locate a session cache directory; set DEPOT_SESSION__CACHE_DIR")?;
        let gate = SessionGate::new(
            TableRoleResolver::new(Arc::clone(&service)),
            StoredSession::new()?,
            RoleCacheStore::Directory(cache_dir),
            config.session.revalidate_after(),
        );

        let mut settings = InboxSettings::from_config(&config);
        settings.limit = effective_limit(None, flags.limit, settings.limit);
        let inbox = Inbox::new(Arc::clone(&service), settings);
        let moderator = Moderator::new(Arc::clone(&service), config.session.mutation_max_age());

        Ok(Self {
            config,
            gate,
            inbox,
            moderator,
        })
    }
}

async fn open_service(config: &DepotConfig) -> anyhow::Result<DepotService> {
    let db = &config.database;
    if db.is_remote() {
        tracing::debug!(url = %db.url, "opening remote store");
        return DepotService::new_remote(
            &db.url,
            &db.auth_token,
            RetryConfig::with_attempts(db.retry_attempts),
        )
        .await
        .context("failed to connect to the remote depot store");
    }

    tracing::debug!(path = %db.path, "opening local store");
    DepotService::new_local(&db.path)
        .await
        .with_context(|| format!("failed to open local depot store at {}", db.path))
}
