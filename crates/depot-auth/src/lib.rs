//! # depot-auth
//!
//! Identity and role resolution for Depot.
//!
//! - [`resolver`]: email -> role across the driver, admin and coordinator
//!   tables, with ban evaluation and integrity warnings.
//! - [`cache`]: per-session role cache with explicit invalidation.
//! - [`session_store`]: authentication session providers (keychain/file, memory).
//! - [`SessionGate`]: combines the three and hands out [`Authorized`].
//!
//! Staleness: a cached identity is trusted for `revalidate_after` (config
//! `session.revalidate_after_secs`). A ban applied in the meantime takes effect
//! at the next store resolution, which mutations force by requiring an
//! authorization younger than `session.mutation_max_age_secs`.

pub mod authorized;
pub mod cache;
pub mod error;
pub mod gate;
pub mod moderation;
pub mod principal;
pub mod resolver;
pub mod session_store;

pub use authorized::{AuthSource, Authorized};
pub use error::AuthError;
pub use gate::SessionGate;
pub use principal::Principal;
pub use resolver::{IdentityStore, Resolution, RoleResolver, TableRoleResolver};
pub use session_store::{MemorySessionProvider, SessionProvider, StoredSession};
