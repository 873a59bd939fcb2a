//! Repository modules for every Depot table.
//!
//! Each module adds methods to `DepotService` via `impl DepotService` blocks.

pub mod contact_us;
pub mod identity;
pub mod message;
pub mod subject;
