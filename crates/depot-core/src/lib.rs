//! # depot-core
//!
//! Core types, ID prefixes, and error types for Depot.
//!
//! This crate provides the foundational types shared across all Depot crates:
//! - Resolved identities (driver, coordinator, admin with privilege sub-role)
//! - Internal and external message entities and their unified `MessageView`
//! - Inbox filters, message sources, and identity table enums
//! - The visibility policy: `(Identity, InboxFilter) -> QueryPredicate`
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod policy;
