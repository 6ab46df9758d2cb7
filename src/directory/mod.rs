//! User directory and reference catalogs.
//!
//! The directory owns users (including the leader/subordinate relation),
//! task types and task statuses. The task lifecycle engine only reads from
//! it; registration, leader assignment and catalog seeding go through
//! [`services::DirectoryService`]. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
