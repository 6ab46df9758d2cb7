//! Task lifecycle management.
//!
//! Leaders assign tasks to their subordinates; the assignee starts and
//! finishes them. Finishing measures the elapsed minutes and stores exactly
//! one automatic feedback record. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
