//! Task Mirror: leader/subordinate task assignment with automatic feedback.
//!
//! Leaders assign tasks to the people who report to them. Assignees start
//! and finish their own tasks; finishing measures the elapsed minutes and
//! scores the result against the estimate.
//!
//! # Architecture
//!
//! Each feature module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`,
//!   HTTP)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`directory`]: Users, the leader relation and reference catalogs
//! - [`task`]: Task lifecycle, authorization and projections
//! - [`feedback`]: Scoring and comment composition
//! - [`config`]: TOML service configuration
//! - [`persistence`]: Shared `PostgreSQL` pool plumbing
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod directory;
pub mod feedback;
pub mod persistence;
pub mod task;
pub mod telemetry;
