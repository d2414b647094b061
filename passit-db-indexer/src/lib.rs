//! Online secondary-index migrations for Passit DB
//!
//! [`IndexMigrationController`] adds a secondary index to a live table and
//! reports completion through a two-call resource lifecycle protocol
//! (`on_event`, then repeated `is_complete`).
//!
//! # Modes
//!
//! - [`LifecycleMode::Blocking`]: `on_event` polls with bounded exponential
//!   backoff until the table and all its indexes are ACTIVE
//! - [`LifecycleMode::Resumable`]: no call sleeps; the [`MigrationState`] is
//!   handed to the host in `data` and advanced on each completion check

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod migration;
pub mod plan;
pub mod properties;

pub use config::{backoff_wait, LifecycleMode, MigrationConfig, DEFAULT_WAIT_SECONDS};
pub use error::{IndexerError, Result};
pub use lifecycle::{LifecycleEvent, LifecycleResponse, RequestType};
pub use migration::{
    attribute_definitions, IndexMigrationController, MigrationPhase, MigrationState,
};
pub use plan::MigrationPlan;
pub use properties::GsiResourceProperties;
