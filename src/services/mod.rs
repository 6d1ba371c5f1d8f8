//! Service layer for business logic.
//!
//! Services tie the registry, mapper and exporters to configuration and the
//! file system.

pub mod export;
pub mod mapping;

// Re-export commonly used types
pub use export::{ExportOptions, ExportService, PendingFile};
pub use mapping::{MappingOutcome, MappingService};
