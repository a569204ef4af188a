//! Application services for task selection, mutation, and recovery.

mod batch;
mod catalog;
mod error;
mod lifecycle;
mod prompts;
mod query;
mod recovery;
mod reports;
mod resolver;

pub use batch::BatchMutationService;
pub use catalog::TaskCatalogService;
pub use error::{TaskServiceError, TaskServiceResult};
pub use lifecycle::TaskLifecycleService;
pub use prompts::TaskPromptService;
pub use query::TaskQueryService;
pub use recovery::{PurgeFailure, PurgeReport, RecoveryService, RestoreOutcome, RestorePath};
pub use reports::{LiveTasks, TaskReportService};
pub use resolver::{IdentifierResolver, Resolution, ResolutionConfidence};
