//! Domain model for task records, selection, and mutation.
//!
//! Everything here is pure: no store access and no clock reads. Store records
//! enter through [`TaskRecord::from_raw`] and leave through
//! [`TaskRecord::to_wire`] or [`TaskRecord::to_raw`].

mod batch;
mod error;
mod filter;
mod ids;
mod mutation;
mod record;
mod status;
mod summary;
pub mod timestamp;

pub use batch::{BatchFailure, BatchResult, BatchSuccess};
pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use filter::FilterSpec;
pub use ids::{TaskNumber, TaskSelector, TaskUuid};
pub use mutation::{FieldChanges, FieldUpdate, Mutation, StatusTransition};
pub use record::{Annotation, RawTask, TaskDraft, TaskRecord, WireAnnotation, WireTask};
pub use status::{Priority, StatusScope, TaskStatus};
pub use summary::{PriorityCounts, StatusCounts, TaskSummary};
