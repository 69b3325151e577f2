// Data Models
pub mod directory;
pub mod file_entry;
pub mod operation;

pub use directory::DirectoryModel;
pub use file_entry::{Entry, EntryKind};
pub use operation::{
    CancelToken, ConflictResolution, ItemStatus, OperationId, OperationItem, OperationProgress,
    OperationRequest, OperationStatus, OperationSummary, Verb,
};
