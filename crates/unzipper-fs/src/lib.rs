//! Isolated per-job filesystem workspaces.
//!
//! Every job gets a `(download, extract)` directory pair named by its
//! [`JobId`] under two fixed roots. Two jobs never share a path, so
//! concurrent jobs need no locking.
//!
//! - `job_id.rs` - Collision-resistant job identifiers
//! - `workspace.rs` - Allocation and idempotent release

mod error;
mod job_id;
mod workspace;

pub use error::{Error, Result};
pub use job_id::JobId;
pub use workspace::{JobWorkspace, WorkspaceRoots, release_dir};
