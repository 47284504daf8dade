//! Raw payload normalization
//!
//! Backend job endpoints disagree on field naming convention (camelCase
//! vs snake_case), envelope nesting (`data`/`detail` wrappers), and
//! status vocabulary. Everything in this module exists to collapse
//! those shapes into the one canonical [`Job`](crate::domain::job::Job)
//! before any other code sees them:
//!
//! - `fields`: the alias table and first-present field resolver
//! - `shape`: envelope unwrapping, payload decode/merge, locator
//!   normalization
//! - `mapper`: raw record to canonical job, for list and single-job
//!   endpoint shapes

pub mod fields;
pub mod mapper;
pub mod shape;

pub use mapper::{MapError, map_job_page, map_list_record, map_single_job};
pub use shape::{PayloadSlot, extract_job_id, normalize_locator, unwrap_body};
