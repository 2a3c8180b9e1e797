//! Release reconciliation
//!
//! Split the same way as planning and execution elsewhere:
//! - [`find`] and [`version`] read the existing releases
//! - [`plan`] decides create vs update (pure)
//! - [`execute`] performs the one write (effectful)

pub mod execute;
pub mod find;
pub mod plan;
pub mod version;

pub use execute::execute_release;
pub use find::{ExistingReleases, find_draft_for_branch, find_previous_release, inspect_releases};
pub use plan::{ReleaseAction, plan_release};
pub use version::{VersionInfo, bump_version, coerce_version, resolve_versions};
