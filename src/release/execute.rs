//! Release execution - the effectful half of reconciliation
//!
//! Performs the single write a [`ReleaseAction`] describes.

use crate::error::{Error, Result};
use crate::platform::ReleaseHost;
use crate::release::plan::ReleaseAction;
use crate::types::Release;
use tracing::{debug, info};

/// Perform the planned write (EFFECTFUL)
///
/// Exactly one platform write is attempted. A failure surfaces as
/// [`Error::Write`]; there is no retry.
pub async fn execute_release(action: &ReleaseAction, host: &dyn ReleaseHost) -> Result<Release> {
    debug!(%action, "executing release action");

    let release = match action {
        ReleaseAction::Create(new_release) => host
            .create_release(new_release)
            .await
            .map_err(|e| Error::Write(format!("create draft release: {e}")))?,
        ReleaseAction::Update {
            release_id, body, ..
        } => host
            .update_release(*release_id, body)
            .await
            .map_err(|e| Error::Write(format!("update draft release {release_id}: {e}")))?,
    };

    info!(release_id = release.id, url = %release.html_url, "draft release saved");
    Ok(release)
}
