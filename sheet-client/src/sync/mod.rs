//! Remote data synchronization layer
//!
//! Control flow: a user action goes through the
//! [`MutationDispatcher`], which updates the local store optimistically
//! and posts to the sheet endpoint; resync-worthy mutations arm the
//! [`SyncWorker`]'s per-property debounce, and when it fires the
//! fetch/normalize pipeline overwrites that property's dataset.
//! Whichever callback resolves last wins; there are no version stamps
//! and no conflict detection.

mod dispatcher;
mod worker;

pub use dispatcher::MutationDispatcher;
pub use worker::{Refresher, SyncWorker};

use shared::models::PropertyId;

use crate::normalize::normalize_property;
use crate::store::{Action, StateStore};
use crate::{ClientResult, SheetClient};

/// Fetch one property and replace its dataset in the store.
///
/// The normalized payload fully replaces the property's collections;
/// on success the integration record is stamped Connected.
pub async fn fetch_and_apply(
    client: &SheetClient,
    store: &StateStore,
    property: PropertyId,
) -> ClientResult<()> {
    let raw = client.fetch_property(property).await?;
    let data = normalize_property(raw);
    store.dispatch(Action::ReplacePropertyData {
        property,
        data: Box::new(data),
    });
    store.dispatch(Action::MarkSyncSuccess {
        now: shared::util::now_millis(),
    });
    Ok(())
}

/// Fetch variant for the background paths, where failures are logged
/// and swallowed: the store keeps its stale copy and no retry is
/// scheduled.
pub(crate) async fn fetch_and_apply_logged(
    client: &SheetClient,
    store: &StateStore,
    property: PropertyId,
) {
    if let Err(e) = fetch_and_apply(client, store, property).await {
        tracing::warn!(%property, "failed to refresh property from sheet: {e}");
    }
}
