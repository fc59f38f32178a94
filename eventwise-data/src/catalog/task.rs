//! Background catalog fetch with an observable load state.

use std::sync::Arc;

use eventwise_core::{Catalog, CatalogError};
use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::AsyncCatalogSource;

/// Progress of a [`CatalogTask`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    /// The fetch has not finished.
    #[default]
    Pending,
    /// The fetch succeeded.
    Resolved(Catalog),
    /// The fetch failed.
    Failed(CatalogError),
}

impl LoadState {
    /// Whether the fetch is still running.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The resolved catalog, if any.
    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Resolved(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// The failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&CatalogError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// A catalog fetch running on a Tokio runtime.
///
/// The task publishes [`LoadState::Pending`] until the source answers, then
/// exactly one of [`LoadState::Resolved`] or [`LoadState::Failed`]. Callers
/// either poll [`state`](Self::state) or await [`settled`](Self::settled).
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use eventwise_core::Catalog;
/// use eventwise_data::catalog::CatalogTask;
/// use eventwise_data::test_support::StubCatalogSource;
///
/// # tokio::runtime::Runtime::new()?.block_on(async {
/// let task = CatalogTask::spawn(Arc::new(StubCatalogSource::with_catalog(Catalog::empty())));
/// let catalog = task.settled().await.expect("stub resolves");
/// assert!(catalog.is_empty());
/// # });
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CatalogTask {
    state: watch::Receiver<LoadState>,
    handle: JoinHandle<()>,
}

impl CatalogTask {
    /// Spawn a fetch on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like [`tokio::spawn`].
    pub fn spawn<S>(source: Arc<S>) -> Self
    where
        S: AsyncCatalogSource + ?Sized + 'static,
    {
        Self::spawn_on(source, &Handle::current())
    }

    /// Spawn a fetch on the given runtime.
    pub fn spawn_on<S>(source: Arc<S>, runtime: &Handle) -> Self
    where
        S: AsyncCatalogSource + ?Sized + 'static,
    {
        let (sender, state) = watch::channel(LoadState::Pending);
        let handle = runtime.spawn(async move {
            let next = match source.fetch_events().await {
                Ok(catalog) => {
                    debug!("catalog resolved with {} events", catalog.len());
                    LoadState::Resolved(catalog)
                }
                Err(err) => {
                    warn!("catalog fetch failed: {err}");
                    LoadState::Failed(err)
                }
            };
            sender.send_replace(next);
        });
        Self { state, handle }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Whether the fetch is still running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Wait until the fetch resolves or fails.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`CatalogError::Interrupted`] when the task
    /// was aborted before it finished.
    pub async fn settled(&self) -> Result<Catalog, CatalogError> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|current| !current.is_pending())
            .await
            .map_err(|_| CatalogError::Interrupted)?;
        match &*settled {
            LoadState::Resolved(catalog) => Ok(catalog.clone()),
            LoadState::Failed(err) => Err(err.clone()),
            LoadState::Pending => Err(CatalogError::Interrupted),
        }
    }

    /// Cancel the fetch. Has no effect once it has settled.
    pub fn abort(&self) {
        self.handle.abort();
    }
}
