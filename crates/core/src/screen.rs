//! Per-screen state container.
//!
//! A [`Screen`] owns the published [`LoadState`] of one view and the
//! cancellation scope of every fetch it starts. Each [`Screen::refetch`]
//! runs one task: publish `Loading`, fetch, extract, publish the outcome.
//! Concurrent refetches are not coalesced; whichever task publishes last wins.
//! Tearing the screen down (explicitly or by dropping it) cancels every task
//! still in flight, and a cancelled task publishes nothing.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bandbbs_core::extract::HomeView;
//! use bandbbs_core::{Screen, SiteConfig, StaticSource};
//!
//! # #[tokio::main]
//! # async fn main() -> bandbbs_core::Result<()> {
//! let source = Arc::new(StaticSource::new(r#"<div class="block--category"><h2>General</h2></div>"#));
//! let screen = Screen::<HomeView, _>::new(source, SiteConfig::default())?;
//!
//! screen.refetch().await.unwrap();
//! let blocks = screen.state().into_data().unwrap();
//! assert_eq!(blocks[0].name, "General");
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::extract::{Extraction, View};
use crate::fetch::PageSource;
use crate::parse::Document;
use crate::siteconfig::SiteConfig;
use crate::state::LoadState;
use crate::Result;

/// Records published by a screen for view `V`.
pub type Records<V> = Vec<<V as Extraction>::Record>;

/// State container for one view.
pub struct Screen<V: Extraction, S: PageSource + 'static> {
    source: Arc<S>,
    site: Arc<SiteConfig>,
    url: String,
    state: Arc<watch::Sender<LoadState<Records<V>>>>,
    scope: CancellationToken,
    _view: PhantomData<fn() -> V>,
}

impl<V: Extraction, S: PageSource + 'static> Screen<V, S> {
    /// Create a screen in the `Loading` state. Nothing is fetched until
    /// [`refetch`](Self::refetch) is called.
    ///
    /// # Errors
    ///
    /// Returns [`BbsError::InvalidUrl`](crate::BbsError::InvalidUrl) when the
    /// view's page URL cannot be built from the site config.
    pub fn new(source: Arc<S>, site: SiteConfig) -> Result<Self> {
        let url = V::VIEW.page_url(&site)?;
        let (state, _) = watch::channel(LoadState::loading());

        Ok(Self {
            source,
            site: Arc::new(site),
            url,
            state: Arc::new(state),
            scope: CancellationToken::new(),
            _view: PhantomData,
        })
    }

    pub fn view(&self) -> View {
        V::VIEW
    }

    /// The page this screen loads.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState<Records<V>> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<LoadState<Records<V>>> {
        self.state.subscribe()
    }

    /// Start a fetch.
    ///
    /// `Loading` (carrying the previous data, if any) is published before
    /// this returns. The task then publishes `Success` or `Error`; an error
    /// keeps the previous data too. After teardown this publishes nothing.
    pub fn refetch(&self) -> JoinHandle<()> {
        let token = self.scope.child_token();
        let source = Arc::clone(&self.source);
        let site = Arc::clone(&self.site);
        let state = Arc::clone(&self.state);
        let url = self.url.clone();

        let previous = if token.is_cancelled() {
            None
        } else {
            let previous = state.borrow().data().cloned();
            state.send_replace(LoadState::Loading { data: previous.clone() });
            previous
        };

        tokio::spawn(async move {
            if token.is_cancelled() {
                tracing::debug!(view = %V::VIEW, url, "screen torn down, fetch skipped");
                return;
            }

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(view = %V::VIEW, url, "fetch cancelled");
                    return;
                }
                outcome = load::<V, S>(source.as_ref(), &url, &site) => outcome,
            };

            match outcome {
                Ok(records) => {
                    tracing::info!(view = %V::VIEW, url, records = records.len(), "view loaded");
                    state.send_replace(LoadState::Success { data: records });
                }
                Err(e) => {
                    tracing::warn!(view = %V::VIEW, url, error = %e, "view failed to load");
                    state.send_replace(LoadState::Error { message: e.to_string(), data: previous });
                }
            }
        })
    }

    /// Wait until the state leaves `Loading`, or the screen is torn down.
    ///
    /// Returns the state at that moment.
    pub async fn wait_settled(&self) -> LoadState<Records<V>> {
        let mut rx = self.subscribe();

        tokio::select! {
            _ = self.scope.cancelled() => self.state(),
            settled = rx.wait_for(|state| !state.is_loading()) => match settled {
                Ok(state) => state.clone(),
                Err(_) => self.state(),
            },
        }
    }

    /// Cancel every fetch started by this screen. Later refetches are no-ops.
    pub fn teardown(&self) {
        self.scope.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.scope.is_cancelled()
    }
}

impl<V: Extraction, S: PageSource + 'static> Drop for Screen<V, S> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

async fn load<V: Extraction, S: PageSource>(source: &S, url: &str, site: &SiteConfig) -> Result<Records<V>> {
    let html = source.fetch_page(url).await?;
    let doc = Document::parse(&html)?;
    V::extract(&doc, site)
}
