//! Owner of the latest fetched rates and the currency list derived from them.

use crate::core::catalog;
use crate::core::conversion::{self, ConversionRequest, ConversionResult};
use crate::core::currency::{Currency, RateSnapshot, RateSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch exchange rates";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub snapshot: Option<Arc<RateSnapshot>>,
    pub currencies: Vec<Currency>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl StoreState {
    pub fn convert(&self, from: &str, to: &str, amount: f64) -> Option<ConversionResult> {
        conversion::convert(
            &ConversionRequest::new(from, to, amount),
            self.snapshot.as_deref(),
        )
    }

    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }
}

/// Publishes [`StoreState`] to any number of subscribers.
///
/// When refreshes overlap, only the most recently issued one may apply its outcome;
/// older completions are dropped.
pub struct RateStore {
    source: Arc<dyn RateSource>,
    state: watch::Sender<StoreState>,
    // Only touched while the state channel's lock is held.
    latest_ticket: AtomicU64,
}

impl RateStore {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            source,
            state,
            latest_ticket: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Fetches new rates and applies the outcome. Failures end up in `StoreState::error`.
    #[instrument(name = "RateStoreRefresh", skip(self))]
    pub async fn refresh(&self) {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
            state.error = None;
        });
        debug!(ticket, "Fetching exchange rates");

        let outcome = self.source.fetch_rates().await;

        self.state.send_if_modified(|state| {
            let latest = self.latest_ticket.load(Ordering::SeqCst);
            if latest != ticket {
                debug!(ticket, latest, "Discarding outcome of superseded refresh");
                return false;
            }
            match outcome {
                Ok(snapshot) => {
                    debug!(
                        base = %snapshot.base,
                        rates = snapshot.rates.len(),
                        "Stored new rate snapshot"
                    );
                    state.currencies = catalog::currencies_from(&snapshot.rates);
                    state.snapshot = Some(Arc::new(snapshot));
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(error = %message, "Failed to refresh exchange rates");
                    state.error = Some(if message.trim().is_empty() {
                        FETCH_FAILED_MESSAGE.to_string()
                    } else {
                        message
                    });
                }
            }
            state.is_loading = false;
            true
        });
    }

    /// Runs [`RateStore::refresh`] on the tokio runtime; the outcome shows up on the state stream.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.refresh().await })
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    pub fn convert(&self, from: &str, to: &str, amount: f64) -> Option<ConversionResult> {
        self.state.borrow().convert(from, to, amount)
    }
}
