//! Redirect sequencer
//!
//! `Bootstrap → {Dashboard, Redirecting, NotFound}`. Bootstrap loads the
//! settings, reads the address, fetches the baseline and merges it with the
//! local store into an immutable snapshot. Resolution only ever runs against
//! that snapshot, after the baseline fetch has settled.
//!
//! [`SequenceDriver`] owns the "current" run: any new address restarts the
//! whole sequence from `Bootstrap` and the previous run is abandoned.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use strum::AsRefStr;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, instrument, trace};

use super::address::AddressContext;
use super::analytics::{self, AnalyticsSink, NoopAnalytics, REDIRECT_EVENT};
use super::baseline::{BaselineSource, fetch_baseline};
use super::click_counter::ClickCounter;
use super::merger::merge;
use super::resolver::resolve;
use crate::config::StaticConfig;
use crate::storage::{LinkRecord, LinkStore, Settings};

/// Performs the final navigation, replacing the current address instead of
/// adding a history entry.
pub trait Navigator: Send + Sync {
    fn replace(&self, url: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub links: Arc<[LinkRecord]>,
    pub settings: Settings,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SequenceState {
    Bootstrap,
    Dashboard(DashboardView),
    Redirecting { record: LinkRecord, target: String },
    NotFound { fragment: String },
}

impl SequenceState {
    pub fn name(&self) -> &str {
        self.as_ref()
    }
}

/// Result of the bootstrap step.
#[derive(Debug, Clone)]
pub struct Bootstrapped {
    pub context: AddressContext,
    pub settings: Settings,
    pub snapshot: Arc<[LinkRecord]>,
}

#[derive(Debug, Clone)]
pub struct SequencerOptions {
    pub redirect_delay: Duration,
    pub baseline_timeout: Duration,
    pub fragment_delimiter: char,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self::from_config(&StaticConfig::default())
    }
}

impl SequencerOptions {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            redirect_delay: config.redirect.delay(),
            baseline_timeout: config.baseline.timeout(),
            fragment_delimiter: config.redirect.fragment_delimiter,
        }
    }
}

pub struct RedirectSequencer {
    store: Arc<LinkStore>,
    baseline: Arc<dyn BaselineSource>,
    analytics: Arc<dyn AnalyticsSink>,
    navigator: Arc<dyn Navigator>,
    clicks: ClickCounter,
    options: SequencerOptions,
}

impl RedirectSequencer {
    pub fn new(
        store: Arc<LinkStore>,
        baseline: Arc<dyn BaselineSource>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            clicks: ClickCounter::new(store.clone()),
            store,
            baseline,
            analytics: NoopAnalytics::arc(),
            navigator,
            options: SequencerOptions::default(),
        }
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn with_options(mut self, options: SequencerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SequencerOptions {
        &self.options
    }

    /// Load settings, read the address, fetch the baseline (tolerating
    /// absence) and merge it with the local store.
    #[instrument(skip_all, fields(address = %address))]
    pub async fn bootstrap(&self, address: &str) -> Bootstrapped {
        let settings = self.store.load_settings();
        let context = AddressContext::parse(address, self.options.fragment_delimiter);

        let baseline = fetch_baseline(self.baseline.as_ref(), self.options.baseline_timeout).await;
        let local = self.store.load_links();
        let snapshot: Arc<[LinkRecord]> = merge(&baseline, &local).into();

        debug!(
            "Bootstrap complete: {} baseline + {} local -> {} records",
            baseline.len(),
            local.len(),
            snapshot.len()
        );

        Bootstrapped {
            context,
            settings,
            snapshot,
        }
    }

    /// Pick the terminal state for a bootstrapped run. No side effects.
    ///
    /// A fragment that cannot be decoded fails closed into `NotFound`.
    pub fn decide(&self, boot: &Bootstrapped) -> SequenceState {
        if !boot.context.has_fragment() {
            return SequenceState::Dashboard(DashboardView {
                links: boot.snapshot.clone(),
                settings: boot.settings.clone(),
                base_url: boot.context.base_url().map(str::to_string),
            });
        }

        let fragment = boot.context.fragment();
        match resolve(fragment, &boot.snapshot) {
            Ok(Some(record)) => SequenceState::Redirecting {
                target: record.original_url.clone(),
                record: record.clone(),
            },
            Ok(None) => {
                debug!("No link for fragment '{}'", fragment);
                SequenceState::NotFound {
                    fragment: fragment.to_string(),
                }
            }
            Err(e) => {
                debug!("{}", e);
                SequenceState::NotFound {
                    fragment: fragment.to_string(),
                }
            }
        }
    }

    /// Entry side effects of `Redirecting`: count the click and notify
    /// analytics. Other states have none. Returns whether anything ran.
    pub fn begin_redirect(&self, state: &SequenceState) -> bool {
        let SequenceState::Redirecting { record, target } = state else {
            return false;
        };

        self.clicks.record(&record.id);
        analytics::dispatch(
            self.analytics.clone(),
            REDIRECT_EVENT,
            record.slug.clone(),
            target.clone(),
        );
        true
    }

    /// Replace the current address with the redirect target.
    pub fn finish_redirect(&self, state: &SequenceState) -> bool {
        let SequenceState::Redirecting { record, target } = state else {
            return false;
        };

        info!("Redirecting '{}' -> {}", record.slug, target);
        self.navigator.replace(target);
        true
    }

    /// Run the side effects of a terminal state: enter, wait the fixed
    /// delay, navigate. `still_current` is consulted before entering and
    /// again before navigating; an abandoned run stops there.
    ///
    /// Returns whether navigation happened.
    pub async fn complete<F>(&self, state: &SequenceState, still_current: F) -> bool
    where
        F: Fn() -> bool,
    {
        if !still_current() {
            trace!("Run abandoned before redirect side effects");
            return false;
        }
        if !self.begin_redirect(state) {
            return false;
        }

        tokio::time::sleep(self.options.redirect_delay).await;

        if !still_current() {
            trace!("Run abandoned during redirect delay");
            return false;
        }
        self.finish_redirect(state)
    }

    /// One full sequence for `address`.
    pub async fn run(&self, address: &str) -> SequenceState {
        let boot = self.bootstrap(address).await;
        let state = self.decide(&boot);
        self.complete(&state, || true).await;
        state
    }
}

/// Drives [`RedirectSequencer`] runs and publishes the current state.
///
/// Starting a run bumps the generation under `gate`; a run only publishes
/// state or performs side effects while holding `gate` and still owning the
/// current generation, so a superseded run can never act after the bump.
pub struct SequenceDriver {
    sequencer: Arc<RedirectSequencer>,
    state_tx: Arc<watch::Sender<SequenceState>>,
    generation: Arc<AtomicU64>,
    gate: Arc<Mutex<()>>,
    inflight: Mutex<Option<AbortHandle>>,
    last_fragment: Mutex<Option<String>>,
}

impl SequenceDriver {
    pub fn new(sequencer: Arc<RedirectSequencer>) -> Self {
        let (tx, _) = watch::channel(SequenceState::Bootstrap);
        Self {
            sequencer,
            state_tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            gate: Arc::new(Mutex::new(())),
            inflight: Mutex::new(None),
            last_fragment: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SequenceState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> SequenceState {
        self.state_tx.borrow().clone()
    }

    /// Abandon whatever is in flight and start over from `Bootstrap`.
    pub fn navigate(&self, address: impl Into<String>) -> JoinHandle<()> {
        let address = address.into();
        let context = AddressContext::parse(&address, self.sequencer.options().fragment_delimiter);
        *self.last_fragment.lock() = Some(context.fragment().to_string());

        let generation = {
            let _gate = self.gate.lock();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        if let Some(previous) = self.inflight.lock().take() {
            trace!("Aborting sequence run #{}", generation - 1);
            previous.abort();
        }

        let sequencer = self.sequencer.clone();
        let tx = self.state_tx.clone();
        let current = self.generation.clone();
        let gate = self.gate.clone();

        let handle = tokio::spawn(async move {
            let is_current = || current.load(Ordering::SeqCst) == generation;

            {
                let _gate = gate.lock();
                if !is_current() {
                    return;
                }
                tx.send_replace(SequenceState::Bootstrap);
            }

            let boot = sequencer.bootstrap(&address).await;
            let state = sequencer.decide(&boot);

            let redirecting = {
                let _gate = gate.lock();
                if !is_current() {
                    trace!("Discarding stale bootstrap for run #{}", generation);
                    return;
                }
                debug!("Run #{} entered {}", generation, state.name());
                tx.send_replace(state.clone());
                sequencer.begin_redirect(&state)
            };
            if !redirecting {
                return;
            }

            tokio::time::sleep(sequencer.options().redirect_delay).await;

            {
                let _gate = gate.lock();
                if is_current() {
                    sequencer.finish_redirect(&state);
                } else {
                    trace!("Run #{} abandoned during redirect delay", generation);
                }
            }
        });

        *self.inflight.lock() = Some(handle.abort_handle());
        handle
    }

    /// Restart only if the fragment differs from the last run's.
    pub fn address_changed(&self, address: impl Into<String>) -> Option<JoinHandle<()>> {
        let address = address.into();
        let context = AddressContext::parse(&address, self.sequencer.options().fragment_delimiter);

        if self.last_fragment.lock().as_deref() == Some(context.fragment()) {
            trace!("Fragment unchanged, keeping current run");
            return None;
        }
        Some(self.navigate(address))
    }
}
