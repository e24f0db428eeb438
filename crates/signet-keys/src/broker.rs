//! Background key brokering.
//!
//! A [`KeyBroker`] owns one background task that keeps a cached key fresh:
//! it re-resolves its [`SourceChain`] once per poll interval, or earlier
//! when a caller requests a renewal, and publishes the parsed material for
//! lock-protected concurrent reads. Request paths only ever take a value
//! copy of the cache; source I/O never happens on them.
//!
//! # Lifecycle
//!
//! ```text
//! Created ──run()──▶ Running ──close()──▶ Cancelled (terminal)
//!    │                  │
//!    │ renew(): queued  │ renew(): wakes the loop, duplicates coalesce
//!    ▼                  ▼
//!  no resolution    resolve on start, every tick, and on renewal
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::chain::SourceChain;
use crate::config::BrokerConfig;
use crate::material::{BrokeredKey, SigningKey, VerificationKey};

/// A broker publishing verification (public) key material.
pub type VerificationKeyBroker = KeyBroker<VerificationKey>;

/// A broker publishing signing (private) key material.
pub type SigningKeyBroker = KeyBroker<SigningKey>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrokerState {
    Created,
    Running,
    Cancelled,
}

/// Keeps one cached key fresh by polling a [`SourceChain`] in the
/// background and serving value copies to concurrent readers.
///
/// Wrap the broker in an [`Arc`] to share it across tasks; all methods
/// take `&self`. [`close`](KeyBroker::close) is terminal and must be
/// called at most once per broker; avoiding a concurrent double-close is
/// the caller's obligation.
pub struct KeyBroker<K: BrokeredKey> {
    shared: Arc<Shared<K>>,
}

struct Shared<K> {
    chain: SourceChain,
    interval: Duration,
    state: Mutex<BrokerState>,
    current: Mutex<K>,
    resolved: AtomicBool,
    /// Single-slot renewal signal: set by `renew`, consumed by the loop.
    renew_pending: AtomicBool,
    wake: Notify,
}

impl<K> Shared<K> {
    fn cancelled(&self) -> bool {
        *self.state.lock() == BrokerState::Cancelled
    }
}

impl<K: BrokeredKey> KeyBroker<K> {
    /// Create a broker polling `chain` every `interval`.
    ///
    /// The cache starts out holding the placeholder; nothing is resolved
    /// until [`run`](KeyBroker::run) is called.
    #[must_use]
    pub fn new(chain: SourceChain, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                chain,
                interval,
                state: Mutex::new(BrokerState::Created),
                current: Mutex::new(K::placeholder()),
                resolved: AtomicBool::new(false),
                renew_pending: AtomicBool::new(false),
                wake: Notify::new(),
            }),
        }
    }

    /// Create a broker from a [`BrokerConfig`].
    #[must_use]
    pub fn from_config(config: &BrokerConfig) -> Self {
        Self::new(config.source_chain(), config.poll_interval())
    }

    /// Start the background resolution task.
    ///
    /// The first resolution is attempted immediately, then once per poll
    /// interval or earlier when a renewal is requested. Calling this on a
    /// broker that is already running or closed logs a warning and does
    /// nothing.
    pub fn run(&self) {
        {
            let mut state = self.shared.state.lock();
            if *state != BrokerState::Created {
                tracing::warn!(role = K::ROLE, state = ?*state, "key broker already started, run ignored");
                return;
            }
            *state = BrokerState::Running;
        }

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { resolution_loop(shared).await });
        tracing::info!(role = K::ROLE, interval = ?self.shared.interval, "key broker started");
    }

    /// Request an out-of-cycle resolution.
    ///
    /// Non-blocking and safe from any number of concurrent callers: the
    /// pending slot holds at most one renewal, so duplicate requests
    /// coalesce. Requests made before [`run`](KeyBroker::run) are queued
    /// until the loop starts; requests after [`close`](KeyBroker::close)
    /// are silently ignored.
    pub fn renew(&self) {
        if self.shared.cancelled() {
            return;
        }
        if !self.shared.renew_pending.swap(true, Ordering::AcqRel) {
            self.shared.wake.notify_one();
        }
    }

    /// Value copy of the currently cached key.
    ///
    /// Before the first successful resolution this is the placeholder,
    /// under which verification always fails closed. Readers never
    /// observe a partially updated key and never receive an error.
    #[must_use]
    pub fn copy(&self) -> K {
        self.shared.current.lock().clone()
    }

    /// Liveness probe: human-readable status lines and a readiness flag.
    #[must_use]
    pub fn check(&self) -> (Vec<String>, bool) {
        let state = *self.shared.state.lock();
        match state {
            BrokerState::Created => (vec![format!("{} key broker is not running", K::ROLE)], false),
            BrokerState::Cancelled => (vec![format!("{} key broker is closed", K::ROLE)], false),
            BrokerState::Running => {
                if self.shared.resolved.load(Ordering::Acquire) {
                    let bytes = self.shared.current.lock().byte_len();
                    (
                        vec![format!("{} key broker holds a key ({bytes} bytes)", K::ROLE)],
                        true,
                    )
                } else {
                    (
                        vec![format!("{} key broker has not resolved a key yet", K::ROLE)],
                        false,
                    )
                }
            }
        }
    }

    /// Stop the background task and mark the broker cancelled.
    ///
    /// Terminal: later [`renew`](KeyBroker::renew) calls become no-ops. An
    /// in-flight resolution is allowed to complete and its result is
    /// discarded.
    pub fn close(&self) {
        {
            let mut state = self.shared.state.lock();
            if *state == BrokerState::Cancelled {
                return;
            }
            *state = BrokerState::Cancelled;
        }
        self.shared.wake.notify_one();
        tracing::info!(role = K::ROLE, "key broker closed");
    }
}

async fn resolution_loop<K: BrokeredKey>(shared: Arc<Shared<K>>) {
    let mut ticker = tokio::time::interval(shared.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = shared.wake.notified() => {}
        }
        if shared.cancelled() {
            break;
        }
        // Consume a pending renewal, if any; the resolution that follows
        // serves ticks and renewals alike. A failed attempt is retried by
        // the next tick because polling continues regardless.
        shared.renew_pending.store(false, Ordering::Release);
        resolve_once(&shared).await;
    }

    tracing::debug!(role = K::ROLE, "resolution loop stopped");
}

async fn resolve_once<K: BrokeredKey>(shared: &Shared<K>) {
    let bytes = match shared.chain.get().await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(role = K::ROLE, %error, "key resolution failed, retrying on the next tick");
            return;
        }
    };

    match K::from_pem(&bytes) {
        Ok(key) => {
            // A close may have raced the fetch; discard the result then.
            if shared.cancelled() {
                return;
            }
            let size = key.byte_len();
            let fingerprint = key.fingerprint().to_string();
            *shared.current.lock() = key;
            shared.resolved.store(true, Ordering::Release);
            tracing::debug!(role = K::ROLE, bytes = size, %fingerprint, "published fresh key material");
        }
        Err(error) => {
            tracing::warn!(role = K::ROLE, %error, "resolved bytes are not usable key material");
        }
    }
}
