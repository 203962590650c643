//! Strategies: untrusted decision code plugged into seats.
//!
//! A [`Strategy`] sees only a [`PublicView`] and its own [`PrivateView`] and returns an
//! [`Action`]. Whatever it does (return an error, panic, hang) the
//! [`StrategyHookInvoker`] turns into a [`FaultKind`] so the engine can substitute a
//! safe action and keep the hand going.

use crate::cards::Card;
use crate::player::PlayerId;
use crate::showdown::{Payout, ShownHand};
use crate::state::{HistoryEntry, PrivateView, PublicView, Round};
use crate::validator::{Action, ActionError, NormalizedAction};
use core::fmt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

pub type StrategyError = Box<dyn std::error::Error + Send + Sync>;

/// The decision contract.
pub trait Strategy: Send {
    fn decide(
        &mut self,
        public: &PublicView,
        private: &PrivateView,
    ) -> Result<Action, StrategyError>;

    /// Called once after every hand the strategy was seated for.
    fn observe(&mut self, _summary: &HandSummary) {}
}

impl<F> Strategy for F
where
    F: FnMut(&PublicView, &PrivateView) -> Result<Action, StrategyError> + Send,
{
    fn decide(
        &mut self,
        public: &PublicView,
        private: &PrivateView,
    ) -> Result<Action, StrategyError> {
        self(public, private)
    }
}

mod bots;

pub use bots::{BotProfile, BotStrategy, CallingStation};

/// Public outcome of a finished hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandSummary {
    pub hand_number: u32,
    /// Seating for the hand, by player id.
    pub seats: Vec<PlayerId>,
    pub board: Vec<Card>,
    pub payouts: Vec<Payout>,
    pub history: Vec<HistoryEntry>,
    /// Hands turned face up at showdown; empty when the pot went uncontested.
    pub showdown: Vec<ShownHand>,
}

/// A registered strategy. Cloning shares the same underlying strategy.
#[derive(Clone)]
pub struct StrategyHandle {
    name: String,
    inner: Arc<Mutex<Box<dyn Strategy>>>,
    // Set while a decision is outstanding, including one abandoned after a timeout.
    busy: Arc<AtomicBool>,
}

impl fmt::Debug for StrategyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyHandle")
            .field("name", &self.name)
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl StrategyHandle {
    pub fn new(name: impl Into<String>, strategy: impl Strategy + 'static) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(Box::new(strategy))),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A previous decision is still running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FaultKind {
    #[error("strategy failed: {0}")]
    Failed(String),
    #[error("strategy panicked: {0}")]
    Panicked(String),
    #[error("strategy timed out")]
    TimedOut,
    #[error("strategy is still busy with an earlier decision")]
    Unresponsive,
    #[error("illegal action: {0}")]
    Rejected(ActionError),
}

/// A strategy misbehaved; the engine played `substituted` on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct StrategyFault {
    pub seat: usize,
    pub player: PlayerId,
    pub round: Round,
    pub kind: FaultKind,
    pub substituted: NormalizedAction,
}

/// Calls strategies and contains their failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyHookInvoker {
    timeout: Option<Duration>,
}

impl StrategyHookInvoker {
    /// `None` runs decisions inline on the caller's thread.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn invoke(
        &self,
        handle: &StrategyHandle,
        public: PublicView,
        private: PrivateView,
    ) -> Result<Action, FaultKind> {
        if handle.busy.swap(true, Ordering::AcqRel) {
            return Err(FaultKind::Unresponsive);
        }
        let Some(timeout) = self.timeout else {
            let result = decide(&handle.inner, &public, &private);
            handle.busy.store(false, Ordering::Release);
            return result;
        };

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&handle.inner);
        let busy = Arc::clone(&handle.busy);
        let spawned = thread::Builder::new().name(format!("strategy-{}", handle.name)).spawn(
            move || {
                let result = decide(&inner, &public, &private);
                busy.store(false, Ordering::Release);
                // The receiver is gone if the engine stopped waiting.
                let _ = tx.send(result);
            },
        );
        if let Err(e) = spawned {
            handle.busy.store(false, Ordering::Release);
            return Err(FaultKind::Failed(format!("could not start decision thread: {e}")));
        }
        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(FaultKind::TimedOut),
            Err(RecvTimeoutError::Disconnected) => {
                Err(FaultKind::Panicked("decision thread exited without an answer".into()))
            }
        }
    }

    /// Deliver a hand summary. Busy or panicking strategies are skipped.
    pub fn notify(&self, handle: &StrategyHandle, summary: &HandSummary) {
        if handle.busy.swap(true, Ordering::AcqRel) {
            log::warn!("skipping hand summary for busy strategy {}", handle.name);
            return;
        }
        let mut guard = handle.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| guard.observe(summary))) {
            let message = panic_message(&*payload);
            log::warn!("strategy {} panicked in observe: {message}", handle.name);
        }
        drop(guard);
        handle.busy.store(false, Ordering::Release);
    }
}

fn decide(
    inner: &Mutex<Box<dyn Strategy>>,
    public: &PublicView,
    private: &PrivateView,
) -> Result<Action, FaultKind> {
    let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
    match panic::catch_unwind(AssertUnwindSafe(|| guard.decide(public, private))) {
        Ok(Ok(action)) => Ok(action),
        Ok(Err(e)) => Err(FaultKind::Failed(e.to_string())),
        Err(payload) => Err(FaultKind::Panicked(panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
