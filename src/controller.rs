use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

use crate::prompts::Feature;

/// What a page currently shows for its model-backed content
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// How a single load ended, from the controller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load was issued before this one resolved
    Superseded,
    /// The owning view was torn down before this one resolved
    Unmounted,
}

/// Owns the loading/success/error state of one view.
///
/// Results are applied only while the view is mounted and only for the most
/// recently issued load. Requests themselves are never cancelled.
pub struct ViewController<T> {
    feature: Feature,
    error_message: &'static str,
    state: watch::Sender<ViewState<T>>,
    mounted: AtomicBool,
    issued: AtomicU64,
}

impl<T: Clone + Send + Sync> ViewController<T> {
    pub fn new(feature: Feature, error_message: &'static str) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            feature,
            error_message,
            state,
            mounted: AtomicBool::new(true),
            issued: AtomicU64::new(0),
        }
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn error_message(&self) -> &'static str {
        self.error_message
    }

    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Ticket of the most recently issued load (0 before the first)
    pub fn current_ticket(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Tear the view down. Later completions leave the state untouched.
    pub fn unmount(&self) {
        self.state.send_if_modified(|_| {
            self.mounted.store(false, Ordering::SeqCst);
            false
        });
        tracing::debug!(feature = %self.feature, "View unmounted");
    }

    /// Drive one request through the state machine
    pub async fn load<F, E>(&self, fut: F) -> LoadOutcome
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let Some(ticket) = self.begin() else {
            return LoadOutcome::Unmounted;
        };
        let res = fut.await;
        self.finish(ticket, res)
    }

    fn begin(&self) -> Option<u64> {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            if !self.mounted.load(Ordering::SeqCst) {
                return false;
            }
            ticket = Some(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
            *state = ViewState::Loading;
            true
        });
        ticket
    }

    fn finish<E: Display>(&self, ticket: u64, res: Result<T, E>) -> LoadOutcome {
        if let Err(e) = &res {
            tracing::error!(feature = %self.feature, ticket, error = %e, "View load failed");
        }

        let mut outcome = LoadOutcome::Applied;
        self.state.send_if_modified(|state| {
            if !self.mounted.load(Ordering::SeqCst) {
                outcome = LoadOutcome::Unmounted;
                return false;
            }
            if self.issued.load(Ordering::SeqCst) != ticket {
                outcome = LoadOutcome::Superseded;
                return false;
            }
            *state = match res {
                Ok(data) => ViewState::Success(data),
                Err(_) => {
                    outcome = LoadOutcome::Failed;
                    ViewState::Error(self.error_message.to_string())
                }
            };
            true
        });

        if matches!(outcome, LoadOutcome::Superseded | LoadOutcome::Unmounted) {
            tracing::debug!(feature = %self.feature, ticket, ?outcome, "Discarding load result");
        }
        outcome
    }
}
