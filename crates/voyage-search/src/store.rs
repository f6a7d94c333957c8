//! Query-state store: where the current query string lives.
//!
//! In a browser this is the address bar; the engine only needs get, set
//! and a change subscription, so any navigation layer can sit behind it.

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::params::QueryParams;

/// How a write is recorded in navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// New history entry; "back" returns to the previous query
    Push,
    /// Overwrite the current entry
    Replace,
}

pub trait QueryStore: Send + Sync + 'static {
    fn get(&self) -> QueryParams;

    fn set(&self, params: QueryParams, mode: HistoryMode);

    /// Receiver that observes every subsequent write.
    fn subscribe(&self) -> watch::Receiver<QueryParams>;
}

/// In-memory store with a back stack.
#[derive(Debug)]
pub struct MemoryQueryStore {
    current: watch::Sender<QueryParams>,
    back_stack: Mutex<Vec<QueryParams>>,
}

impl MemoryQueryStore {
    pub fn new(initial: QueryParams) -> Self {
        let (current, _) = watch::channel(initial);
        Self {
            current,
            back_stack: Mutex::new(Vec::new()),
        }
    }

    /// Seed from a query string such as `?name=park&page=2`.
    pub fn from_query(query: &str) -> Self {
        Self::new(QueryParams::parse(query))
    }

    /// Navigate back one entry. Returns false when there is no history.
    pub fn back(&self) -> bool {
        let previous = self.back_stack.lock().pop();
        match previous {
            Some(params) => {
                self.current.send_replace(params);
                true
            }
            None => false,
        }
    }

    pub fn history_len(&self) -> usize {
        self.back_stack.lock().len()
    }
}

impl Default for MemoryQueryStore {
    fn default() -> Self {
        Self::new(QueryParams::new())
    }
}

impl QueryStore for MemoryQueryStore {
    fn get(&self) -> QueryParams {
        self.current.borrow().clone()
    }

    fn set(&self, params: QueryParams, mode: HistoryMode) {
        let previous = self.current.send_replace(params);
        if mode == HistoryMode::Push {
            self.back_stack.lock().push(previous);
        }
    }

    fn subscribe(&self) -> watch::Receiver<QueryParams> {
        self.current.subscribe()
    }
}
