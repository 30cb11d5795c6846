//! Inter-window signaling between frontend windows.
//!
//! Two independent slots live in application state:
//! * a one-shot parameter blob: `set` overwrites, `take` consumes;
//! * a pending "open window" request: `raise` sets it, `take_open_request`
//!   reads and clears it, `reset` clears it without reading.
//!
//! Last writer wins and each value is observed by at most one reader.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct WindowSignals {
    args: Mutex<Option<Value>>,
    open_requested: AtomicBool,
}

impl WindowSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a parameter blob, replacing any unread one
    pub fn set_args(&self, args: Value) {
        let replaced = self.args.lock().replace(args).is_some();
        if replaced {
            log::debug!("[WINDOW] Unread window args overwritten");
        }
    }

    /// Hand out the stored blob once
    pub fn take_args(&self) -> Option<Value> {
        self.args.lock().take()
    }

    pub fn raise_open_request(&self) {
        self.open_requested.store(true, Ordering::SeqCst);
    }

    /// Whether an open request was pending; clears it
    pub fn take_open_request(&self) -> bool {
        self.open_requested.swap(false, Ordering::SeqCst)
    }

    pub fn reset_open_request(&self) {
        self.open_requested.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_args_are_consumed_once() {
        let signals = WindowSignals::new();
        assert_eq!(signals.take_args(), None);

        signals.set_args(json!({"file": 1}));
        signals.set_args(json!({"file": 2}));
        assert_eq!(signals.take_args(), Some(json!({"file": 2})));
        assert_eq!(signals.take_args(), None);
    }

    #[test]
    fn test_open_request_check_clears() {
        let signals = WindowSignals::new();
        assert!(!signals.take_open_request());

        signals.raise_open_request();
        signals.raise_open_request();
        assert!(signals.take_open_request());
        assert!(!signals.take_open_request());

        signals.raise_open_request();
        signals.reset_open_request();
        assert!(!signals.take_open_request());
    }

    #[test]
    fn test_one_reader_sees_each_value() {
        let signals = Arc::new(WindowSignals::new());
        signals.set_args(json!("payload"));
        signals.raise_open_request();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let signals = Arc::clone(&signals);
                std::thread::spawn(move || {
                    (signals.take_args().is_some(), signals.take_open_request())
                })
            })
            .collect();

        let results: Vec<(bool, bool)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|(args, _)| *args).count(), 1);
        assert_eq!(results.iter().filter(|(_, open)| *open).count(), 1);
    }
}
