//! Cycle-breaking lazy resolution cells.
//!
//! Base-type and interface-list edges of a named type are produced lazily: the
//! binder (or the construction machinery) installs a thunk that is run on first
//! access, and the result is published exactly once. Type graphs can be
//! self-referential (a base-interface list mentioning the type being resolved,
//! interfaces referencing each other), so the cell detects re-entrant access on
//! the resolving thread and answers with a designated sentinel value instead of
//! recursing. Other threads arriving while resolution is in progress wait for
//! the published value.
//!
//! The published value is write-once: after the thunk completes, every reader
//! observes the same value for the lifetime of the cell, and a cycle sentinel
//! handed out mid-resolution is never cached.

use std::sync::{Mutex, OnceLock};
use std::thread::{self, ThreadId};

/// A thunk producing the cell's value on first access.
type Thunk<T> = Box<dyn FnOnce() -> T + Send>;

enum ThunkState<T> {
    /// No thunk was ever installed; reads observe the cycle sentinel.
    Unset,
    /// Thunk installed, not yet run.
    Pending(Thunk<T>),
    /// Thunk currently running on the recorded thread.
    InProgress(ThreadId),
    /// Value published into the `OnceLock`.
    Done,
}

/// A write-once lazily resolved cell with cycle breaking.
///
/// The cell holds a sentinel value that is returned on re-entrant access while
/// the resolving thunk is still running on the current thread. Once the thunk
/// completes, the resolved value is published and all subsequent reads observe
/// it.
pub struct LazyCell<T: Clone> {
    value: OnceLock<T>,
    state: Mutex<ThunkState<T>>,
    sentinel: T,
}

impl<T: Clone> LazyCell<T> {
    /// Creates a cell already holding `value`; no thunk will ever run.
    pub fn ready(value: T) -> Self
    where
        T: Default,
    {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            value: cell,
            state: Mutex::new(ThunkState::Done),
            sentinel: T::default(),
        }
    }

    /// Creates a cell holding `value` with an explicit cycle `sentinel`.
    ///
    /// The sentinel is unused for an already resolved cell but keeps the cell
    /// uniform with [`LazyCell::suspended`] when no `Default` exists for `T`.
    pub fn ready_with(value: T, sentinel: T) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            value: cell,
            state: Mutex::new(ThunkState::Done),
            sentinel,
        }
    }

    /// Creates a cell that resolves through `thunk` on first access.
    ///
    /// `sentinel` is the value observed by re-entrant reads while the thunk is
    /// running (cycle in the type graph) and by reads of a cell whose thunk was
    /// never installed.
    pub fn suspended(sentinel: T, thunk: impl FnOnce() -> T + Send + 'static) -> Self {
        Self {
            value: OnceLock::new(),
            state: Mutex::new(ThunkState::Pending(Box::new(thunk))),
            sentinel,
        }
    }

    /// Creates an empty cell that always observes the sentinel.
    pub fn unset(sentinel: T) -> Self {
        Self {
            value: OnceLock::new(),
            state: Mutex::new(ThunkState::Unset),
            sentinel,
        }
    }

    /// Returns the resolved value, running the thunk if necessary.
    ///
    /// Re-entrant access from the resolving thread returns the cycle sentinel
    /// without caching it; concurrent access from other threads waits for the
    /// published value.
    pub fn get(&self) -> T {
        if let Some(value) = self.value.get() {
            return value.clone();
        }

        loop {
            let mut state = match self.state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };

            match std::mem::replace(&mut *state, ThunkState::Done) {
                ThunkState::Pending(thunk) => {
                    *state = ThunkState::InProgress(thread::current().id());
                    drop(state);

                    let resolved = thunk();
                    let _ = self.value.set(resolved);

                    let mut state = match self.state.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    *state = ThunkState::Done;
                    drop(state);

                    // The OnceLock is populated at this point; first write wins.
                    return self
                        .value
                        .get()
                        .cloned()
                        .unwrap_or_else(|| self.sentinel.clone());
                }
                ThunkState::InProgress(owner) => {
                    *state = ThunkState::InProgress(owner);
                    drop(state);

                    if owner == thread::current().id() {
                        // Re-entered while resolving: cyclic type graph.
                        return self.sentinel.clone();
                    }

                    // Another thread is resolving; wait for publication.
                    thread::yield_now();
                    if let Some(value) = self.value.get() {
                        return value.clone();
                    }
                }
                ThunkState::Unset => {
                    *state = ThunkState::Unset;
                    return self.sentinel.clone();
                }
                ThunkState::Done => {
                    drop(state);
                    if let Some(value) = self.value.get() {
                        return value.clone();
                    }
                    // Done without a value can only be observed transiently
                    // between the OnceLock write and the state update; retry.
                    thread::yield_now();
                }
            }
        }
    }

    /// Returns the value if already resolved, without running the thunk.
    pub fn peek(&self) -> Option<&T> {
        self.value.get()
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for LazyCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value.get() {
            Some(value) => f.debug_tuple("LazyCell").field(value).finish(),
            None => f.write_str("LazyCell(<unresolved>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_ready_cell() {
        let cell = LazyCell::ready(42);
        assert_eq!(cell.get(), 42);
        assert_eq!(cell.peek(), Some(&42));
    }

    #[test]
    fn test_suspended_resolves_once() {
        let cell = LazyCell::suspended(0, || 7);
        assert_eq!(cell.peek(), None);
        assert_eq!(cell.get(), 7);
        assert_eq!(cell.get(), 7);
    }

    #[test]
    fn test_unset_returns_sentinel() {
        let cell: LazyCell<i32> = LazyCell::unset(-1);
        assert_eq!(cell.get(), -1);
        assert_eq!(cell.peek(), None);
    }

    #[test]
    fn test_reentrant_access_returns_sentinel() {
        let cell: Arc<LazyCell<i32>> = Arc::new_cyclic(|weak| {
            let weak = weak.clone();
            LazyCell::suspended(-1, move || {
                // Simulates a cyclic base-type lookup re-entering the cell.
                let inner = weak.upgrade().map(|cell: Arc<LazyCell<i32>>| cell.get());
                assert_eq!(inner, Some(-1));
                99
            })
        });

        assert_eq!(cell.get(), 99);
        assert_eq!(cell.get(), 99);
    }

    #[test]
    fn test_concurrent_readers_observe_same_value() {
        let cell = Arc::new(LazyCell::suspended(0, || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            1234
        }));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let shared = Arc::clone(&cell);
            handles.push(std::thread::spawn(move || shared.get()));
        }

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1234);
        }
    }
}
