//! Observable state cells
//!
//! This module provides the reactive container the session state is built
//! from. A [`Cell`] holds a single value that any number of observers can
//! watch: a subscriber's callback runs immediately with the current value
//! and again, synchronously, after every write.
//!
//! # Synchronous fan-out
//!
//! Writes notify observers before `write` returns. A write with no
//! observers is just a value replacement. Notification fires on every
//! write, including writes that leave the value equal to what it was;
//! equality is never checked.
//!
//! # Example
//!
//! ```
//! use libdriftnote::cell::Cell;
//!
//! let cell = Cell::new(0u32);
//! let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
//!
//! let sink = seen.clone();
//! let subscription = cell.subscribe(move |value| sink.lock().unwrap().push(*value));
//!
//! cell.write(1);
//! cell.write(2);
//! drop(subscription);
//! cell.write(3);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Callback<T> = Box<dyn FnMut(&T) + Send>;

struct Observer<T> {
    id: u64,
    callback: Callback<T>,
}

struct Shared<T> {
    value: Mutex<T>,
    observers: Mutex<Vec<Observer<T>>>,
    // Unsubscriptions that could not be applied in place (the observer was
    // in flight in a notification pass); drained on the next pass.
    dead: Mutex<Vec<u64>>,
    next_id: AtomicU64,
}

/// A shared, observable value container.
///
/// Handles are cheap to clone and share the same underlying state. The
/// container is `Send + Sync` so an application can hold handles wherever
/// it likes; the intended usage model is still a single logical writer.
pub struct Cell<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("value", &*self.shared.value.lock().unwrap())
            .finish()
    }
}

impl<T: Clone + Send + 'static> Cell<T> {
    /// Create a cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: Mutex::new(value),
                observers: Mutex::new(Vec::new()),
                dead: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// A clone of the current value.
    pub fn read(&self) -> T {
        self.shared.value.lock().unwrap().clone()
    }

    /// Replace the value, then synchronously notify every observer.
    pub fn write(&self, value: T) {
        *self.shared.value.lock().unwrap() = value.clone();
        self.notify(&value);
    }

    /// Register an observer.
    ///
    /// The callback runs immediately with the current value, then after
    /// every subsequent write. Dropping the returned [`Subscription`] (or
    /// calling [`Subscription::unsubscribe`]) removes the observer;
    /// unsubscribing from inside a notification pass takes effect by the
    /// next pass at the latest. Subscribing from inside a callback is
    /// legal; the new observer starts with the next write.
    pub fn subscribe(&self, mut callback: impl FnMut(&T) + Send + 'static) -> Subscription {
        callback(&self.read());

        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared
            .observers
            .lock()
            .unwrap()
            .push(Observer {
                id,
                callback: Box::new(callback),
            });

        let shared = Arc::downgrade(&self.shared);
        Subscription {
            cancel: Some(Box::new(move || Shared::remove_observer(&shared, id))),
        }
    }

    /// The number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.observers.lock().unwrap().len()
    }

    fn notify(&self, value: &T) {
        // Take the observer list out so a callback may subscribe or
        // unsubscribe on this same cell without deadlocking.
        let mut in_flight = std::mem::take(&mut *self.shared.observers.lock().unwrap());
        in_flight.retain_mut(|observer| {
            if self.shared.dead.lock().unwrap().contains(&observer.id) {
                return false;
            }
            (observer.callback)(value);
            true
        });

        // Merge back behind observers added during the pass, then apply any
        // unsubscriptions recorded while we ran.
        let mut observers = self.shared.observers.lock().unwrap();
        in_flight.append(&mut observers);
        *observers = in_flight;

        let dead = std::mem::take(&mut *self.shared.dead.lock().unwrap());
        if !dead.is_empty() {
            observers.retain(|observer| !dead.contains(&observer.id));
        }
    }
}

impl<T> Shared<T> {
    fn remove_observer(shared: &Weak<Shared<T>>, id: u64) {
        let Some(shared) = shared.upgrade() else {
            return;
        };

        // The observer may be in flight in a notification pass rather than
        // in the list; record the id so the pass drops it on merge.
        let mut removed = false;
        if let Ok(mut observers) = shared.observers.try_lock() {
            let before = observers.len();
            observers.retain(|observer| observer.id != id);
            removed = observers.len() != before;
        }
        if !removed {
            shared.dead.lock().unwrap().push(id);
        }
    }
}

/// Handle returned by [`Cell::subscribe`]; the observer stays registered
/// for as long as the handle lives.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Remove the observer now instead of at drop time.
    pub fn unsubscribe(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
