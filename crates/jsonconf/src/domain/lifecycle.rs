//! Lifecycle notifications for a single config instance.
//!
//! Five hook points bracket the orchestration.  Listeners are plain closures
//! registered on a [`Lifecycle`]; they run synchronously, on the caller's
//! thread, in subscription order, once per event.  There is no global bus:
//! a lifecycle belongs to exactly one instance.
//!
//! ```text
//! load ─┬─ read ──▶ Reading ─┐
//!       └─ create ▶ Creating ─┴─▶ Loaded
//!
//! save ──▶ Saving ──▶ (write) ──▶ Saved
//! ```

use std::fmt;

/// The five lifecycle hook points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// A read deserialized the file into a new instance.
    Reading,
    /// A default instance was constructed (before any immediate save).
    Creating,
    /// A load produced an instance, by either branch.
    Loaded,
    /// A save is about to serialize and write.
    Saving,
    /// A save finished writing.
    Saved,
}

/// Handle returned by [`Lifecycle::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn FnMut(LifecycleEvent, &mut T) + Send>;

/// Ordered set of listeners for one config instance.
pub struct Lifecycle<T> {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener<T>)>,
}

impl<T> Lifecycle<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Registers `listener`; it fires after every listener registered before
    /// it.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(LifecycleEvent, &mut T) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Builder form of [`Lifecycle::subscribe`] for passing a lifecycle into
    /// a load call.
    pub fn with<F>(mut self, listener: F) -> Self
    where
        F: FnMut(LifecycleEvent, &mut T) + Send + 'static,
    {
        self.subscribe(listener);
        self
    }

    /// Removes the listener, returning whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn emit(&mut self, event: LifecycleEvent, payload: &mut T) {
        for (_, listener) in &mut self.listeners {
            listener(event, payload);
        }
    }
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Lifecycle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
