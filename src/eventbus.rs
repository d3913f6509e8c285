use std::collections::BTreeMap;

use crate::event::{DebuggerEvent, EventKind};

/// Trait for reacting to debugger notices.
pub trait EventListener: Send {
    fn on_event(&mut self, event: &DebuggerEvent);
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    Kind(EventKind),
    Custom(fn(&DebuggerEvent) -> bool),
}

impl EventFilter {
    fn accepts(&self, event: &DebuggerEvent) -> bool {
        match *self {
            EventFilter::All => true,
            EventFilter::Kind(kind) => event.kind() == kind,
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Disposer token returned by [`EventBus::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Metadata-wrapped listener with filters and control flags.
struct ListenerEntry {
    listener: Box<dyn EventListener>,
    enabled: bool,
    filter: EventFilter,
    /// Only events about this pad (events with no pad are dropped too).
    pad: Option<u32>,
}

/// Fan-out of [`DebuggerEvent`]s to registered listeners, in registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: BTreeMap<ListenerId, ListenerEntry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener with a filter and optional pad restriction.
    pub fn add_listener(
        &mut self,
        listener: impl EventListener + 'static,
        filter: EventFilter,
        pad: Option<u32>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
                pad,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely. Returns `false` for unknown ids.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Emits one event to all active and matching listeners.
    pub fn emit(&mut self, event: &DebuggerEvent) {
        for entry in self.listeners.values_mut() {
            if !entry.enabled {
                continue;
            }

            if let Some(wanted) = entry.pad {
                if event.pad_index() != Some(wanted) {
                    continue;
                }
            }

            if entry.filter.accepts(event) {
                entry.listener.on_event(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[DebuggerEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Collects every event it receives into a shared vector.
///
/// Handy for hosts that poll for status text instead of reacting to it.
#[derive(Clone, Default)]
pub struct EventCollector {
    events: std::sync::Arc<std::sync::Mutex<Vec<DebuggerEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything collected so far.
    pub fn drain(&self) -> Vec<DebuggerEvent> {
        match self.events.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventListener for EventCollector {
    fn on_event(&mut self, event: &DebuggerEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
