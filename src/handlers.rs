// Host-side event handler table
//
// Routes event codes delivered through the callback trampoline to the
// handler registered for them. One handler per event code; registering
// again replaces the previous one. Codes with no handler are dropped with
// a warning.
//
// The native library may keep delivering events after a handler was
// removed or the table was cleared (it is never told about `clear`).
// Such deliveries land on the no-handler path.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::UnityEvent;
use crate::payload::EventPayload;

/// Receives events from the native library.
///
/// Called synchronously on whatever thread the native library delivers
/// from. The payload view is only valid for the duration of the call.
pub trait EventCallbackHandler: Send + Sync {
    fn handle_event_callback(&self, event_code: u64, data: EventPayload<'_>, tag: u64);
}

impl<F> EventCallbackHandler for F
where
    F: Fn(u64, EventPayload<'_>, u64) + Send + Sync,
{
    fn handle_event_callback(&self, event_code: u64, data: EventPayload<'_>, tag: u64) {
        self(event_code, data, tag)
    }
}

/// Box a closure as a shareable handler.
pub fn handler_fn<F>(f: F) -> Arc<dyn EventCallbackHandler>
where
    F: Fn(u64, EventPayload<'_>, u64) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Mapping from event code to handler.
pub struct HandlerTable {
    handlers: BTreeMap<u64, Arc<dyn EventCallbackHandler>>,
}

impl HandlerTable {
    pub const fn new() -> Self {
        HandlerTable {
            handlers: BTreeMap::new(),
        }
    }

    /// Install `handler` for `event_code`, returning the one it replaced.
    pub fn register(
        &mut self,
        event_code: u64,
        handler: Arc<dyn EventCallbackHandler>,
    ) -> Option<Arc<dyn EventCallbackHandler>> {
        self.handlers.insert(event_code, handler)
    }

    /// Returns `true` if a handler was removed.
    pub fn unregister(&mut self, event_code: u64) -> bool {
        self.handlers.remove(&event_code).is_some()
    }

    pub fn get(&self, event_code: u64) -> Option<Arc<dyn EventCallbackHandler>> {
        self.handlers.get(&event_code).cloned()
    }

    pub fn contains(&self, event_code: u64) -> bool {
        self.handlers.contains_key(&event_code)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self::new()
    }
}

static EVENT_HANDLERS: RwLock<HandlerTable> = RwLock::new(HandlerTable::new());

pub fn register_handler(event_code: u64, handler: Arc<dyn EventCallbackHandler>) {
    if EVENT_HANDLERS.write().register(event_code, handler).is_some() {
        log::debug!(
            "Replaced event callback handler for {}",
            UnityEvent::from_code(event_code)
        );
    }
}

pub fn unregister_handler(event_code: u64) -> bool {
    EVENT_HANDLERS.write().unregister(event_code)
}

pub fn has_handler(event_code: u64) -> bool {
    EVENT_HANDLERS.read().contains(event_code)
}

pub fn handler_count() -> usize {
    EVENT_HANDLERS.read().len()
}

/// Drop every host handler. The native side keeps its registrations.
pub fn clear_handlers() {
    EVENT_HANDLERS.write().clear();
}

/// Deliver one event to its handler.
///
/// The table lock is released before the handler runs, so handlers may
/// register or unregister from inside the callback. Returns whether a
/// handler was found.
pub fn dispatch_event(event_code: u64, data: EventPayload<'_>, tag: u64) -> bool {
    let handler = EVENT_HANDLERS.read().get(event_code);

    match handler {
        Some(handler) => {
            handler.handle_event_callback(event_code, data, tag);
            true
        }
        None => {
            log::warn!(
                "event callback handler not found for event code {} ({})",
                event_code,
                UnityEvent::from_code(event_code)
            );
            false
        }
    }
}
