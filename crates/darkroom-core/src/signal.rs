//! Payload-less notifications broadcast by the engine and the pipeline.
//!
//! Listeners are told *that* something changed; they read the new state
//! through the owning component's accessors. A component only emits after it
//! has finished mutating itself.

use std::fmt;

/// A named notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The selection rectangle was created, reshaped or discarded.
    SelectionChanged,
    /// A transformation finished and the working raster was refreshed.
    TransformationApplied,
    /// The source raster was rebuilt from the original input.
    Reinitialized,
}

impl Signal {
    /// Stable event name used by the page-side widget.
    pub fn name(self) -> &'static str {
        match self {
            Signal::SelectionChanged => "select:update",
            Signal::TransformationApplied => "core:transformation",
            Signal::Reinitialized => "core:reinitialized",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle returned by [`Signals::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(Signal)>;

/// Listener registry owned by a single component.
#[derive(Default)]
pub struct Signals {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it is called for every subsequent signal.
    pub fn subscribe(&mut self, listener: impl FnMut(Signal) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Notify every listener in subscription order.
    pub fn emit(&mut self, signal: Signal) {
        log::trace!("emit {signal} to {} listener(s)", self.listeners.len());
        for (_, listener) in self.listeners.iter_mut() {
            listener(signal);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signals")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::recorder;
    use super::*;

    #[test]
    fn test_signal_names() {
        assert_eq!(Signal::SelectionChanged.name(), "select:update");
        assert_eq!(Signal::TransformationApplied.to_string(), "core:transformation");
        assert_eq!(Signal::Reinitialized.name(), "core:reinitialized");
    }

    #[test]
    fn test_emit_reaches_all_listeners_in_order() {
        let mut signals = Signals::new();
        let (first, f) = recorder();
        let (second, g) = recorder();
        signals.subscribe(f);
        signals.subscribe(g);

        signals.emit(Signal::SelectionChanged);
        signals.emit(Signal::Reinitialized);

        let expected = vec![Signal::SelectionChanged, Signal::Reinitialized];
        assert_eq!(*first.borrow(), expected);
        assert_eq!(*second.borrow(), expected);
    }

    #[test]
    fn test_unsubscribe() {
        let mut signals = Signals::new();
        let (log, f) = recorder();
        let id = signals.subscribe(f);

        assert!(signals.unsubscribe(id));
        assert!(!signals.unsubscribe(id));
        assert!(signals.is_empty());

        signals.emit(Signal::SelectionChanged);
        assert!(log.borrow().is_empty());
    }
}
