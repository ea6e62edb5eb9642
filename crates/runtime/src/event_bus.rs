/// Lifecycle events raised by the host map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    /// Style finished loading; custom layers may now attach.
    Load,
    LayerAdded(String),
    LayerRemoved(String),
    /// A repaint was drawn.
    Render { frame_index: u64 },
}

impl MapEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MapEvent::Load => "load",
            MapEvent::LayerAdded(_) => "layer-added",
            MapEvent::LayerRemoved(_) => "layer-removed",
            MapEvent::Render { .. } => "render",
        }
    }
}

/// FIFO queue of events, drained by the host between repaints.
#[derive(Debug)]
pub struct EventBus<E = MapEvent> {
    events: Vec<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[E] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, MapEvent};

    #[test]
    fn keeps_emission_order() {
        let mut bus = EventBus::new();
        bus.emit(MapEvent::Load);
        bus.emit(MapEvent::LayerAdded("3d-model".into()));
        let kinds: Vec<_> = bus.events().iter().map(MapEvent::kind).collect();
        assert_eq!(kinds, vec!["load", "layer-added"]);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus: EventBus = EventBus::new();
        bus.emit(MapEvent::Render { frame_index: 3 });
        let drained = bus.drain();
        assert_eq!(drained, vec![MapEvent::Render { frame_index: 3 }]);
        assert!(bus.is_empty());
    }
}
