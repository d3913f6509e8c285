use crate::event::DebuggerEvent;
use crate::eventbus::EventListener;

/// Wraps a listener and filters events based on a user-supplied predicate.
///
/// Unlike [`EventFilter::Custom`](crate::eventbus::EventFilter::Custom) the
/// predicate may capture state.
pub struct FilteredListener {
    predicate: Box<dyn Fn(&DebuggerEvent) -> bool + Send + Sync>,
    inner: Box<dyn EventListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(&DebuggerEvent) -> bool + Send + Sync + 'static,
        inner: impl EventListener + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl EventListener for FilteredListener {
    fn on_event(&mut self, event: &DebuggerEvent) {
        if (self.predicate)(event) {
            self.inner.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventbus::EventCollector;

    #[test]
    fn test_predicate_gates_inner() {
        let min_frames = 10;
        let sink = EventCollector::new();
        let mut listener = FilteredListener::new(
            move |ev| matches!(ev, DebuggerEvent::RecordingStopped { frames } if *frames >= min_frames),
            sink.clone(),
        );

        listener.on_event(&DebuggerEvent::RecordingStopped { frames: 3 });
        listener.on_event(&DebuggerEvent::RecordingStopped { frames: 30 });
        listener.on_event(&DebuggerEvent::Started);

        assert_eq!(
            sink.drain(),
            vec![DebuggerEvent::RecordingStopped { frames: 30 }]
        );
    }
}
