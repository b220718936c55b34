// Mock enhancement runtime

use fieldguard_core::{CompanionEvent, ElementId, EnhancementRuntime, Listener, ListenerId};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

struct Subscription {
    control: ElementId,
    events: Vec<CompanionEvent>,
    listener: Listener,
}

#[derive(Default)]
struct RuntimeState {
    next_id: u64,
    subscriptions: BTreeMap<ListenerId, Subscription>,
    calls: Vec<String>,
}

/// Stand-in for a select2-style runtime.
///
/// Records every `subscribe` / `unsubscribe` call and lets tests fire
/// companion notifications with [`trigger`](Self::trigger).
#[derive(Clone, Default)]
pub struct MockEnhancementRuntime {
    state: Arc<Mutex<RuntimeState>>,
}

impl MockEnhancementRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> Arc<dyn EnhancementRuntime> {
        Arc::new(self.clone())
    }

    /// Fire `event` for `control`. Returns how many listeners ran.
    pub fn trigger(&self, control: ElementId, event: CompanionEvent) -> usize {
        let listeners: Vec<Listener> = {
            let state = self.state.lock();
            state
                .subscriptions
                .values()
                .filter(|s| s.control == control && s.events.contains(&event))
                .map(|s| s.listener.clone())
                .collect()
        };
        for listener in &listeners {
            listener();
        }
        listeners.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscriptions.len()
    }

    /// Recorded calls, e.g. `"subscribe #3 change select2:close"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Whether any recorded call starts with `method`.
    pub fn was_called(&self, method: &str) -> bool {
        self.state.lock().calls.iter().any(|c| c.starts_with(method))
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl EnhancementRuntime for MockEnhancementRuntime {
    fn subscribe(
        &self,
        control: ElementId,
        events: &[CompanionEvent],
        listener: Listener,
    ) -> ListenerId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = ListenerId(state.next_id);

        let names: Vec<&str> = events.iter().map(CompanionEvent::as_str).collect();
        state
            .calls
            .push(format!("subscribe {} {}", control, names.join(" ")));
        state.subscriptions.insert(
            id,
            Subscription {
                control,
                events: events.to_vec(),
                listener,
            },
        );
        id
    }

    fn unsubscribe(&self, subscription: ListenerId) {
        let mut state = self.state.lock();
        state.calls.push(format!("unsubscribe {}", subscription));
        state.subscriptions.remove(&subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscribe_and_trigger() {
        let runtime = MockEnhancementRuntime::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let id = runtime.subscribe(
            ElementId(3),
            &[CompanionEvent::Change, CompanionEvent::Close],
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(runtime.trigger(ElementId(3), CompanionEvent::Change), 1);
        assert_eq!(runtime.trigger(ElementId(3), CompanionEvent::Close), 1);
        assert_eq!(runtime.trigger(ElementId(4), CompanionEvent::Change), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(runtime.calls(), vec!["subscribe #3 change select2:close"]);

        runtime.unsubscribe(id);
        assert_eq!(runtime.subscription_count(), 0);
        assert!(runtime.was_called("unsubscribe"));
        assert_eq!(runtime.trigger(ElementId(3), CompanionEvent::Change), 0);
    }
}
