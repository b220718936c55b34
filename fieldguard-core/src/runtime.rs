// Optional enhancement-widget runtime (select2-style companions)

use crate::{ElementId, Listener, ListenerId};
use std::fmt;

/// Notifications an enhancement runtime raises for a control it decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanionEvent {
    /// The selected value changed
    Change,
    /// The dropdown closed
    Close,
}

impl CompanionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanionEvent::Change => "change",
            CompanionEvent::Close => "select2:close",
        }
    }
}

impl fmt::Display for CompanionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A widget-enhancement library present in the host environment.
///
/// Injected into the validator instead of being probed for globally.
/// When no runtime is supplied, companion notifications are simply
/// never wired.
///
/// A listener may run at any time, even before `subscribe` returns.
/// Implementations must not hold internal locks while invoking listeners,
/// and callers must not hold their own locks across `subscribe`.
pub trait EnhancementRuntime: Send + Sync {
    /// Run `listener` whenever any of `events` fires for `control`.
    fn subscribe(
        &self,
        control: ElementId,
        events: &[CompanionEvent],
        listener: Listener,
    ) -> ListenerId;

    /// Drop a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, subscription: ListenerId);
}
