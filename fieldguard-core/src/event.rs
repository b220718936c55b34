// Events a bound control emits

use std::fmt;
use std::sync::Arc;

/// Control events the validator subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEvent {
    /// The value changed
    Input,
    /// The control lost focus
    Blur,
    /// A key was released while the control had focus
    KeyUp,
}

impl FieldEvent {
    /// DOM event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldEvent::Input => "input",
            FieldEvent::Blur => "blur",
            FieldEvent::KeyUp => "keyup",
        }
    }
}

impl fmt::Display for FieldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback invoked when a subscribed event fires.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by a subscription, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}
