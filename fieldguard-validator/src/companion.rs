//! Companion widget detection.
//!
//! An enhanced `SELECT` is hidden behind a companion widget rendered as its
//! next sibling. Validity classes are mirrored onto the companion, and the
//! enhancement runtime's own change notifications trigger evaluation.

use fieldguard_core::{CompanionEvent, ElementId, Surface};
use std::time::Duration;

/// Class the runtime puts on the hidden native control.
pub const HIDDEN_ACCESSIBLE_CLASS: &str = "select2-hidden-accessible";

/// Class carried by the rendered companion widget.
pub const COMPANION_CLASS: &str = "select2-container";

/// Delay between construction and the companion probe, leaving the
/// enhancement runtime time to render.
pub const PROBE_DELAY: Duration = Duration::from_millis(1000);

/// Runtime notifications that trigger evaluation.
pub const COMPANION_EVENTS: [CompanionEvent; 2] = [CompanionEvent::Change, CompanionEvent::Close];

/// Controls the probe is scheduled for.
pub const ENHANCED_TAG: &str = "SELECT";

/// The rendered companion of `control`, if the runtime has enhanced it.
pub fn probe(surface: &dyn Surface, control: ElementId) -> Option<ElementId> {
    if !surface.has_class(control, HIDDEN_ACCESSIBLE_CLASS) {
        return None;
    }
    surface
        .next_sibling(control)
        .filter(|sibling| surface.has_class(*sibling, COMPANION_CLASS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldguard_testing::MemorySurface;

    #[test]
    fn test_probe_enhanced_select() {
        let surface = MemorySurface::new();
        let form = surface.append(None, "form");
        let select = surface.element(Some(form), "select", &[HIDDEN_ACCESSIBLE_CLASS]);
        let widget = surface.element(Some(form), "span", &[COMPANION_CLASS]);

        assert_eq!(probe(&surface, select), Some(widget));
    }

    #[test]
    fn test_probe_plain_select() {
        let surface = MemorySurface::new();
        let form = surface.append(None, "form");
        let select = surface.append(Some(form), "select");
        surface.element(Some(form), "span", &[COMPANION_CLASS]);

        assert_eq!(probe(&surface, select), None);
    }

    #[test]
    fn test_probe_not_rendered_yet() {
        let surface = MemorySurface::new();
        let form = surface.append(None, "form");
        let select = surface.element(Some(form), "select", &[HIDDEN_ACCESSIBLE_CLASS]);
        surface.append(Some(form), "div");

        assert_eq!(probe(&surface, select), None);
    }
}
