//! Feedback container discovery.

use fieldguard_core::{ElementId, Surface};

/// Classes that mark a sibling `DIV` as the feedback container.
pub const FEEDBACK_MARKERS: [&str; 3] = ["feedback", "valid-feedback", "invalid-feedback"];

/// Tag a discovered container must carry.
pub const CONTAINER_TAG: &str = "DIV";

/// How many following siblings are examined.
pub const SIBLING_SEARCH_LIMIT: usize = 3;

/// Find the first of the next [`SIBLING_SEARCH_LIMIT`] siblings of
/// `control` that is a `DIV` carrying one of the [`FEEDBACK_MARKERS`].
pub fn discover(surface: &dyn Surface, control: ElementId) -> Option<ElementId> {
    std::iter::successors(surface.next_sibling(control), |sibling| {
        surface.next_sibling(*sibling)
    })
    .take(SIBLING_SEARCH_LIMIT)
    .find(|sibling| is_container(surface, *sibling))
}

fn is_container(surface: &dyn Surface, id: ElementId) -> bool {
    surface.tag_name(id).as_deref() == Some(CONTAINER_TAG)
        && FEEDBACK_MARKERS
            .iter()
            .any(|marker| surface.has_class(id, marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldguard_testing::MemorySurface;

    fn row(surface: &MemorySurface) -> (ElementId, ElementId) {
        let form = surface.append(None, "form");
        let input = surface.append(Some(form), "input");
        (form, input)
    }

    #[test]
    fn test_immediate_sibling() {
        let surface = MemorySurface::new();
        let (form, input) = row(&surface);
        let container = surface.element(Some(form), "div", &["invalid-feedback"]);

        assert_eq!(discover(&surface, input), Some(container));
    }

    #[test]
    fn test_third_sibling_found() {
        let surface = MemorySurface::new();
        let (form, input) = row(&surface);
        surface.append(Some(form), "label");
        surface.append(Some(form), "span");
        let container = surface.element(Some(form), "div", &["feedback"]);

        assert_eq!(discover(&surface, input), Some(container));
    }

    #[test]
    fn test_fourth_sibling_ignored() {
        let surface = MemorySurface::new();
        let (form, input) = row(&surface);
        surface.append(Some(form), "label");
        surface.append(Some(form), "span");
        surface.append(Some(form), "small");
        surface.element(Some(form), "div", &["feedback"]);

        assert_eq!(discover(&surface, input), None);
    }

    #[test]
    fn test_requires_div_and_marker() {
        let surface = MemorySurface::new();
        let (form, input) = row(&surface);
        surface.element(Some(form), "span", &["invalid-feedback"]);
        surface.element(Some(form), "div", &["help-text"]);
        let container = surface.element(Some(form), "div", &["valid-feedback"]);

        assert_eq!(discover(&surface, input), Some(container));
    }

    #[test]
    fn test_first_match_wins() {
        let surface = MemorySurface::new();
        let (form, input) = row(&surface);
        let first = surface.element(Some(form), "div", &["feedback"]);
        surface.element(Some(form), "div", &["invalid-feedback"]);

        assert_eq!(discover(&surface, input), Some(first));
    }

    #[test]
    fn test_last_child_has_no_container() {
        let surface = MemorySurface::new();
        let (_, input) = row(&surface);
        assert_eq!(discover(&surface, input), None);
    }
}
