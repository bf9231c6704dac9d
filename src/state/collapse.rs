// Outside-click collapse for an expandable region (the nav menu).

/// Host capability: does `target` lie inside this region's subtree?
pub trait ContainsTarget<T: ?Sized> {
    fn contains_target(&self, target: &T) -> bool;
}

impl ContainsTarget<web_sys::Node> for web_sys::Element {
    fn contains_target(&self, target: &web_sys::Node) -> bool {
        self.contains(Some(target))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseState {
    pub is_collapsed: bool,
}

impl Default for CollapseState {
    fn default() -> Self {
        Self { is_collapsed: true }
    }
}

impl CollapseState {
    pub fn toggle(&mut self) {
        self.is_collapsed = !self.is_collapsed;
    }

    /// Returns true when the region was open.
    pub fn collapse(&mut self) -> bool {
        let changed = !self.is_collapsed;
        self.is_collapsed = true;
        changed
    }

    /// Collapse when an expanded region sees a click outside itself. Never reopens.
    /// Returns whether the state changed, so callers can skip redundant re-renders.
    pub fn on_document_click<R, T>(&mut self, region: &R, target: &T) -> bool
    where
        R: ContainsTarget<T> + ?Sized,
        T: ?Sized,
    {
        if self.is_collapsed || region.contains_target(target) {
            return false;
        }
        self.is_collapsed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Region covering a range of fake node ids.
    struct Span(std::ops::Range<u32>);

    impl ContainsTarget<u32> for Span {
        fn contains_target(&self, target: &u32) -> bool {
            self.0.contains(target)
        }
    }

    fn open() -> CollapseState {
        CollapseState { is_collapsed: false }
    }

    #[test]
    fn starts_collapsed() {
        assert!(CollapseState::default().is_collapsed);
    }

    #[test]
    fn outside_click_collapses_open_region() {
        let mut s = open();
        assert!(s.on_document_click(&Span(10..20), &3));
        assert!(s.is_collapsed);
    }

    #[test]
    fn inside_click_keeps_region_open() {
        let mut s = open();
        assert!(!s.on_document_click(&Span(10..20), &15));
        assert!(!s.is_collapsed);
    }

    #[test]
    fn repeated_outside_clicks_stay_collapsed() {
        let mut s = open();
        let region = Span(10..20);
        assert!(s.on_document_click(&region, &1));
        assert!(!s.on_document_click(&region, &2));
        assert!(s.is_collapsed);
    }

    #[test]
    fn collapsed_region_is_never_reopened() {
        let mut s = CollapseState::default();
        assert!(!s.on_document_click(&Span(10..20), &12));
        assert!(!s.on_document_click(&Span(10..20), &50));
        assert!(s.is_collapsed);
    }

    #[test]
    fn toggle_and_collapse() {
        let mut s = CollapseState::default();
        s.toggle();
        assert!(!s.is_collapsed);
        assert!(s.collapse());
        assert!(!s.collapse());
    }
}
