/// The two mutually exclusive content views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Diary,
    Assistant,
}

impl Panel {
    pub const ALL: [Panel; 2] = [Panel::Diary, Panel::Assistant];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Diary => "Diary Entry",
            Panel::Assistant => "Personal Assistant",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Panel::Diary => "📖",
            Panel::Assistant => "🤖",
        }
    }
}

/// Active panel and side panel expansion. The two halves change independently.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    active: Panel,
    side_panel_expanded: bool,
}

impl Navigation {
    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn side_panel_expanded(&self) -> bool {
        self.side_panel_expanded
    }

    /// Returns whether the active panel changed.
    pub fn select_panel(&mut self, panel: Panel) -> bool {
        let changed = self.active != panel;
        self.active = panel;
        changed
    }

    pub fn begin_hover(&mut self) -> bool {
        let changed = !self.side_panel_expanded;
        self.side_panel_expanded = true;
        changed
    }

    pub fn end_hover(&mut self) -> bool {
        let changed = self.side_panel_expanded;
        self.side_panel_expanded = false;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let nav = Navigation::default();
        assert_eq!(nav.active(), Panel::Diary);
        assert!(!nav.side_panel_expanded());
    }

    #[test]
    fn test_select_panel_is_idempotent() {
        for panel in Panel::ALL {
            let mut nav = Navigation::default();
            nav.select_panel(panel);
            assert!(!nav.select_panel(panel));
            assert_eq!(nav.active(), panel);
        }
    }

    #[test]
    fn test_hover_always_ends_collapsed() {
        for initially_expanded in [false, true] {
            let mut nav = Navigation::default();
            if initially_expanded {
                nav.begin_hover();
            }
            nav.begin_hover();
            assert!(nav.side_panel_expanded());
            nav.end_hover();
            assert!(!nav.side_panel_expanded());
        }
    }

    #[test]
    fn test_hover_does_not_touch_active_panel() {
        let mut nav = Navigation::default();
        nav.select_panel(Panel::Assistant);
        nav.begin_hover();
        nav.end_hover();
        assert_eq!(nav.active(), Panel::Assistant);
    }
}
