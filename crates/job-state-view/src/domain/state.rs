//! Local display state of a single renderer instance.

/// Whether the detail panel of a failed job is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayState {
    /// Only the summary row is shown.
    #[default]
    Collapsed,
    /// Summary row plus exception type and stack trace.
    Expanded,
}

impl DisplayState {
    /// Check if the detail panel should be constructed.
    pub fn is_expanded(&self) -> bool {
        matches!(self, DisplayState::Expanded)
    }

    /// The state after one user toggle.
    pub fn toggled(self) -> Self {
        match self {
            DisplayState::Collapsed => DisplayState::Expanded,
            DisplayState::Expanded => DisplayState::Collapsed,
        }
    }

    /// Indicator glyph for the summary control.
    pub fn indicator(&self) -> char {
        match self {
            DisplayState::Collapsed => '▸',
            DisplayState::Expanded => '▾',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_collapsed() {
        assert_eq!(DisplayState::default(), DisplayState::Collapsed);
        assert!(!DisplayState::default().is_expanded());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let state = DisplayState::Collapsed;
        assert_eq!(state.toggled(), DisplayState::Expanded);
        assert_eq!(state.toggled().toggled(), state);
    }
}
