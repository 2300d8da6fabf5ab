// ProxAlert - Pause/Resume Button
//
// Rising-edge detector over the raw button level. A press flips the toggle
// state once; holding the button or leaving it released does nothing. The
// caller owns the debounce: after a reported change it must wait
// `DEBOUNCE_MS` before polling again.

use crate::events::{StatusChange, ToggleState};

#[derive(Debug, Default)]
pub struct ToggleController {
    state: ToggleState,
    last_high: bool,
}

impl ToggleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Feed the current raw level. Returns the new state on a LOW->HIGH edge.
    pub fn update(&mut self, high: bool) -> Option<StatusChange> {
        let rising = high && !self.last_high;
        self.last_high = high;

        if rising {
            self.state = self.state.flipped();
            Some(StatusChange(self.state))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_indices(levels: &[bool]) -> Vec<usize> {
        let mut toggle = ToggleController::new();
        levels
            .iter()
            .enumerate()
            .filter_map(|(i, &level)| toggle.update(level).map(|_| i))
            .collect()
    }

    #[test]
    fn starts_enabled() {
        assert_eq!(ToggleController::new().state(), ToggleState::Enabled);
    }

    #[test]
    fn fires_once_per_rising_edge() {
        assert_eq!(fire_indices(&[false, true, true, false, true]), vec![1, 4]);
    }

    #[test]
    fn steady_levels_never_fire() {
        assert!(fire_indices(&[false; 8]).is_empty());
        assert_eq!(fire_indices(&[true; 8]), vec![0]);
    }

    #[test]
    fn each_press_flips_and_reports_new_state() {
        let mut toggle = ToggleController::new();
        assert_eq!(toggle.update(true), Some(StatusChange(ToggleState::Paused)));
        assert_eq!(toggle.update(false), None);
        assert_eq!(toggle.state(), ToggleState::Paused);
        assert_eq!(toggle.update(true), Some(StatusChange(ToggleState::Enabled)));
        assert_eq!(toggle.state(), ToggleState::Enabled);
    }
}
