//! Location selection state. The map click and the reset button both feed
//! the same selected-location value; which control actually fired in a cycle
//! decides the outcome, not which inputs happen to hold values.

use crate::data::record::NATIONAL_TOKEN;

/// Which control fired to cause an update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    MapClick,
    ResetControl,
}

/// One update cycle as seen by the state machine: the control that fired
/// (none on initial load) and the map's last click payload, which may be
/// stale from an earlier cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCycle {
    pub trigger: Option<Trigger>,
    pub click_payload: Option<String>,
}

/// Currently selected location, defaulting to the national aggregate.
/// Deterministic: the state after any event sequence depends only on that
/// sequence. One instance per user session; sharing a single instance
/// across sessions makes every user's clicks visible to all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: String,
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState {
            selected: NATIONAL_TOKEN.to_string(),
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_selection(&self) -> &str {
        &self.selected
    }

    /// Apply one update cycle. A reset firing always wins, even when a stale
    /// click payload is still present; a cycle where no control fired leaves
    /// the selection untouched.
    pub fn apply(&mut self, cycle: UpdateCycle) -> &str {
        match (cycle.trigger, cycle.click_payload) {
            (Some(Trigger::ResetControl), _) => {
                self.selected = NATIONAL_TOKEN.to_string();
            }
            (Some(Trigger::MapClick), Some(location)) => {
                self.selected = location.trim().to_uppercase();
            }
            // A click trigger without a payload or no trigger at all: keep
            // the previous selection.
            (Some(Trigger::MapClick), None) | (None, _) => {}
        }
        &self.selected
    }

    /// Convenience for direct wiring: a map click carrying its location.
    pub fn on_location_clicked(&mut self, location: &str) -> &str {
        self.apply(UpdateCycle {
            trigger: Some(Trigger::MapClick),
            click_payload: Some(location.to_string()),
        })
    }

    /// Convenience for direct wiring: the explicit "show national" action.
    pub fn on_reset_requested(&mut self) -> &str {
        self.apply(UpdateCycle {
            trigger: Some(Trigger::ResetControl),
            click_payload: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_national() {
        let state = SelectionState::new();
        assert_eq!(state.current_selection(), "BRASIL");
    }

    #[test]
    fn click_click_reset_ends_national() {
        let mut state = SelectionState::new();
        state.on_location_clicked("RJ");
        state.on_location_clicked("SP");
        state.on_reset_requested();
        assert_eq!(state.current_selection(), "BRASIL");
    }

    #[test]
    fn reset_then_click_ends_on_the_click() {
        let mut state = SelectionState::new();
        state.on_reset_requested();
        state.on_location_clicked("RJ");
        assert_eq!(state.current_selection(), "RJ");
    }

    #[test]
    fn reset_wins_over_a_stale_click_payload() {
        let mut state = SelectionState::new();
        state.on_location_clicked("RJ");
        // The reset fired; the map input still holds the old click.
        state.apply(UpdateCycle {
            trigger: Some(Trigger::ResetControl),
            click_payload: Some("RJ".to_string()),
        });
        assert_eq!(state.current_selection(), "BRASIL");
    }

    #[test]
    fn stale_payload_without_a_trigger_changes_nothing() {
        let mut state = SelectionState::new();
        state.on_location_clicked("SP");
        state.apply(UpdateCycle {
            trigger: None,
            click_payload: Some("RJ".to_string()),
        });
        assert_eq!(state.current_selection(), "SP");
    }

    #[test]
    fn clicks_normalize_case() {
        let mut state = SelectionState::new();
        state.on_location_clicked("rj");
        assert_eq!(state.current_selection(), "RJ");
    }

    #[test]
    fn identical_event_sequences_yield_identical_states() {
        let events = [
            UpdateCycle { trigger: Some(Trigger::MapClick), click_payload: Some("RJ".into()) },
            UpdateCycle { trigger: None, click_payload: Some("RJ".into()) },
            UpdateCycle { trigger: Some(Trigger::ResetControl), click_payload: Some("RJ".into()) },
            UpdateCycle { trigger: Some(Trigger::MapClick), click_payload: Some("SP".into()) },
        ];
        let run = || {
            let mut state = SelectionState::new();
            events
                .iter()
                .map(|cycle| state.apply(cycle.clone()).to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
        assert_eq!(run().last().map(String::as_str), Some("SP"));
    }
}
