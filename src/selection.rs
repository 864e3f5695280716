//! Session configurator
//!
//! Collects the live-mode flag and scenario selections for one visit to the
//! configuration screen and produces the navigation request that routes the
//! user into the session view.

use crate::errors::SessionError;
use crate::types::NavigationRequest;

/// One configuration screen visit's worth of selections
///
/// Scenario order follows insertion order; re-adding a removed scenario
/// appends it at the end. The selection is ephemeral and dropped once a
/// navigation request has been produced.
#[derive(Debug, Clone)]
pub struct SessionSelection {
    live_mode: bool,
    scenarios: Vec<String>,
    target: String,
}

impl SessionSelection {
    /// Create an empty selection routing to `target` on submission.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            live_mode: false,
            scenarios: Vec::new(),
            target: target.into(),
        }
    }

    /// Add the scenario if absent, remove it if present.
    pub fn toggle_scenario(&mut self, name: impl Into<String>) {
        let name = name.into();
        if let Some(pos) = self.scenarios.iter().position(|s| *s == name) {
            self.scenarios.remove(pos);
            log::debug!("Scenario removed: {}", name);
        } else {
            log::debug!("Scenario added: {}", name);
            self.scenarios.push(name);
        }
    }

    pub fn set_live_mode(&mut self, enabled: bool) {
        self.live_mode = enabled;
    }

    pub fn live_mode(&self) -> bool {
        self.live_mode
    }

    pub fn scenarios(&self) -> &[String] {
        &self.scenarios
    }

    /// Mirror of the submit guard, for disabling the submit control.
    pub fn can_submit(&self) -> bool {
        self.live_mode && !self.scenarios.is_empty()
    }

    /// Produce the navigation request for the session view.
    ///
    /// Validates independently of any UI guard: live mode must be on and at
    /// least one scenario chosen. Scenario names are serialized as a single
    /// comma-joined query value in insertion order.
    pub fn submit(&self) -> Result<NavigationRequest, SessionError> {
        if !self.live_mode {
            return Err(SessionError::Validation(
                "live presentation mode must be enabled".to_string(),
            ));
        }
        if self.scenarios.is_empty() {
            return Err(SessionError::Validation(
                "at least one scenario must be selected".to_string(),
            ));
        }

        log::info!(
            "Submitting: live mode on, scenarios: {}",
            self.scenarios.join(", ")
        );
        Ok(NavigationRequest {
            target: self.target.clone(),
            query: vec![("scenarios".to_string(), self.scenarios.join(","))],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_toggle_restores_set() {
        let mut selection = SessionSelection::new("main");
        selection.toggle_scenario("Product Demo");
        let before: Vec<String> = selection.scenarios().to_vec();

        selection.toggle_scenario("Demo");
        selection.toggle_scenario("Demo");
        assert_eq!(selection.scenarios(), before.as_slice());
    }

    #[test]
    fn test_retoggle_appends_at_end() {
        let mut selection = SessionSelection::new("main");
        selection.toggle_scenario("Introduction");
        selection.toggle_scenario("Q&A Session");
        selection.toggle_scenario("Introduction");
        selection.toggle_scenario("Introduction");

        assert_eq!(
            selection.scenarios(),
            &["Q&A Session".to_string(), "Introduction".to_string()]
        );
    }

    #[test]
    fn test_submit_without_live_mode_fails() {
        let mut selection = SessionSelection::new("main");
        selection.toggle_scenario("Introduction");

        assert!(!selection.can_submit());
        let result = selection.submit();
        assert!(matches!(result, Err(SessionError::Validation(_))));
    }

    #[test]
    fn test_submit_without_scenarios_fails() {
        let mut selection = SessionSelection::new("main");
        selection.set_live_mode(true);

        assert!(!selection.can_submit());
        assert!(matches!(
            selection.submit(),
            Err(SessionError::Validation(_))
        ));
    }

    #[test]
    fn test_submit_produces_navigation_request() {
        let mut selection = SessionSelection::new("main");
        selection.set_live_mode(true);
        selection.toggle_scenario("Introduction");
        selection.toggle_scenario("Q&A Session");

        let request = selection.submit().unwrap();
        assert_eq!(request.target, "main");
        assert_eq!(
            request.query_value("scenarios"),
            Some("Introduction,Q&A Session")
        );
    }

    #[test]
    fn test_serialization_follows_insertion_order() {
        let mut selection = SessionSelection::new("main");
        selection.set_live_mode(true);
        selection.toggle_scenario("Closing Remarks");
        selection.toggle_scenario("Introduction");

        let request = selection.submit().unwrap();
        assert_eq!(
            request.query_value("scenarios"),
            Some("Closing Remarks,Introduction")
        );
    }
}
