//! Models mirroring the Optimizely X REST resources.
//!
//! These are flat records deserialized straight from API responses. Nothing
//! is cached: every client operation re-fetches and re-parses.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-environment settings keyed by environment key.
///
/// The shape of the values is not enforced by this client, so they are kept
/// as raw JSON.
pub type EnvironmentMap = HashMap<String, serde_json::Value>;

/// An Optimizely project.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub platform: String,
}

/// Status of an [`Experiment`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ExperimentStatus {
    Running,
    NotStarted,
    Paused,
}

impl ExperimentStatus {
    /// Wire name of the status, as it appears in API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentStatus::Running => "running",
            ExperimentStatus::NotStarted => "not_started",
            ExperimentStatus::Paused => "paused",
        }
    }
}

/// An A/B test with its variations and targeting rules.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub key: String,
    pub status: ExperimentStatus,
    pub variations: Vec<Variation>,
    pub environments: EnvironmentMap,
    pub holdback: f64,
    #[serde(rename = "type")]
    pub experiment_type: String,
    pub audience_conditions: String,
}

/// A single variation of an [`Experiment`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Variation {
    pub name: String,
    pub key: String,
    /// Traffic allocation for this variation.
    pub weight: f64,
}

/// An environment within a project.
///
/// Environments are matched by `key`, case-insensitively.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub key: String,
}

/// A named targeting segment.
///
/// The API returns audience ids as strings; [`crate::ApiClient::get_audience_id`]
/// parses them to integers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Audience {
    pub id: String,
    pub name: String,
}

/// A feature flag with its typed variables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Feature {
    pub id: String,
    pub key: String,
    pub variables: Vec<Variable>,
    pub environments: EnvironmentMap,
}

/// A typed variable of a [`Feature`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Variable {
    pub key: String,
    #[serde(rename = "type")]
    pub variable_type: String,
    pub default_value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_project_list() {
        let projects: Vec<Project> = serde_json::from_str(
            r#"[
              {"id": "abc", "name": "Proj A", "platform": "web"},
              {"id": "xyz", "name": "Proj B", "platform": "custom"}
            ]"#,
        )
        .unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "abc");
        assert_eq!(projects[1].name, "Proj B");
    }

    #[test]
    fn parse_experiment() {
        let experiment: Experiment = serde_json::from_str(
            r#"{
              "id": "1001",
              "name": "Checkout test",
              "key": "checkout_test",
              "status": "not_started",
              "variations": [
                {"name": "Control", "key": "control", "weight": 5000},
                {"name": "Treatment", "key": "treatment", "weight": 5000}
              ],
              "environments": {
                "production": {"status": "running"}
              },
              "holdback": 0,
              "type": "a/b",
              "audience_conditions": "everyone"
            }"#,
        )
        .unwrap();
        assert_eq!(experiment.status, ExperimentStatus::NotStarted);
        assert_eq!(experiment.variations.len(), 2);
        assert_eq!(experiment.variations[0].weight, 5000.0);
        assert_eq!(experiment.experiment_type, "a/b");
        assert!(experiment.environments.contains_key("production"));
    }

    #[test]
    fn parse_feature() {
        let feature: Feature = serde_json::from_str(
            r#"{
              "id": "2002",
              "key": "new_banner",
              "variables": [
                {"key": "color", "type": "string", "default_value": "blue"}
              ],
              "environments": {}
            }"#,
        )
        .unwrap();
        assert_eq!(feature.variables[0].variable_type, "string");
        assert_eq!(feature.variables[0].default_value, "blue");
    }

    #[test]
    fn experiment_status_wire_names() {
        for (status, name) in [
            (ExperimentStatus::Running, "running"),
            (ExperimentStatus::NotStarted, "not_started"),
            (ExperimentStatus::Paused, "paused"),
        ] {
            assert_eq!(status.as_str(), name);
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("{:?}", name)
            );
        }
    }
}
