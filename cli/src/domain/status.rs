//! Backend status and action documents, and the reductions over them.
//!
//! Pure parsing only; issuing the commands lives in the actions service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Placeholder for a unit whose workload status carries no message.
pub const UNKNOWN_WORKLOAD_MESSAGE: &str = "Unknown workload status message";

/// Key under which `run-action` reports the queued action id.
pub const ACTION_QUEUED_KEY: &str = "Action queued with id";

/// Render a YAML scalar as a string.
#[must_use]
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ── Status snapshot ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitStatus {
    #[serde(rename = "workload-status", default)]
    pub workload_status: StatusInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationStatus {
    #[serde(default)]
    pub units: BTreeMap<String, UnitStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineStatus {
    #[serde(rename = "juju-status", default)]
    pub juju_status: StatusInfo,
}

/// Parsed `status --format yaml` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationStatus>,
    #[serde(default)]
    pub machines: BTreeMap<String, MachineStatus>,
}

/// `(id, current state, message)` for a unit or machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityState {
    pub id: String,
    pub current: String,
    pub message: String,
}

impl StatusSnapshot {
    /// Workload state of every unit across all applications.
    #[must_use]
    pub fn agent_states(&self) -> Vec<EntityState> {
        self.applications
            .values()
            .flat_map(|app| app.units.iter())
            .map(|(unit, status)| EntityState {
                id: unit.clone(),
                current: status.workload_status.current.clone().unwrap_or_default(),
                message: status
                    .workload_status
                    .message
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_WORKLOAD_MESSAGE.to_string()),
            })
            .collect()
    }

    /// Agent state of every machine; missing fields become empty strings.
    #[must_use]
    pub fn machine_states(&self) -> Vec<EntityState> {
        self.machines
            .iter()
            .map(|(id, status)| EntityState {
                id: id.clone(),
                current: status.juju_status.current.clone().unwrap_or_default(),
                message: status.juju_status.message.clone().unwrap_or_default(),
            })
            .collect()
    }
}

// ── Leader probe ──────────────────────────────────────────────────────────────

/// One entry of `run --application <app> is-leader --format yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderProbe {
    #[serde(rename = "UnitId")]
    pub unit_id: String,
    #[serde(rename = "Stdout", default)]
    pub stdout: String,
}

/// First unit whose probe printed `True`.
#[must_use]
pub fn find_leader(probes: &[LeaderProbe]) -> Option<String> {
    probes
        .iter()
        .find(|p| p.stdout.trim() == "True")
        .map(|p| p.unit_id.clone())
}

// ── Actions ───────────────────────────────────────────────────────────────────

/// Extract the queued action id from a `run-action` response.
#[must_use]
pub fn parse_queued_action_id(doc: &str) -> Option<String> {
    let value: Value = serde_yaml::from_str(doc).ok()?;
    value
        .get(ACTION_QUEUED_KEY)
        .and_then(scalar_string)
        .filter(|id| !id.is_empty())
}

/// Action lifecycle state reported by `show-action-output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Pending,
    Running,
    Failed,
    Completed,
    /// The document carried no `status` entry.
    Unreported,
    Other(String),
}

impl From<&str> for ActionStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "failed" => Self::Failed,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Parsed `show-action-output` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub status: ActionStatus,
    pub results: Option<serde_yaml::Mapping>,
}

impl ActionReport {
    /// Parse a `show-action-output` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML.
    pub fn parse(doc: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(doc)?;
        let status = value
            .get("status")
            .and_then(scalar_string)
            .map_or(ActionStatus::Unreported, |s| ActionStatus::from(s.as_str()));
        let results = value
            .get("results")
            .and_then(Value::as_mapping)
            .filter(|m| !m.is_empty())
            .cloned();
        Ok(Self {
            status,
            results,
        })
    }

    /// The `outcome` entry of the results, if present.
    #[must_use]
    pub fn outcome(&self) -> Option<String> {
        self.results
            .as_ref()?
            .get("outcome")
            .and_then(scalar_string)
            .filter(|o| !o.is_empty())
    }
}
