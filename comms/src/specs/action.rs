use serde::{Deserialize, Serialize};

use crate::unix_millis;

/// A typed action parameter value.
///
/// Closed union so params stay structured on the wire instead of opaque
/// dynamically typed blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<ParamValue>),
    Map(Vec<(String, ParamValue)>),
}

/// A unit of work handed to an agent by the poll call.
///
/// `params` is an ordered key/value list; insertion order is preserved
/// end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnableActionInstance {
    pub id: String,
    pub action_id: String,
    pub command: String,
    pub params: Vec<(String, ParamValue)>,
}

impl RunnableActionInstance {
    /// Looks up a param by key.
    ///
    /// # Arguments
    /// * `key` - The param name.
    ///
    /// # Returns
    /// The first value stored under `key`, if any.
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Lifecycle state of an action instance as observed by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    Running,
    Finished,
}

/// Terminal result of an action instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Unknown,
    Success,
    Failure,
}

/// One observed action-instance transition, reported at least once and
/// never retried by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStatusUpdate {
    pub instance_id: String,
    pub status: ActionStatus,
    pub outcome: ActionOutcome,
    pub reason: String,
    /// Unix millis at which the transition was observed.
    pub at: u64,
}

impl ActionStatusUpdate {
    /// Creates an update stamped with the current time.
    ///
    /// # Arguments
    /// * `instance_id` - The action instance this update refers to.
    /// * `status` - The observed lifecycle state.
    /// * `outcome` - The outcome, `Unknown` for non-terminal states.
    /// * `reason` - Free-form operator-facing detail.
    ///
    /// # Returns
    /// A new `ActionStatusUpdate`.
    pub fn new(
        instance_id: impl Into<String>,
        status: ActionStatus,
        outcome: ActionOutcome,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            status,
            outcome,
            reason: reason.into(),
            at: unix_millis(),
        }
    }
}
