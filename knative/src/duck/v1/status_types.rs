use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// ObservedGeneration is the 'Generation' of the Service that
    /// was last processed by the controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    /// Conditions the latest available observations of a resource's current state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    /// Annotations is additional Status fields for the Resource to save some
    /// additional State as well as convey more information to the user. This is
    /// roughly akin to Annotations on any k8s resource, just the reconciler conveying
    /// richer information outwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Default for Status {
    fn default() -> Status {
        Status {
            observed_generation: Some(0i64),
            conditions: Some(Conditions::new()),
            annotations: None,
        }
    }
}

impl Status {
    pub fn conditions_mut(&mut self) -> &mut Conditions {
        self.conditions.get_or_insert_with(Conditions::new)
    }

    pub fn get_condition(&self, type_: ConditionType) -> Option<&Condition> {
        self.conditions.as_ref().and_then(|c| c.get_cond(type_))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Conditions(Vec<Condition>);

impl Deref for Conditions {
    type Target = Vec<Condition>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Conditions {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Conditions {
    pub fn new() -> Conditions {
        Conditions(vec![])
    }

    pub fn get_cond(&self, type_: ConditionType) -> Option<&Condition> {
        self.iter().find(|c| c.type_ == type_)
    }

    fn get_cond_mut(&mut self, type_: ConditionType) -> Option<&mut Condition> {
        self.iter_mut().find(|c| c.type_ == type_)
    }

    /// Set a condition, only bumping the transition time when something other
    /// than the time has changed.
    pub fn set_cond(&mut self, mut condition: Condition) {
        match self.get_cond_mut(condition.type_) {
            Some(cond) => {
                let test_cond = Condition {
                    last_transition_time: condition.last_transition_time,
                    ..cond.clone()
                };
                if test_cond != condition {
                    *cond = Condition {
                        last_transition_time: Some(Utc::now()),
                        ..condition
                    }
                }
            }
            None => {
                condition.last_transition_time = Some(Utc::now());
                self.push(condition);
                self.sort_by_key(|c| c.type_);
            }
        }
    }

    pub fn mark_true(&mut self, condition_type: ConditionType) {
        self.set_cond(Condition {
            type_: condition_type,
            status: ConditionStatus::True,
            ..Default::default()
        })
    }

    pub fn mark_false(
        &mut self,
        condition_type: ConditionType,
        reason: &str,
        message: Option<String>,
    ) {
        self.set_cond(Condition {
            type_: condition_type,
            status: ConditionStatus::False,
            reason: Some(reason.to_string()),
            message,
            ..Default::default()
        });
    }

    pub fn mark_unknown(
        &mut self,
        condition_type: ConditionType,
        reason: &str,
        message: Option<String>,
    ) {
        self.set_cond(Condition {
            type_: condition_type,
            status: ConditionStatus::Unknown,
            reason: Some(reason.to_string()),
            message,
            ..Default::default()
        });
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: ConditionType,
    pub status: ConditionStatus,
    /// ConditionSeverityError specifies that a failure of a condition type
    /// should be viewed as an error.  As "Error" is the default for conditions
    /// we use the empty string (coupled with omitempty) to avoid confusion in
    /// the case where the condition is in state "True" (aka nothing is wrong).
    // In rust lang we accomplish this with Error as a Default variant
    #[serde(default, skip_serializing_if = "ConditionSeverity::is_err")]
    pub severity: ConditionSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

#[derive(
    Deserialize, Serialize, Clone, Copy, Debug, Default, JsonSchema, PartialEq, Eq, PartialOrd, Ord,
)]
#[non_exhaustive]
pub enum ConditionType {
    /// Specifies that the resource is ready.
    /// For long-running resources.
    #[default]
    Ready,
    /// Specifies whether the sink has been properly extracted from the resolver.
    SinkProvided,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, JsonSchema, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConditionSeverity {
    #[default]
    Error,
    Warning,
    Info,
}

impl ConditionSeverity {
    pub fn is_err(&self) -> bool {
        *self == ConditionSeverity::Error
    }
}

/// ConditionSet defines how a set of Conditions depend on one another:
/// the happy condition is true exactly when every dependent is true.
pub struct ConditionSet {
    happy: ConditionType,
    dependents: &'static [ConditionType],
}

impl ConditionSet {
    /// A set for long-running resources, whose happy condition is `Ready`.
    pub const fn living(dependents: &'static [ConditionType]) -> ConditionSet {
        ConditionSet {
            happy: ConditionType::Ready,
            dependents,
        }
    }

    pub fn get_top_level_condition(&self) -> ConditionType {
        self.happy
    }

    /// Add any missing condition of the set as Unknown.
    pub fn initialize(&self, conditions: &mut Conditions) {
        for type_ in std::iter::once(&self.happy).chain(self.dependents) {
            if conditions.get_cond(*type_).is_none() {
                conditions.set_cond(Condition {
                    type_: *type_,
                    ..Default::default()
                });
            }
        }
    }

    pub fn is_happy(&self, conditions: &Conditions) -> bool {
        conditions.get_cond(self.happy).map_or(false, Condition::is_true)
    }

    pub fn mark_true(&self, conditions: &mut Conditions, condition_type: ConditionType) {
        conditions.mark_true(condition_type);
        if condition_type == self.happy {
            return;
        }

        let unhappy = self
            .dependents
            .iter()
            .filter_map(|t| conditions.get_cond(*t))
            .find(|c| !c.is_true())
            .cloned();
        let all_present = self.dependents.iter().all(|t| conditions.get_cond(*t).is_some());

        match unhappy {
            Some(dependent) => conditions.set_cond(Condition {
                type_: self.happy,
                ..dependent
            }),
            None if all_present => conditions.mark_true(self.happy),
            None => {}
        }
    }

    pub fn mark_false(
        &self,
        conditions: &mut Conditions,
        condition_type: ConditionType,
        reason: &str,
        message: Option<String>,
    ) {
        conditions.mark_false(condition_type, reason, message.clone());
        if self.dependents.contains(&condition_type) {
            conditions.mark_false(self.happy, reason, message);
        }
    }

    pub fn mark_unknown(
        &self,
        conditions: &mut Conditions,
        condition_type: ConditionType,
        reason: &str,
        message: Option<String>,
    ) {
        conditions.mark_unknown(condition_type, reason, message.clone());
        let other_false = self
            .dependents
            .iter()
            .filter(|t| **t != condition_type)
            .filter_map(|t| conditions.get_cond(*t))
            .any(Condition::is_false);
        if self.dependents.contains(&condition_type) && !other_false {
            conditions.mark_unknown(self.happy, reason, message);
        }
    }
}
