use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answers::{AnswerSet, is_blank};

/// Comparison applied between a stored answer and the rule value.
///
/// Operators this build does not recognize are kept verbatim and
/// evaluate as "condition not met" rather than failing the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    Other(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "notEquals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::Other(raw) => raw,
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "equals" => ConditionOperator::Equals,
            "notEquals" => ConditionOperator::NotEquals,
            "contains" => ConditionOperator::Contains,
            _ => ConditionOperator::Other(raw),
        }
    }
}

impl Serialize for ConditionOperator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConditionOperator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ConditionOperator::from)
    }
}

/// How multiple conditions combine into one show/hide decision.
///
/// Unrecognized logic values leave the question visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleLogic {
    #[default]
    And,
    Or,
    Other(String),
}

impl RuleLogic {
    pub fn as_str(&self) -> &str {
        match self {
            RuleLogic::And => "AND",
            RuleLogic::Or => "OR",
            RuleLogic::Other(raw) => raw,
        }
    }
}

impl From<String> for RuleLogic {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "AND" => RuleLogic::And,
            "OR" => RuleLogic::Or,
            _ => RuleLogic::Other(raw),
        }
    }
}

impl Serialize for RuleLogic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleLogic {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RuleLogic::from)
    }
}

/// One comparison against another question's stored answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionExpr {
    pub question_key: String,
    #[schemars(with = "String")]
    pub operator: ConditionOperator,
    pub value: Value,
}

impl ConditionExpr {
    /// Evaluate against the answers gathered so far.
    ///
    /// A blank referenced answer never satisfies any operator, including
    /// `notEquals`.
    pub fn evaluate(&self, answers: &AnswerSet) -> bool {
        let Some(answer) = answers.get(&self.question_key) else {
            return false;
        };
        if is_blank(Some(answer)) {
            return false;
        }

        match &self.operator {
            ConditionOperator::Equals => answer == &self.value,
            ConditionOperator::NotEquals => answer != &self.value,
            ConditionOperator::Contains => contains(answer, &self.value),
            ConditionOperator::Other(_) => false,
        }
    }
}

fn contains(answer: &Value, needle: &Value) -> bool {
    match answer {
        Value::Array(items) => items.contains(needle),
        scalar => display_string(scalar).contains(&display_string(needle)),
    }
}

fn display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Conditions gating one question, combined under a logic operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    #[schemars(with = "String")]
    pub logic: RuleLogic,
    #[serde(default)]
    pub conditions: Vec<ConditionExpr>,
}

impl RuleSet {
    /// Combined show/hide decision. Empty rule sets are vacuously
    /// satisfied. Every condition is evaluated; conditions are pure, so
    /// skipping the remainder after the outcome is settled would only be
    /// an optimization.
    pub fn evaluate(&self, answers: &AnswerSet) -> bool {
        if self.conditions.is_empty() {
            return true;
        }

        let results: Vec<bool> = self
            .conditions
            .iter()
            .map(|condition| condition.evaluate(answers))
            .collect();

        match &self.logic {
            RuleLogic::And => results.iter().all(|result| *result),
            RuleLogic::Or => results.iter().any(|result| *result),
            RuleLogic::Other(_) => true,
        }
    }
}

/// Show/hide decision for a question that may not carry rules at all.
pub fn should_show(rules: Option<&RuleSet>, answers: &AnswerSet) -> bool {
    rules.is_none_or(|rules| rules.evaluate(answers))
}
