//! Named experiment tasks.
//!
//! A task is one point of an experiment: an experiment name plus a flat
//! parameter struct. Its name is derived from both, so the same parameters
//! always land in the same directory regardless of field order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CollectError, CollectResult};

/// Separator between the experiment and each `key=value` pair.
pub const NAME_SEPARATOR: &str = "__";

/// One unit of work within an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task<P> {
    experiment: String,
    params: P,
}

impl<P: Serialize> Task<P> {
    /// Create a task. The experiment name must be a non-empty path-safe token.
    pub fn new(experiment: impl Into<String>, params: P) -> CollectResult<Self> {
        let experiment = experiment.into();
        if experiment.is_empty()
            || experiment.contains(NAME_SEPARATOR)
            || experiment.chars().any(|c| !is_name_char(c))
            || experiment.starts_with('.')
        {
            return Err(CollectError::InvalidParams(format!(
                "experiment name '{experiment}' must be non-empty, not start with '.', \
                 use only [A-Za-z0-9._=-] and not contain '{NAME_SEPARATOR}'"
            )));
        }
        Ok(Self { experiment, params })
    }

    /// Experiment this task belongs to.
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Task parameters.
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Parameters as a JSON object.
    pub fn params_value(&self) -> CollectResult<Value> {
        let value = serde_json::to_value(&self.params)?;
        if !value.is_object() {
            return Err(CollectError::InvalidParams(format!(
                "parameters must serialize to a map, got {value}"
            )));
        }
        Ok(value)
    }

    /// Deterministic name `<experiment>__k1=v1__k2=v2`, keys sorted.
    pub fn name(&self) -> CollectResult<String> {
        let value = self.params_value()?;
        let mut pairs: Vec<(&String, &Value)> = value
            .as_object()
            .map(|map| map.iter().collect())
            .unwrap_or_default();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let mut name = self.experiment.clone();
        for (key, value) in pairs {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            name.push_str(NAME_SEPARATOR);
            name.push_str(&sanitize(&format!("{key}={rendered}")));
        }
        Ok(name)
    }
}

/// Experiment part of a task name.
pub fn experiment_of(task_name: &str) -> &str {
    task_name
        .split_once(NAME_SEPARATOR)
        .map_or(task_name, |(experiment, _)| experiment)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '=' | '-')
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Point {
        gamma: f64,
        beta: f64,
        instance: String,
    }

    #[test]
    fn test_name_sorts_keys() {
        let task = Task::new(
            "qaoa",
            Point {
                gamma: 0.5,
                beta: 0.25,
                instance: "a".into(),
            },
        )
        .unwrap();
        assert_eq!(
            task.name().unwrap(),
            "qaoa__beta=0.25__gamma=0.5__instance=a"
        );
    }

    #[test]
    fn test_name_independent_of_insertion_order() {
        let mut a = HashMap::new();
        a.insert("x", 1);
        a.insert("y", 2);
        let mut b = HashMap::new();
        b.insert("y", 2);
        b.insert("x", 1);
        assert_eq!(
            Task::new("e", a).unwrap().name().unwrap(),
            Task::new("e", b).unwrap().name().unwrap()
        );
    }

    #[test]
    fn test_name_sanitizes_values() {
        let mut params = HashMap::new();
        params.insert("seq", vec![0, 1, 0, 1]);
        let name = Task::new("e", params).unwrap().name().unwrap();
        assert_eq!(name, "e__seq=_0_1_0_1_");
    }

    #[test]
    fn test_rejects_non_map_params() {
        let task = Task::new("e", 3.5).unwrap();
        assert!(matches!(task.name(), Err(CollectError::InvalidParams(_))));
    }

    #[test]
    fn test_rejects_bad_experiment_names() {
        assert!(Task::new("", ()).is_err());
        assert!(Task::new("a/b", ()).is_err());
        assert!(Task::new("a__b", ()).is_err());
        assert!(Task::new("..", ()).is_err());
    }

    #[test]
    fn test_experiment_of() {
        assert_eq!(experiment_of("qaoa__beta=0.25"), "qaoa");
        assert_eq!(experiment_of("bare"), "bare");
    }
}
