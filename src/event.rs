use std::collections::HashMap;

use serde::Deserialize;

/// A Sensu Go event as delivered to a handler on stdin.
///
/// Only the fields this handler consumes are modelled; everything else in the
/// Sensu payload is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    pub entity: Entity,
    pub check: Option<Check>,
    pub metrics: Option<Metrics>,
}

impl Event {
    /// True when the event carries at least one metric point. An absent
    /// metrics block and a present-but-empty one are equivalent.
    pub fn has_metrics(&self) -> bool {
        self.metrics.as_ref().is_some_and(|m| !m.points.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    pub metadata: ObjectMeta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Check {
    pub metadata: ObjectMeta,
}

/// Sensu nests the name and labels of entities and checks under `metadata`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub points: Vec<MetricPoint>,
}

/// One timestamped numeric sample. Timestamps are epoch seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricPoint {
    pub name: String,
    pub value: f64,
    pub timestamp: i64,
    #[serde(default)]
    pub tags: Vec<MetricTag>,
}

/// Point-level tag. Tag names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricTag {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_event() {
        let data = r#"{
            "entity": {
                "metadata": {
                    "name": "server01",
                    "labels": {"region": "us-east-1"}
                },
                "system": {"os": "linux"}
            },
            "check": {
                "metadata": {"name": "collect-metrics"},
                "command": "metrics.sh",
                "interval": 10
            },
            "metrics": {
                "handlers": ["stackdriver"],
                "points": [
                    {
                        "name": "cpu.load",
                        "value": 0.5,
                        "timestamp": 1700000000,
                        "tags": [{"name": "core", "value": "0"}]
                    }
                ]
            }
        }"#;

        let event: Event = serde_json::from_str(data).unwrap();
        assert_eq!(event.entity.metadata.name, "server01");
        assert_eq!(
            event.entity.metadata.labels.as_ref().unwrap()["region"],
            "us-east-1"
        );
        assert_eq!(event.check.as_ref().unwrap().metadata.name, "collect-metrics");
        let point = &event.metrics.as_ref().unwrap().points[0];
        assert_eq!(point.name, "cpu.load");
        assert_eq!(point.value, 0.5);
        assert_eq!(point.timestamp, 1700000000);
        assert_eq!(point.tags[0].name, "core");
        assert!(event.has_metrics());
    }

    #[test]
    fn decodes_event_without_check_or_tags() {
        let data = r#"{
            "entity": {"metadata": {"name": "server01"}},
            "metrics": {"points": [{"name": "up", "value": 1, "timestamp": 1}]}
        }"#;

        let event: Event = serde_json::from_str(data).unwrap();
        assert!(event.check.is_none());
        assert!(event.metrics.as_ref().unwrap().points[0].tags.is_empty());
        assert!(event.has_metrics());
    }

    #[test]
    fn has_metrics_is_false_for_absent_and_empty_points() {
        let absent: Event = serde_json::from_str(
            r#"{"entity": {"metadata": {"name": "server01"}}}"#,
        )
        .unwrap();
        assert!(!absent.has_metrics());

        let empty: Event = serde_json::from_str(
            r#"{"entity": {"metadata": {"name": "server01"}}, "metrics": {"points": []}}"#,
        )
        .unwrap();
        assert!(!empty.has_metrics());
    }
}
