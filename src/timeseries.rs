use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Config;
use crate::event::Event;

/// Custom metric namespace all Sensu points are written under.
pub const METRIC_TYPE_PREFIX: &str = "custom.googleapis.com/sensu/";

/// Reserved label carrying the entity name.
pub const ENTITY_NAME_LABEL: &str = "sensu_entity_name";

/// Reserved label carrying the check name, when the event has a check.
pub const CHECK_NAME_LABEL: &str = "sensu_check_name";

/// One Cloud Monitoring time series in the v3 REST shape.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub metric: Metric,
    pub points: Vec<Point>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Metric {
    pub r#type: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Point {
    pub interval: TimeInterval,
    pub value: TypedValue,
}

/// Instantaneous sample: start and end carry the same epoch-second
/// timestamp. The REST API wants RFC 3339 strings on the wire.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(serialize_with = "serialize_epoch_seconds")]
    pub start_time: i64,
    #[serde(serialize_with = "serialize_epoch_seconds")]
    pub end_time: i64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    pub double_value: f64,
}

fn serialize_epoch_seconds<S>(secs: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let when = chrono::DateTime::<chrono::Utc>::from_timestamp(*secs, 0).unwrap_or_default();
    serializer.serialize_str(&when.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// Cloud Monitoring rejects `/`, `-` and `.` in label keys.
fn sanitize_label_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '-' | '.' => '_',
            c => c,
        })
        .collect()
}

/// Maps an event into one time series per metric point, preserving point
/// order. Label sources are applied in write order so that on key collision
/// point tags win over check labels, which win over entity labels.
pub fn create_time_series(config: &Config, event: &Event) -> Vec<TimeSeries> {
    let points = match &event.metrics {
        Some(metrics) => &metrics.points,
        None => return Vec::new(),
    };

    points
        .iter()
        .map(|point| {
            let mut labels = BTreeMap::new();

            if config.include_labels {
                if let Some(entity_labels) = &event.entity.metadata.labels {
                    for (key, value) in entity_labels {
                        labels.insert(sanitize_label_key(key), value.clone());
                    }
                }
            }
            labels.insert(
                ENTITY_NAME_LABEL.to_string(),
                event.entity.metadata.name.clone(),
            );

            if let Some(check) = &event.check {
                if config.include_labels {
                    if let Some(check_labels) = &check.metadata.labels {
                        for (key, value) in check_labels {
                            labels.insert(sanitize_label_key(key), value.clone());
                        }
                    }
                }
                labels.insert(CHECK_NAME_LABEL.to_string(), check.metadata.name.clone());
            }

            for tag in &point.tags {
                labels.insert(sanitize_label_key(&tag.name), tag.value.clone());
            }

            TimeSeries {
                metric: Metric {
                    r#type: format!("{}{}", METRIC_TYPE_PREFIX, point.name),
                    labels,
                },
                points: vec![Point {
                    interval: TimeInterval {
                        start_time: point.timestamp,
                        end_time: point.timestamp,
                    },
                    value: TypedValue {
                        double_value: point.value,
                    },
                }],
            }
        })
        .collect()
}
