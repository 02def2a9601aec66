//! Event domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{EventError, Result};

/// A stored client update attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Server-assigned identifier
    pub event_id: String,

    /// Lifecycle stage, e.g. `pre_update`
    pub phase: String,

    pub started_at: DateTime<Utc>,

    /// Client exit code
    pub exit: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,

    pub ended_at: DateTime<Utc>,

    pub machine_id: String,

    pub core_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_path: Option<String>,
}

/// A validated event ready to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEvent {
    pub phase: String,
    pub started_at: DateTime<Utc>,
    pub exit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    pub ended_at: DateTime<Utc>,
    pub machine_id: String,
    pub core_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_path: Option<String>,
}

/// `POST /event` request body.
///
/// Every field is optional at the decoding stage so that an absent field, an
/// explicit `null` and a zero value stay distinguishable; [`EventSubmission::validate`]
/// enforces presence.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EventSubmission {
    #[schema(example = "pre_update")]
    pub phase: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    #[schema(example = 0)]
    pub exit: Option<i64>,
    pub exception: Option<String>,
    pub ended_at: Option<DateTime<Utc>>,
    pub machine_id: Option<String>,
    #[schema(example = "3.0.156")]
    pub core_version: Option<String>,
    #[schema(example = "/var/lib/insights/newest.egg")]
    pub core_path: Option<String>,
}

impl EventSubmission {
    /// Check required fields in declaration order and fail on the first one
    /// that is missing.
    pub fn validate(self) -> Result<NewEvent> {
        let Self {
            phase,
            started_at,
            exit,
            exception,
            ended_at,
            machine_id,
            core_version,
            core_path,
        } = self;

        let phase = phase.ok_or(EventError::MissingField("phase"))?;
        let started_at = started_at.ok_or(EventError::MissingField("started_at"))?;
        let started_at = storable("started_at", started_at)?;
        let exit = exit.ok_or(EventError::MissingField("exit"))?;
        let ended_at = ended_at.ok_or(EventError::MissingField("ended_at"))?;
        let ended_at = storable("ended_at", ended_at)?;
        let machine_id = machine_id.ok_or(EventError::MissingField("machine_id"))?;
        let core_version = core_version.ok_or(EventError::MissingField("core_version"))?;
        let core_path = core_path.ok_or(EventError::MissingField("core_path"))?;

        Ok(NewEvent {
            phase,
            started_at,
            exit,
            exception,
            ended_at,
            machine_id,
            core_version,
            core_path: Some(core_path),
        })
    }
}

/// Timestamps are stored as Unix nanoseconds, which cover 1677 to 2262.
fn storable(name: &'static str, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
    match at.timestamp_nanos_opt() {
        Some(_) => Ok(at),
        None => Err(EventError::InvalidField {
            name,
            reason: "outside the supported time range",
        }),
    }
}

/// How many rows a listing may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    Unbounded,
    AtMost(u64),
}

impl RowLimit {
    /// Interpret the wire sentinel: any negative value means no limit.
    pub fn from_sentinel(limit: i64) -> Self {
        u64::try_from(limit).map_or(Self::Unbounded, Self::AtMost)
    }

    /// Value bound to `LIMIT ?`; SQLite reads a negative limit as none.
    pub(crate) fn as_sql(self) -> i64 {
        match self {
            Self::Unbounded => -1,
            Self::AtMost(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

/// `GET /event` query parameters.
///
/// Kept as raw strings so a malformed value is reported against the
/// parameter that carried it.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    /// Maximum number of events, negative for all (default -1)
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,

    /// Number of events to skip (default 0)
    #[param(value_type = Option<u64>)]
    pub offset: Option<String>,
}

impl EventListQuery {
    pub fn limit(&self) -> Result<RowLimit> {
        match self.limit.as_deref().filter(|v| !v.is_empty()) {
            None => Ok(RowLimit::Unbounded),
            Some(raw) => raw
                .parse::<i64>()
                .map(RowLimit::from_sentinel)
                .map_err(|_| EventError::InvalidQuery {
                    name: "limit",
                    reason: "must be an integer",
                }),
        }
    }

    pub fn offset(&self) -> Result<u64> {
        match self.offset.as_deref().filter(|v| !v.is_empty()) {
            None => Ok(0),
            Some(raw) => raw.parse::<u64>().map_err(|_| EventError::InvalidQuery {
                name: "offset",
                reason: "must be a non-negative integer",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_submission() -> serde_json::Value {
        serde_json::json!({
            "phase": "pre_update",
            "started_at": "2020-06-16T12:00:00Z",
            "exit": 0,
            "ended_at": "2020-06-16T12:00:05Z",
            "machine_id": "2d7e4b30-4b1e-4a4b-bd4c-4f5d3e3a1c00",
            "core_version": "3.0.156",
            "core_path": "/var/lib/insights/newest.egg"
        })
    }

    fn submission(value: serde_json::Value) -> EventSubmission {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_exit_zero_is_present() {
        let event = submission(full_submission()).validate().unwrap();
        assert_eq!(event.exit, 0);
        assert_eq!(event.exception, None);
        assert_eq!(
            event.core_path.as_deref(),
            Some("/var/lib/insights/newest.egg")
        );
    }

    #[test]
    fn test_null_and_absent_exit_are_missing() {
        let mut null_exit = full_submission();
        null_exit["exit"] = serde_json::Value::Null;
        let mut absent_exit = full_submission();
        absent_exit.as_object_mut().unwrap().remove("exit");

        for body in [null_exit, absent_exit] {
            let err = submission(body).validate().unwrap_err();
            assert!(matches!(err, EventError::MissingField("exit")));
        }
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let err = submission(serde_json::json!({"exit": 1, "core_path": "/x"}))
            .validate()
            .unwrap_err();
        assert!(matches!(err, EventError::MissingField("phase")));

        let mut body = full_submission();
        let fields = body.as_object_mut().unwrap();
        fields.remove("machine_id");
        fields.remove("core_path");
        let err = submission(body).validate().unwrap_err();
        assert!(matches!(err, EventError::MissingField("machine_id")));
    }

    #[test]
    fn test_unstorable_timestamps_are_rejected() {
        let mut far_future = full_submission();
        far_future["started_at"] = "+10000-01-01T00:00:00Z".into();
        let err = submission(far_future).validate().unwrap_err();
        assert!(matches!(err, EventError::InvalidField { name: "started_at", .. }));

        let mut far_past = full_submission();
        far_past["ended_at"] = "1600-01-01T00:00:00Z".into();
        let err = submission(far_past).validate().unwrap_err();
        assert!(matches!(err, EventError::InvalidField { name: "ended_at", .. }));
    }

    #[test]
    fn test_nanosecond_timestamps_are_kept() {
        let mut body = full_submission();
        body["started_at"] = "2020-06-16T12:00:00.123456789Z".into();
        let event = submission(body).validate().unwrap();
        assert_eq!(event.started_at.timestamp_subsec_nanos(), 123_456_789);
    }

    #[test]
    fn test_empty_string_counts_as_present() {
        let mut body = full_submission();
        body["phase"] = "".into();
        assert_eq!(submission(body).validate().unwrap().phase, "");
    }

    #[test]
    fn test_event_omits_null_optionals() {
        let event = Event {
            event_id: "0190c0de-0000-7000-8000-000000000000".into(),
            phase: "pre_update".into(),
            started_at: "2020-06-16T12:00:00Z".parse().unwrap(),
            exit: 1,
            exception: None,
            ended_at: "2020-06-16T12:00:05Z".parse().unwrap(),
            machine_id: "m".into(),
            core_version: "3.0.156".into(),
            core_path: None,
        };

        let value = serde_json::to_value(&event).unwrap();
        let fields = value.as_object().unwrap();
        assert!(!fields.contains_key("exception"));
        assert!(!fields.contains_key("core_path"));
        assert_eq!(fields["exit"], 1);
    }

    #[test]
    fn test_row_limit_sentinel() {
        assert_eq!(RowLimit::from_sentinel(-1), RowLimit::Unbounded);
        assert_eq!(RowLimit::from_sentinel(-20), RowLimit::Unbounded);
        assert_eq!(RowLimit::from_sentinel(0), RowLimit::AtMost(0));
        assert_eq!(RowLimit::from_sentinel(5), RowLimit::AtMost(5));
        assert_eq!(RowLimit::Unbounded.as_sql(), -1);
        assert_eq!(RowLimit::AtMost(u64::MAX).as_sql(), i64::MAX);
    }

    #[test]
    fn test_list_query_defaults() {
        let query = EventListQuery::default();
        assert_eq!(query.limit().unwrap(), RowLimit::Unbounded);
        assert_eq!(query.offset().unwrap(), 0);
    }

    #[test]
    fn test_list_query_rejects_bad_values() {
        let query = EventListQuery {
            limit: Some("ten".into()),
            offset: Some("-1".into()),
        };

        assert!(matches!(
            query.limit().unwrap_err(),
            EventError::InvalidQuery { name: "limit", .. }
        ));
        assert!(matches!(
            query.offset().unwrap_err(),
            EventError::InvalidQuery { name: "offset", .. }
        ));
    }
}
