// ==========================================
// Retail Replenishment APS - Report Envelope
// ==========================================
// Every operation returns the same envelope shape so downstream
// consumers can parse status/run_id/row_count uniformly before
// looking at the payload type.
// ==========================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const STATUS_SUCCESS: &str = "success";

// ==========================================
// ReportEnvelope
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ReportEnvelope<T> {
    pub status: String,

    /// Unique id of this planning run, for log correlation. Freshly
    /// generated per envelope: repeatability guarantees cover `data`
    /// and `generated_at`, never this field.
    pub run_id: Uuid,

    pub row_count: usize,

    /// Present when the payload is empty for a recoverable reason
    /// (e.g. a scope with no inventory history).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub generated_at: DateTime<Utc>,

    pub data: Vec<T>,
}

impl<T> ReportEnvelope<T> {
    pub fn success(data: Vec<T>, generated_at: DateTime<Utc>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            run_id: Uuid::new_v4(),
            row_count: data.len(),
            message: None,
            generated_at,
            data,
        }
    }

    /// Empty-but-successful envelope with an explanatory note.
    pub fn empty_with_note(message: String, generated_at: DateTime<Utc>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            run_id: Uuid::new_v4(),
            row_count: 0,
            message: Some(message),
            generated_at,
            data: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_success_envelope_counts_rows() {
        let at = Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap();
        let envelope = ReportEnvelope::success(vec![1, 2, 3], at);

        assert_eq!(envelope.status, STATUS_SUCCESS);
        assert_eq!(envelope.row_count, 3);
        assert_eq!(envelope.message, None);
        assert_eq!(envelope.generated_at, at);
    }

    #[test]
    fn test_empty_envelope_carries_note_and_omits_null_message() {
        let at = Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap();
        let envelope: ReportEnvelope<i32> =
            ReportEnvelope::empty_with_note("no history".to_string(), at);

        assert_eq!(envelope.row_count, 0);
        assert!(envelope.data.is_empty());

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["message"], "no history");

        let full = serde_json::to_value(ReportEnvelope::success(vec![1], at)).unwrap();
        assert!(full.get("message").is_none());
    }
}
