use chrono::{DateTime, Utc};
use serde::Serialize;

/// A candidate cross-source duplicate, always stored with `source_a < source_b`
/// so `(source_a, source_id_a, source_b, source_id_b)` is a stable key
/// regardless of scan order.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicatePair {
    pub source_a: String,
    pub source_id_a: String,
    pub source_b: String,
    pub source_id_b: String,
    pub content_hash: String,
    pub similarity_score: f64,
    pub detected_at: DateTime<Utc>,
}

impl DuplicatePair {
    /// Build a pair, swapping the two sides into canonical order if needed.
    #[allow(clippy::too_many_arguments)]
    pub fn canonical(
        source_1: &str,
        source_id_1: &str,
        source_2: &str,
        source_id_2: &str,
        content_hash: String,
        similarity_score: f64,
        detected_at: DateTime<Utc>,
    ) -> Self {
        if source_1 <= source_2 {
            Self {
                source_a: source_1.to_string(),
                source_id_a: source_id_1.to_string(),
                source_b: source_2.to_string(),
                source_id_b: source_id_2.to_string(),
                content_hash,
                similarity_score,
                detected_at,
            }
        } else {
            Self {
                source_a: source_2.to_string(),
                source_id_a: source_id_2.to_string(),
                source_b: source_1.to_string(),
                source_id_b: source_id_1.to_string(),
                content_hash,
                similarity_score,
                detected_at,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reorders_reversed_input_into_canonical_order() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let pair = DuplicatePair::canonical("b", "2", "a", "1", "H".into(), 0.9, ts);
        assert_eq!(pair.source_a, "a");
        assert_eq!(pair.source_b, "b");
        assert_eq!(pair.source_id_a, "1");
        assert_eq!(pair.source_id_b, "2");
    }
}
