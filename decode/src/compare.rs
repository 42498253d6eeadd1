use common::{MetadataRecord, ReferenceRecord};
use serde::Serialize;

/// Outcome of a strict positional comparison between reference rows and extracted SEI records.
///
/// Serialized field names are the ones the orchestration layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    #[serde(rename = "metadata_rows")]
    pub reference_count: usize,

    #[serde(rename = "sei_entries")]
    pub extracted_count: usize,

    #[serde(rename = "mismatches")]
    pub mismatch_count: usize,

    pub strict_ok: bool,

    /// Index of the first differing position within the compared prefix, for diagnostics only.
    #[serde(skip)]
    pub first_mismatch: Option<usize>,
}

/// Pairs `reference[i]` with `extracted[i]` for every index both sides have and counts the pairs
/// that differ.
///
/// There is no re-alignment: a dropped, duplicated or reordered frame shifts every following
/// position. The mapping is strict only when both sides have the same non-zero length and no pair
/// differs.
pub fn compare(reference: &[ReferenceRecord], extracted: &[MetadataRecord]) -> ComparisonReport {
    let mut mismatch_count = 0;
    let mut first_mismatch = None;

    for (index, (expected, actual)) in reference.iter().zip(extracted).enumerate() {
        if *expected != actual.key() {
            mismatch_count += 1;
            if first_mismatch.is_none() {
                first_mismatch = Some(index);
            }
        }
    }

    ComparisonReport {
        reference_count: reference.len(),
        extracted_count: extracted.len(),
        mismatch_count,
        strict_ok: reference.len() == extracted.len() && mismatch_count == 0 && !reference.is_empty(),
        first_mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(pairs: &[(i64, i64)]) -> Vec<ReferenceRecord> {
        pairs.iter().copied().map(ReferenceRecord::from).collect()
    }

    fn extracted(pairs: &[(i64, i64)]) -> Vec<MetadataRecord> {
        pairs
            .iter()
            .map(|&(frame_id, timestamp_ms)| MetadataRecord {
                frame_id,
                timestamp_ms,
                raw_text: format!("frame_id={frame_id};timestamp_ms={timestamp_ms}"),
            })
            .collect()
    }

    #[test]
    fn test_exact_match() {
        let report = compare(
            &reference(&[(1, 100), (2, 133)]),
            &extracted(&[(1, 100), (2, 133)]),
        );

        assert!(report.strict_ok);
        assert_eq!(report.mismatch_count, 0);
        assert_eq!(report.first_mismatch, None);
    }

    #[test]
    fn test_single_mismatch() {
        let report = compare(
            &reference(&[(1, 100), (2, 133)]),
            &extracted(&[(1, 100), (2, 200)]),
        );

        assert!(!report.strict_ok);
        assert_eq!(report.mismatch_count, 1);
        assert_eq!(report.first_mismatch, Some(1));
    }

    #[test]
    fn test_count_mismatch_fails_strict_mode() {
        let rows = [(0, 0), (1, 33), (2, 66), (3, 100), (4, 133)];
        let report = compare(&reference(&rows), &extracted(&rows[..3]));

        assert_eq!(report.reference_count, 5);
        assert_eq!(report.extracted_count, 3);
        assert_eq!(report.mismatch_count, 0);
        assert!(!report.strict_ok);
    }

    #[test]
    fn test_empty_reference_fails_strict_mode() {
        let report = compare(&[], &[]);
        assert!(!report.strict_ok);

        let report = compare(&[], &extracted(&[(0, 0)]));
        assert!(!report.strict_ok);
        assert_eq!(report.mismatch_count, 0);
    }

    #[test]
    fn test_dropped_frame_shifts_following_positions() {
        let report = compare(
            &reference(&[(0, 0), (1, 33), (2, 66), (3, 100)]),
            &extracted(&[(0, 0), (2, 66), (3, 100)]),
        );

        assert_eq!(report.mismatch_count, 2);
        assert_eq!(report.first_mismatch, Some(1));
        assert!(!report.strict_ok);
    }

    #[test]
    fn test_same_frame_id_different_timestamp() {
        let report = compare(&reference(&[(7, 233)]), &extracted(&[(7, 234)]));

        assert_eq!(report.mismatch_count, 1);
        assert!(!report.strict_ok);
    }
}
