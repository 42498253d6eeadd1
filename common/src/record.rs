use serde::Serialize;

/// One `frame_id=<int>;timestamp_ms=<int>` payload recovered from a user data unregistered SEI
/// message, in bitstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    pub frame_id: i64,
    pub timestamp_ms: i64,

    /// The whole decoded user data text the fields were matched in.
    pub raw_text: String,
}

impl MetadataRecord {
    /// The positional key compared against a `ReferenceRecord`.
    pub fn key(&self) -> ReferenceRecord {
        ReferenceRecord {
            frame_id: self.frame_id,
            timestamp_ms: self.timestamp_ms,
        }
    }
}

/// One ground-truth row as written by the encoder next to the stream, in encode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceRecord {
    pub frame_id: i64,
    pub timestamp_ms: i64,
}

impl From<(i64, i64)> for ReferenceRecord {
    fn from((frame_id, timestamp_ms): (i64, i64)) -> Self {
        Self {
            frame_id,
            timestamp_ms,
        }
    }
}
