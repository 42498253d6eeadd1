use common::MetadataRecord;
use once_cell::sync::OnceCell;
use regex::Regex;
use tracing::trace;

use crate::sei::{SeiMessage, USER_DATA_UNREGISTERED};

/// Length of `uuid_iso_iec_11578` in front of the user data bytes.
pub const UUID_LEN: usize = 16;

/// UUID the renderer/encoder stamps on its per-frame payloads ("TIGAS-SEI-000001" in ASCII).
/// Payloads are accepted regardless of their UUID.
pub const ENCODER_UUID: [u8; UUID_LEN] = *b"TIGAS-SEI-000001";

static METADATA_PATTERN: OnceCell<Regex> = OnceCell::new();

fn metadata_pattern() -> &'static Regex {
    METADATA_PATTERN.get_or_init(|| {
        Regex::new(r"frame_id=(?P<frame_id>-?[0-9]+);timestamp_ms=(?P<timestamp_ms>-?[0-9]+)")
            .expect("failed to compile metadata regex")
    })
}

/// Binary view of a `user_data_unregistered()` SEI payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDataUnregistered<'a> {
    pub uuid: &'a [u8; UUID_LEN],
    pub data: &'a [u8],
}

impl<'a> UserDataUnregistered<'a> {
    /// Returns `None` for other payload types and for payloads too short to hold the UUID.
    pub fn from_sei_message(message: &SeiMessage<'a>) -> Option<Self> {
        if message.payload_type != USER_DATA_UNREGISTERED {
            return None;
        }

        let (uuid, data) = message.payload.split_first_chunk::<UUID_LEN>()?;
        Some(Self { uuid, data })
    }

    /// The user data as text; invalid UTF-8 is replaced rather than rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.data).into_owned()
    }

    pub fn uuid_hex(&self) -> String {
        self.uuid.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

/// Searches `text` for `frame_id=<int>;timestamp_ms=<int>` and returns both values.
///
/// Values that do not fit in an `i64` count as no match.
pub fn parse_metadata_text(text: &str) -> Option<(i64, i64)> {
    let captures = metadata_pattern().captures(text)?;
    let frame_id = captures["frame_id"].parse().ok()?;
    let timestamp_ms = captures["timestamp_ms"].parse().ok()?;
    Some((frame_id, timestamp_ms))
}

/// Converts a SEI message into a `MetadataRecord` when it is user data unregistered carrying the
/// per-frame pattern. Anything else is skipped silently.
pub fn extract_metadata(message: &SeiMessage<'_>) -> Option<MetadataRecord> {
    let user_data = UserDataUnregistered::from_sei_message(message)?;
    let text = user_data.text();

    let Some((frame_id, timestamp_ms)) = parse_metadata_text(&text) else {
        trace!(uuid = %user_data.uuid_hex(), text = %text, "user data does not carry frame metadata");
        return None;
    };

    Some(MetadataRecord {
        frame_id,
        timestamp_ms,
        raw_text: text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_data(uuid: &[u8; UUID_LEN], text: &[u8]) -> Vec<u8> {
        let mut payload = uuid.to_vec();
        payload.extend_from_slice(text);
        payload
    }

    #[test]
    fn test_parse_metadata_text() {
        assert_eq!(parse_metadata_text("frame_id=7;timestamp_ms=233"), Some((7, 233)));
        assert_eq!(parse_metadata_text("frame_id=-1;timestamp_ms=-40"), Some((-1, -40)));
        assert_eq!(
            parse_metadata_text("x264 core\0frame_id=12;timestamp_ms=400;extra"),
            Some((12, 400))
        );
        assert_eq!(parse_metadata_text("frame_id=;timestamp_ms=1"), None);
        assert_eq!(parse_metadata_text("frame_id=1, timestamp_ms=1"), None);
        assert_eq!(
            parse_metadata_text("frame_id=99999999999999999999;timestamp_ms=1"),
            None
        );
    }

    #[test]
    fn test_extract_metadata_from_user_data() {
        let payload = user_data(&ENCODER_UUID, b"frame_id=3;timestamp_ms=100");
        let message = SeiMessage {
            payload_type: USER_DATA_UNREGISTERED,
            payload: &payload,
        };

        assert_eq!(
            extract_metadata(&message),
            Some(MetadataRecord {
                frame_id: 3,
                timestamp_ms: 100,
                raw_text: "frame_id=3;timestamp_ms=100".to_string(),
            })
        );
    }

    #[test]
    fn test_any_uuid_is_accepted() {
        let payload = user_data(&[0xff; UUID_LEN], b"frame_id=0;timestamp_ms=0");
        let message = SeiMessage {
            payload_type: USER_DATA_UNREGISTERED,
            payload: &payload,
        };

        let user_data = UserDataUnregistered::from_sei_message(&message);
        assert_eq!(user_data.map(|u| u.uuid_hex()), Some("ff".repeat(UUID_LEN)));
        assert!(extract_metadata(&message).is_some());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let payload = user_data(&ENCODER_UUID, b"\xff\xfeframe_id=5;timestamp_ms=9\xc3");
        let message = SeiMessage {
            payload_type: USER_DATA_UNREGISTERED,
            payload: &payload,
        };

        let record = extract_metadata(&message);
        assert_eq!(record.as_ref().map(|r| (r.frame_id, r.timestamp_ms)), Some((5, 9)));
        assert!(record.is_some_and(|r| r.raw_text.contains('\u{fffd}')));
    }

    #[test]
    fn test_other_payloads_are_ignored() {
        let text = b"frame_id=3;timestamp_ms=100";
        let payload = user_data(&ENCODER_UUID, text);

        let other_type = SeiMessage {
            payload_type: 1,
            payload: &payload,
        };
        assert_eq!(extract_metadata(&other_type), None);

        let short = SeiMessage {
            payload_type: USER_DATA_UNREGISTERED,
            payload: &payload[..UUID_LEN - 1],
        };
        assert_eq!(UserDataUnregistered::from_sei_message(&short), None);

        // Without the UUID the first 16 bytes of the text are swallowed.
        let no_uuid = SeiMessage {
            payload_type: USER_DATA_UNREGISTERED,
            payload: text,
        };
        assert_eq!(extract_metadata(&no_uuid), None);

        let unrelated = user_data(&ENCODER_UUID, b"x264 - core 164");
        let unrelated = SeiMessage {
            payload_type: USER_DATA_UNREGISTERED,
            payload: &unrelated,
        };
        assert_eq!(extract_metadata(&unrelated), None);
    }

    #[test]
    fn test_uuid_only_payload() {
        let message = SeiMessage {
            payload_type: USER_DATA_UNREGISTERED,
            payload: &ENCODER_UUID,
        };

        let user_data = UserDataUnregistered::from_sei_message(&message);
        assert_eq!(user_data.map(|u| u.data.len()), Some(0));
        assert_eq!(extract_metadata(&message), None);
    }
}
