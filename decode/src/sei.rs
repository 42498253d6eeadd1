use common::add_emulation_prevention;
use tracing::debug;

/// `payloadType` of `user_data_unregistered( payloadSize )`.
pub const USER_DATA_UNREGISTERED: u32 = 5;

/// `rbsp_stop_one_bit` followed by byte-aligning zero bits, as the last byte of a SEI RBSP.
pub const RBSP_STOP_MARKER: u8 = 0x80;

/// `nal_unit_type` 6 with `nal_ref_idc` 0.
pub const SEI_NAL_HEADER: u8 = 0x06;

const FF_BYTE: u8 = 0xff;

/// A single `sei_message()` borrowed from the RBSP it was parsed out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeiMessage<'a> {
    pub payload_type: u32,
    pub payload: &'a [u8],
}

/// Reads a `payloadType` or `payloadSize` field: every `0xff` adds 255 and the first other byte is
/// added as the last increment.
///
/// Returns `None` without a terminating byte.
pub fn read_ff_coded(rbsp: &[u8], offset: &mut usize) -> Option<u32> {
    let mut value = 0u32;

    loop {
        let byte = *rbsp.get(*offset)?;
        *offset += 1;
        value = value.saturating_add(u32::from(byte));

        if byte != FF_BYTE {
            return Some(value);
        }
    }
}

/// Inverse of `read_ff_coded`.
pub fn write_ff_coded(mut value: u32, out: &mut Vec<u8>) {
    while value >= u32::from(FF_BYTE) {
        out.push(FF_BYTE);
        value -= u32::from(FF_BYTE);
    }
    out.push(value as u8);
}

/// Parses the `sei_message()` list of a SEI RBSP (header byte and emulation prevention already
/// removed).
///
/// Parsing stops early, keeping what was decoded so far, when a field or a payload runs past the
/// end of `rbsp`. After each message, a next byte equal to `RBSP_STOP_MARKER` ends the list. A
/// following message of a payload type starting with `0x80` is therefore never seen.
pub fn parse_sei_messages(rbsp: &[u8]) -> Vec<SeiMessage<'_>> {
    let mut messages = Vec::new();
    let mut offset = 0usize;

    while offset + 2 <= rbsp.len() {
        let Some(payload_type) = read_ff_coded(rbsp, &mut offset) else {
            debug!(offset, "SEI payloadType runs past the end of the RBSP");
            break;
        };
        let Some(payload_size) = read_ff_coded(rbsp, &mut offset) else {
            debug!(offset, payload_type, "SEI payloadSize runs past the end of the RBSP");
            break;
        };

        let payload_size = payload_size as usize;
        if payload_size > rbsp.len() - offset {
            debug!(
                payload_type,
                payload_size,
                remaining = rbsp.len() - offset,
                "truncated SEI payload"
            );
            break;
        }

        messages.push(SeiMessage {
            payload_type,
            payload: &rbsp[offset..offset + payload_size],
        });
        offset += payload_size;

        if rbsp.get(offset) == Some(&RBSP_STOP_MARKER) {
            break;
        }
    }

    messages
}

/// Appends one `sei_message()` to an RBSP under construction.
pub fn write_sei_message(payload_type: u32, payload: &[u8], rbsp: &mut Vec<u8>) {
    write_ff_coded(payload_type, rbsp);
    // Payloads longer than u32::MAX cannot be described.
    write_ff_coded(payload.len() as u32, rbsp);
    rbsp.extend_from_slice(payload);
}

/// Builds a complete SEI NAL unit (header byte, escaped messages, trailing bits) carrying
/// `messages` in order. Prepending a start code makes it a byte stream NAL unit.
pub fn sei_nal_unit(messages: &[SeiMessage<'_>]) -> Vec<u8> {
    let mut rbsp = Vec::new();
    for message in messages {
        write_sei_message(message.payload_type, message.payload, &mut rbsp);
    }
    rbsp.push(RBSP_STOP_MARKER);

    let mut nal_unit = Vec::with_capacity(rbsp.len() + 1);
    nal_unit.push(SEI_NAL_HEADER);
    nal_unit.extend(add_emulation_prevention(&rbsp));
    nal_unit
}
