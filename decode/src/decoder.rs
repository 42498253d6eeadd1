use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use common::{MetadataRecord, NalUnit};
use memmap::Mmap;
use serde::Serialize;
use tracing::debug;

use crate::byte_stream::ByteStream;
use crate::errors::DecodingError;
use crate::metadata::{extract_metadata, parse_metadata_text, UserDataUnregistered};
use crate::sei::{parse_sei_messages, SeiMessage};

enum StreamData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for StreamData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            StreamData::Mapped(mmap) => &mmap[..],
            StreamData::Owned(bytes) => &bytes[..],
        }
    }
}

/// One user data unregistered SEI message, as listed by `user_data_entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDataEntry {
    /// Position of the carrying NAL unit among all NAL units of the stream.
    pub nal_index: usize,

    /// Byte offset of the carrying NAL unit's header within the stream.
    pub nal_offset: usize,

    pub uuid: String,
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

/// Calls `f` with every SEI message of every SEI NAL unit, in stream order.
fn for_each_sei_message<F>(data: &[u8], mut f: F)
where
    F: FnMut(usize, &NalUnit<'_>, &SeiMessage<'_>),
{
    for (nal_index, nal_unit) in ByteStream::new(data).enumerate() {
        if !nal_unit.is_sei() {
            continue;
        }

        let rbsp = nal_unit.rbsp();
        let messages = parse_sei_messages(&rbsp);
        debug!(
            nal_index,
            offset = nal_unit.offset(),
            messages = messages.len(),
            "SEI NAL unit"
        );

        for message in &messages {
            f(nal_index, &nal_unit, message);
        }
    }
}

/// Runs the whole extraction pipeline over an Annex B byte stream and returns the per-frame
/// metadata records in bitstream order.
pub fn extract_metadata_records(data: &[u8]) -> Vec<MetadataRecord> {
    let mut records = Vec::new();
    for_each_sei_message(data, |_, _, message| {
        records.extend(extract_metadata(message));
    });
    records
}

/// Lists every user data unregistered SEI message of an Annex B byte stream, whether or not it
/// carries per-frame metadata.
pub fn user_data_entries(data: &[u8]) -> Vec<UserDataEntry> {
    let mut entries = Vec::new();
    for_each_sei_message(data, |nal_index, nal_unit, message| {
        let Some(user_data) = UserDataUnregistered::from_sei_message(message) else {
            return;
        };

        let text = user_data.text();
        let fields = parse_metadata_text(&text);
        entries.push(UserDataEntry {
            nal_index,
            nal_offset: nal_unit.offset(),
            uuid: user_data.uuid_hex(),
            frame_id: fields.map(|(frame_id, _)| frame_id),
            timestamp_ms: fields.map(|(_, timestamp_ms)| timestamp_ms),
            text,
        });
    });
    entries
}

/// Owns the bytes of one H.264 Annex B elementary stream, memory mapped when read from a file.
pub struct H264Decoder {
    data: StreamData,
}

impl H264Decoder {
    pub fn from_file(file: File) -> Result<Self, DecodingError> {
        // Zero-length files cannot be mapped.
        if file.metadata()?.len() == 0 {
            return Ok(Self::from_bytes(Vec::new()));
        }

        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            data: StreamData::Mapped(mmap),
        })
    }

    pub fn from_file_path<P: AsRef<Path>>(file_path: P) -> Result<Self, DecodingError> {
        let file_path = file_path.as_ref();
        if !file_path.is_file() {
            return Err(DecodingError::UnrecognizedFilePath(file_path.to_path_buf()));
        }

        let file = File::open(file_path)?;
        H264Decoder::from_file(file)
    }

    /// Wraps a stream already in memory, e.g. captured from a remux process.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data: StreamData::Owned(data),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn nal_units(&self) -> ByteStream<'_> {
        ByteStream::new(&self.data)
    }

    pub fn decode(&self) -> Vec<MetadataRecord> {
        extract_metadata_records(&self.data)
    }

    pub fn user_data(&self) -> Vec<UserDataEntry> {
        user_data_entries(&self.data)
    }
}
