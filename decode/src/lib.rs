//! Extracts per-frame `frame_id=<int>;timestamp_ms=<int>` metadata from the user data
//! unregistered SEI messages of an H.264 Annex B elementary stream and checks it, position by
//! position, against the ground-truth rows written next to the stream.
//!
//! The pipeline is a chain of plain functions over borrowed bytes:
//! `ByteStream` → `NalUnit::rbsp` → `parse_sei_messages` → `extract_metadata` → `compare`.

pub mod byte_stream;
pub mod compare;
pub mod decoder;
pub mod errors;
pub mod metadata;
pub mod reference;
pub mod sei;

pub use byte_stream::{split_nal_units, ByteStream};
pub use compare::{compare, ComparisonReport};
pub use decoder::{extract_metadata_records, user_data_entries, H264Decoder, UserDataEntry};
pub use errors::{DecodingError, ReferenceError};
pub use metadata::{extract_metadata, parse_metadata_text, UserDataUnregistered};
pub use reference::{read_reference_file, read_reference_rows};
pub use sei::{parse_sei_messages, SeiMessage};
