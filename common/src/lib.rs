//! Bitstream primitives shared by the SEI metadata verifier: the NAL unit header view, the
//! `nal_unit_type` table, emulation prevention and the per-frame record types.

mod nal_unit;
mod rbsp;
mod record;

pub use nal_unit::NalUnit;
pub use rbsp::{add_emulation_prevention, remove_emulation_prevention, NalUnitType};
pub use record::{MetadataRecord, ReferenceRecord};
