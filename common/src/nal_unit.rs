use crate::rbsp::{remove_emulation_prevention, NalUnitType};

/// `NalUnit` is a syntax structure containing an indication of the type of data to follow and bytes
/// containing that data in the form of an `RBSP` interspersed as necessary with
/// `EMULATION_PREVENTION_BYTE`.
///
/// A `NalUnit` borrows from the byte stream it was carved out of and never owns or mutates it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NalUnit<'a> {
    /// Position of the header byte within the source byte stream.
    offset: usize,

    /// Header byte followed by the escaped payload, start code excluded.
    data: &'a [u8],
}

impl<'a> NalUnit<'a> {
    /// A unique sequence of three bytes equal to `0x000001` embedded in the byte stream as a prefix
    /// to each `NalUnit`. The location of a `START_CODE_PREFIX` can be used by a decoder to identify
    /// the beginning of a new `NalUnit` and the end of a previous one. Emulation of start code
    /// prefixes is prevented within NAL units by the inclusion of `EMULATION_PREVENTION_BYTE`.
    pub const START_CODE_PREFIX: [u8; 3] = [0x00, 0x00, 0x01];

    /// `zero_byte` followed by `START_CODE_PREFIX`, the four-byte form of the start code.
    pub const LONG_START_CODE_PREFIX: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

    /// A byte equal to 0x03 that may be present within a `NalUnit`.
    /// The presence of this byte ensures no sequence of consecutive byte-aligned bytes in the
    /// `NalUnit` contains a `START_CODE_PREFIX`.
    pub const EMULATION_PREVENTION_BYTE: u8 = 0x03;

    /// `data` must be non-empty; its first byte is the NAL unit header.
    pub fn new(offset: usize, data: &'a [u8]) -> Self {
        debug_assert!(!data.is_empty(), "a NalUnit needs at least its header byte");
        Self { offset, data }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Header and escaped payload, exactly as they appear in the byte stream.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn header(&self) -> u8 {
        self.data[0]
    }

    /// `forbidden_zero_bit` shall be equal to 0.
    pub fn forbidden_zero_bit(&self) -> bool {
        self.header() >> 7 == 1
    }

    /// `nal_ref_idc` not equal to 0 specifies that the content of the NAL unit contains a parameter
    /// set or a slice (data partition) of a reference picture.
    ///
    /// `nal_ref_idc` shall be equal to 0 for all NAL units having `nal_unit_type` equal to 6, 9, 10,
    /// 11, or 12.
    pub fn nal_ref_idc(&self) -> u8 {
        (self.header() >> 5) & 0b11
    }

    /// `nal_unit_type` specifies the type of `RBSP` data structure contained in the NAL unit.
    pub fn nal_unit_type(&self) -> u8 {
        self.header() & 0b0001_1111
    }

    pub fn kind(&self) -> NalUnitType {
        NalUnitType::from_nal_unit_type(self.nal_unit_type())
    }

    pub fn is_sei(&self) -> bool {
        self.kind() == NalUnitType::SupplementalEnhancementInformation
    }

    /// Escaped payload with the one-byte header removed.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[1..]
    }

    /// Allocates the raw byte sequence payload, i.e. `payload` with every emulation prevention byte
    /// removed.
    pub fn rbsp(&self) -> Vec<u8> {
        remove_emulation_prevention(self.payload())
    }
}
