use crate::nal_unit::NalUnit;

/// Definitions of `nal_unit_type` pulled from Table 7-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NalUnitType {
    Unspecified,
    CodedSliceNonIDRPicture,
    CodedSliceDataPartitionA,
    CodedSliceDataPartitionB,
    CodedSliceDataPartitionC,
    CodedSliceIDRPicture,
    SupplementalEnhancementInformation,
    SequenceParameterSet,
    PictureParameterSet,
    AccessUnitDelimiter,
    SequenceEnd,
    StreamEnd,
    FillerData,
    SequenceParameterSetExtension,
    PrefixNALUnit,
    SubsetSequenceParameterSet,
    DepthParameterSet,
    Reserved,
    CodedSliceAuxiliaryCodedPictureNonPartitioning,
    CodedSliceExtension,
    CodedSliceExtensionDepthViewComponent,
}

impl NalUnitType {
    /// Only the low five bits of `nal_unit_type` are considered.
    pub fn from_nal_unit_type(nal_unit_type: u8) -> Self {
        match nal_unit_type & 0b0001_1111 {
            1 => NalUnitType::CodedSliceNonIDRPicture,
            2 => NalUnitType::CodedSliceDataPartitionA,
            3 => NalUnitType::CodedSliceDataPartitionB,
            4 => NalUnitType::CodedSliceDataPartitionC,
            5 => NalUnitType::CodedSliceIDRPicture,
            6 => NalUnitType::SupplementalEnhancementInformation,
            7 => NalUnitType::SequenceParameterSet,
            8 => NalUnitType::PictureParameterSet,
            9 => NalUnitType::AccessUnitDelimiter,
            10 => NalUnitType::SequenceEnd,
            11 => NalUnitType::StreamEnd,
            12 => NalUnitType::FillerData,
            13 => NalUnitType::SequenceParameterSetExtension,
            14 => NalUnitType::PrefixNALUnit,
            15 => NalUnitType::SubsetSequenceParameterSet,
            16 => NalUnitType::DepthParameterSet,
            17 | 18 | 22 | 23 => NalUnitType::Reserved,
            19 => NalUnitType::CodedSliceAuxiliaryCodedPictureNonPartitioning,
            20 => NalUnitType::CodedSliceExtension,
            21 => NalUnitType::CodedSliceExtensionDepthViewComponent,
            _ => NalUnitType::Unspecified,
        }
    }

    pub fn is_slice(&self) -> bool {
        matches!(
            self,
            NalUnitType::CodedSliceNonIDRPicture
                | NalUnitType::CodedSliceDataPartitionA
                | NalUnitType::CodedSliceIDRPicture
        )
    }
}

/// Converts an escaped NAL unit payload (header excluded) into its raw byte sequence payload.
///
/// Any `0x03` that follows two or more consecutive zero bytes is an `EMULATION_PREVENTION_BYTE` and
/// is dropped; the zero run restarts after it.
pub fn remove_emulation_prevention(payload: &[u8]) -> Vec<u8> {
    let mut rbsp = Vec::with_capacity(payload.len());
    let mut zero_run = 0usize;

    for &byte in payload {
        if zero_run >= 2 && byte == NalUnit::EMULATION_PREVENTION_BYTE {
            zero_run = 0;
            continue;
        }

        rbsp.push(byte);
        match byte {
            0x00 => zero_run += 1,
            _ => zero_run = 0,
        }
    }

    rbsp
}

/// Escapes a raw byte sequence payload so that it can be placed after a NAL unit header.
///
/// An `EMULATION_PREVENTION_BYTE` is inserted wherever two zero bytes are followed by a byte in
/// `0x00..=0x03`, which is what an encoder does and what `remove_emulation_prevention` undoes.
pub fn add_emulation_prevention(rbsp: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(rbsp.len() + rbsp.len() / 64);
    let mut zero_run = 0usize;

    for &byte in rbsp {
        if zero_run >= 2 && byte <= NalUnit::EMULATION_PREVENTION_BYTE {
            payload.push(NalUnit::EMULATION_PREVENTION_BYTE);
            zero_run = 0;
        }

        payload.push(byte);
        match byte {
            0x00 => zero_run += 1,
            _ => zero_run = 0,
        }
    }

    payload
}
