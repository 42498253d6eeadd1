use common::NalUnit;

/// `ByteStream` is an encapsulation of a NAL unit stream containing `START_CODE_PREFIX` and `NalUnit`.
///
/// Iterating a `ByteStream` yields every non-empty `NalUnit` in stream order. Each unit starts right
/// after its start code and ends right before the next start code, or at the end of the data.
#[derive(Debug, Clone)]
pub struct ByteStream<'a> {
    cursor: usize,
    data: &'a [u8],
}

impl<'a> ByteStream<'a> {
    /// `data` must be an ordered stream of bytes consisting of a sequence of byte stream `NalUnit` syntax structures.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    /// Returns the offset and length of the first start code at or after `from`.
    ///
    /// A `zero_byte` directly in front of `START_CODE_PREFIX` makes it the four-byte form.
    fn find_start_code(&self, from: usize) -> Option<(usize, usize)> {
        let mut pos = from;

        while pos + NalUnit::START_CODE_PREFIX.len() <= self.data.len() {
            /*
            No start code can begin at pos, pos + 1 or pos + 2 when the third byte is above 0x01:
                [pos] [pos + 1] [pos + 2 > 0x01]
            so the scan can move past all three at once.
             */
            if self.data[pos + 2] > 0x01 {
                pos += 3;
                continue;
            }

            let window = &self.data[pos..];
            if window.starts_with(&NalUnit::LONG_START_CODE_PREFIX) {
                return Some((pos, NalUnit::LONG_START_CODE_PREFIX.len()));
            }
            if window.starts_with(&NalUnit::START_CODE_PREFIX) {
                return Some((pos, NalUnit::START_CODE_PREFIX.len()));
            }

            pos += 1;
        }

        None
    }
}

impl<'a> Iterator for ByteStream<'a> {
    type Item = NalUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((start, len)) = self.find_start_code(self.cursor) else {
                self.cursor = self.data.len();
                return None;
            };

            let begin = start + len;
            let end = self
                .find_start_code(begin)
                .map_or(self.data.len(), |(next_start, _)| next_start);
            self.cursor = end;

            // Adjacent start codes carry nothing.
            if end > begin {
                return Some(NalUnit::new(begin, &self.data[begin..end]));
            }
        }
    }
}

/// Splits an Annex B byte stream into its NAL units, preserving stream order.
///
/// Data without any start code, including anything shorter than four bytes, yields no units.
pub fn split_nal_units(data: &[u8]) -> Vec<NalUnit<'_>> {
    ByteStream::new(data).collect()
}
