//! The assembled object image and its on-disk byte format.
//!
//! An object stream is a sequence of linked blocks, each a big-endian
//! origin address, a big-endian word count, and `count` big-endian data
//! words to place starting at the origin. The stream ends at end-of-input
//! or at an origin word of `xFFFF`. Multiple blocks may load disjoint
//! regions; loading touches only the addressed cells.
//!
//! [`ObjectFile::read`] parses a stream into an [`ObjectFile`], which the
//! simulator then copies into memory (see [`Simulator::load_obj_file`]).
//!
//! [`Simulator::load_obj_file`]: crate::sim::Simulator::load_obj_file

use std::collections::BTreeMap;

/// The sentinel origin word that terminates an object stream.
const END_MARKER: u16 = 0xFFFF;

/// Errors that can occur while parsing an object stream.
///
/// Any of these is fatal to the load attempt: memory is left at whatever
/// partial writes occurred, and the caller must not run the machine until a
/// fresh, valid load.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoadError {
    /// The stream ended in the middle of a block header or data run.
    UnexpectedEof,
    /// A block's word count does not fit the format's 8-bit count.
    BlockTooLong {
        /// Origin address of the offending block.
        origin: u16,
        /// The count field as read from the stream.
        count: u16,
    },
}
impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::UnexpectedEof => f.write_str("object stream ended mid-block"),
            LoadError::BlockTooLong { origin, count } => {
                write!(f, "block at x{origin:04X} declares {count} words (max 255)")
            }
        }
    }
}
impl std::error::Error for LoadError {}

/// An assembled program image: a set of address-tagged word runs.
///
/// Invariants:
/// - Blocks are kept sorted by origin address.
/// - Each block holds at most 255 words (the format's count is 8-bit).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectFile {
    block_map: BTreeMap<u16, Vec<u16>>,
}

impl ObjectFile {
    /// Creates an empty object file.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses an object byte stream.
    ///
    /// ```
    /// use lc3_solo::obj::ObjectFile;
    ///
    /// // One block: origin x3000, two words.
    /// let stream = [0x30, 0x00, 0x00, 0x02, 0x10, 0x21, 0xF0, 0x25];
    /// let obj = ObjectFile::read(&stream).unwrap();
    /// let blocks: Vec<_> = obj.block_iter().collect();
    /// assert_eq!(blocks, [(0x3000, &[0x1021, 0xF025][..])]);
    /// ```
    pub fn read(mut stream: &[u8]) -> Result<Self, LoadError> {
        let mut block_map = BTreeMap::new();

        loop {
            let origin = match take_word(&mut stream) {
                Some(w) if w != END_MARKER => w,
                _ => break,
            };
            let count = take_word(&mut stream).ok_or(LoadError::UnexpectedEof)?;
            if count > 0xFF {
                return Err(LoadError::BlockTooLong { origin, count });
            }

            let mut words = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                words.push(take_word(&mut stream).ok_or(LoadError::UnexpectedEof)?);
            }
            block_map.insert(origin, words);
        }

        Ok(Self { block_map })
    }

    /// Serializes this object file back into the stream format,
    /// including the end marker.
    pub fn to_stream(&self) -> Vec<u8> {
        let mut bytes = vec![];
        for (origin, words) in self.block_iter() {
            bytes.extend(origin.to_be_bytes());
            bytes.extend((words.len() as u16).to_be_bytes());
            for &word in words {
                bytes.extend(word.to_be_bytes());
            }
        }
        bytes.extend(END_MARKER.to_be_bytes());
        bytes
    }

    /// Iterates over the blocks in origin-address order.
    pub fn block_iter(&self) -> impl Iterator<Item = (u16, &[u16])> {
        self.block_map.iter().map(|(&origin, words)| (origin, words.as_slice()))
    }
}

/// Pulls one big-endian word off the front of the stream.
///
/// A single trailing byte counts as end-of-stream here; callers that needed
/// the word report [`LoadError::UnexpectedEof`] themselves.
fn take_word(stream: &mut &[u8]) -> Option<u16> {
    let (&[hi, lo], rest) = try_split_at(stream)?;
    *stream = rest;
    Some(u16::from_be_bytes([hi, lo]))
}
fn try_split_at(data: &[u8]) -> Option<(&[u8; 2], &[u8])> {
    if data.len() < 2 { return None; }
    let (left, right) = data.split_at(2);
    Some((left.try_into().ok()?, right))
}
