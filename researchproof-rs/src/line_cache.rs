//! Utilities for source-offset/line-number mapping.

use crate::util::HashMap;
use std::convert::TryFrom;

/// An object for repeated byte offset to line conversions.
///
/// The first time a query is made for a given buffer, the offsets of all line
/// starts are recorded; subsequent queries binary-search that index.
///
/// This is expected to be a very short-lived object.  Buffers are identified by
/// address and length, so the cache must not outlive the buffers it was
/// queried against.
#[derive(Default, Debug)]
pub struct LineCache {
    map: HashMap<(usize, usize), Vec<usize>>,
}

fn make_index(buf: &str) -> Vec<usize> {
    let mut out = vec![0];
    out.extend(
        buf.bytes()
            .enumerate()
            .filter(|&(_, ch)| ch == b'\n')
            .map(|(pos, _)| pos + 1),
    );
    out
}

impl LineCache {
    fn get_index(&mut self, buf: &str) -> &Vec<usize> {
        self.map
            .entry((buf.as_ptr() as usize, buf.len()))
            .or_insert_with(|| make_index(buf))
    }

    /// Map a buffer index to a 1-based (line, column) pair.  Columns count
    /// bytes.
    /// ## Panics
    /// Panics if the buffer has more than 4G lines or columns.
    #[must_use]
    pub fn from_offset(&mut self, buf: &str, offset: usize) -> (u32, u32) {
        let index = self.get_index(buf);
        let line = index.partition_point(|&start| start <= offset) - 1;
        let col = offset - index[line];
        (
            u32::try_from(line + 1).unwrap(),
            u32::try_from(col + 1).unwrap(),
        )
    }

    /// Find the offset just after the end of the line (usually the
    /// location of a '\n', unless we are at the end of the file).
    #[must_use]
    pub fn line_end(buf: &str, offset: usize) -> usize {
        buf.bytes()
            .enumerate()
            .skip(offset)
            .find(|&(_, ch)| ch == b'\n')
            .map_or(buf.len(), |(pos, _)| pos)
    }
}
