//! Fixed-size, overlapping text chunker.
//!
//! Splits one string into [`Chunk`]s by pure character-offset arithmetic:
//! chunk `i` starts at `i * (chunk_size - overlap)` and spans `chunk_size`
//! characters, except the last chunk which ends at the end of the text.
//! No attempt is made to align chunks with words or paragraphs.
//!
//! Offsets count `char`s, so a chunk never splits a multi-byte code point.

use crate::error::{Error, Result};
use crate::models::Chunk;

/// Split `text` into overlapping chunks.
///
/// Returns [`Error::InvalidChunking`] when `chunk_size` is zero or
/// `overlap >= chunk_size`, since the start offset would never advance.
/// Empty text yields an empty vector.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 || overlap >= chunk_size {
        return Err(Error::InvalidChunking {
            chunk_size,
            overlap,
        });
    }

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = bounds.len() - 1;
    let step = chunk_size - overlap;

    let chunks = (0..char_len)
        .step_by(step)
        .enumerate()
        .map(|(index, start)| {
            let end = (start + chunk_size).min(char_len);
            Chunk {
                index,
                start,
                len: end - start,
                text: text[bounds[start]..bounds[end]].to_string(),
            }
        })
        .collect();

    Ok(chunks)
}
