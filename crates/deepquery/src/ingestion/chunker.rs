//! Positional text chunking with overlapping windows

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};

/// Split text into overlapping fixed-size windows.
///
/// Windows are measured in characters and advance by `size - overlap` each
/// step. Text no longer than one window comes back as a single chunk. No
/// sentence or paragraph awareness; downstream enrichment compensates.
pub fn chunk_text(text: &str, options: &ChunkingConfig) -> Result<Vec<String>> {
    let size = options.chunk_size;
    let overlap = options.chunk_overlap;

    if size == 0 {
        return Err(Error::Config("chunk_size must be positive".to_string()));
    }
    // A non-positive stride would never terminate.
    if overlap >= size {
        return Err(Error::Config(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            overlap, size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= size {
        return Ok(vec![text.to_string()]);
    }

    let stride = size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += stride;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size: size,
            chunk_overlap: overlap,
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("hello", &options(10, 2)).unwrap();
        assert_eq!(chunks, vec!["hello"]);
    }

    #[test]
    fn text_equal_to_window_is_a_single_chunk() {
        let chunks = chunk_text("abcd", &options(4, 2)).unwrap();
        assert_eq!(chunks, vec!["abcd"]);
    }

    #[test]
    fn windows_slide_by_stride() {
        let chunks = chunk_text("abcdefghij", &options(4, 2)).unwrap();
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij", "ij"]);
    }

    #[test]
    fn overlap_equal_to_size_is_rejected() {
        assert!(chunk_text("abcdefghij", &options(4, 4)).is_err());
        assert!(chunk_text("abcdefghij", &options(4, 5)).is_err());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(chunk_text("abc", &options(0, 0)).is_err());
    }

    #[test]
    fn multibyte_text_chunks_on_char_boundaries() {
        let text = "héllo wörld, ünïcode tëxt here";
        let chunks = chunk_text(text, &options(8, 2)).unwrap();
        let reassembled: String = chunks[0].chars().take(8).collect();
        assert_eq!(reassembled, "héllo wö");
        // Consecutive windows share exactly the overlap.
        let tail: String = chunks[0].chars().skip(6).collect();
        let head: String = chunks[1].chars().take(2).collect();
        assert_eq!(tail, head);
    }
}
