//! Document assembly and sliding-window chunking

use crate::error::PipelineError;

/// Separator inserted between fragments when rebuilding the document
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Join pre-split text fragments into one normalized document string.
///
/// Fragments are trimmed, empty fragments are dropped, and the rest are
/// joined with [`CHUNK_SEPARATOR`]. Whitespace-only input yields an
/// empty string, which the orchestrator treats as "nothing to analyze".
pub fn assemble_document<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.as_ref().trim())
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

/// Split text into an ordered sequence of overlapping windows.
///
/// Consecutive chunks share `overlap` characters so that statements
/// spanning a boundary appear whole in at least one chunk. The window
/// advances by `chunk_size - overlap` characters, so `chunk_size` must
/// exceed `overlap`.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, PipelineError> {
    if chunk_size <= overlap {
        return Err(PipelineError::Config(format!(
            "chunk_size ({chunk_size}) must be greater than overlap ({overlap})"
        )));
    }

    // Window over characters, not bytes, so multi-byte text never splits
    // mid-character.
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_joins_with_separator() {
        let doc = assemble_document(&["first chunk", "second chunk"]);
        assert_eq!(doc, "first chunk\n\n---\n\nsecond chunk");
    }

    #[test]
    fn test_assemble_trims_and_drops_empty_fragments() {
        let doc = assemble_document(&["  first  ", "", "   ", "second"]);
        assert_eq!(doc, "first\n\n---\n\nsecond");
    }

    #[test]
    fn test_assemble_empty_input() {
        let fragments: Vec<String> = vec![];
        assert_eq!(assemble_document(&fragments), "");
        assert_eq!(assemble_document(&["  ", "\n"]), "");
    }

    #[test]
    fn test_chunk_size_must_exceed_overlap() {
        assert!(chunk_text("abc", 10, 10).is_err());
        assert!(chunk_text("abc", 5, 10).is_err());
    }

    #[test]
    fn test_chunks_cover_input_with_overlap() {
        let text = "abcdefghij";
        let chunks = chunk_text(text, 4, 2).unwrap();
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij"]);
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunks = chunk_text("short", 100, 10).unwrap();
        assert_eq!(chunks, vec!["short"]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunks = chunk_text("", 100, 10).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_multibyte_text_chunks_on_char_boundaries() {
        let text = "éééééééééé";
        let chunks = chunk_text(text, 4, 1).unwrap();
        assert_eq!(chunks[0].chars().count(), 4);
        let rejoined_len: usize = chunks.iter().map(|c| c.chars().count()).sum();
        assert!(rejoined_len >= text.chars().count());
    }
}
