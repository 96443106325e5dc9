//! Decode a result code back into match-state rows

use crate::core::{DecodeError, StateRow, decode, decode_strict};

/// Decoded code plus the rows it describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub code: String,
    pub rows: Vec<StateRow>,
}

/// Decode `code`, leniently unless `strict` is set
///
/// # Errors
/// Only in strict mode, on a partial row or an unknown character.
pub fn decode_code(code: &str, strict: bool) -> Result<DecodeResult, DecodeError> {
    let code = code.trim().to_ascii_uppercase();
    let rows = if strict {
        decode_strict(&code)?
    } else {
        decode(&code)
    };
    Ok(DecodeResult { code, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileState;

    #[test]
    fn lenient_drops_partial_row() {
        let result = decode_code("xyxxgggggggg", false).unwrap();
        assert_eq!(result.code, "XYXXGGGGGGGG");
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1], [TileState::Correct; 5]);
    }

    #[test]
    fn strict_rejects_partial_row() {
        assert_eq!(
            decode_code("GGGGGGG", true),
            Err(DecodeError::TrailingChunk { length: 7 })
        );
        assert!(decode_code("GGGGG", true).is_ok());
    }
}
