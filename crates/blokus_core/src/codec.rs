//! Compact wire encodings for the grid and candidate cell lists.
//!
//! The grid travels as 400 row-major occupant codes (see
//! [`Board::codes`](crate::Board::codes)). Cell lists are a little-endian
//! `u32` count followed by that many `(i32 x, i32 y)` pairs.

use super::grid::Cell;
use tracing::{debug, instrument};

const COUNT_WIDTH: usize = 4;
const PAIR_WIDTH: usize = 8;

/// Error decoding wire data.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CodecError {
    /// A grid payload did not hold exactly one code per cell.
    #[display("Grid must hold {} codes, got {}", expected, actual)]
    GridLength {
        /// Required number of codes.
        expected: usize,
        /// Number of codes received.
        actual: usize,
    },

    /// An occupant code outside -1..=3.
    #[display("Unknown occupant code {}", _0)]
    UnknownOccupant(i8),

    /// The payload ended before the declared content.
    #[display("Truncated payload: needed {} bytes, had {}", needed, available)]
    Truncated {
        /// Bytes the header promised.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },

    /// Bytes left over after the declared content.
    #[display("{} trailing bytes after cell list", _0)]
    TrailingBytes(usize),
}

impl std::error::Error for CodecError {}

/// Encodes a candidate cell list as a count-prefixed sequence of pairs.
#[instrument(skip(cells), fields(count = cells.len()))]
pub fn encode_cells(cells: &[Cell]) -> Vec<u8> {
    let mut out = Vec::with_capacity(COUNT_WIDTH + cells.len() * PAIR_WIDTH);
    out.extend_from_slice(&(cells.len() as u32).to_le_bytes());
    for cell in cells {
        out.extend_from_slice(&cell.x.to_le_bytes());
        out.extend_from_slice(&cell.y.to_le_bytes());
    }
    out
}

/// Decodes a cell list written by [`encode_cells`].
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_cells(bytes: &[u8]) -> Result<Vec<Cell>, CodecError> {
    let (header, body) = split(bytes, COUNT_WIDTH)?;
    let count = u32::from_le_bytes(array(header)) as usize;

    let needed = count
        .checked_mul(PAIR_WIDTH)
        .ok_or(CodecError::Truncated {
            needed: usize::MAX,
            available: body.len(),
        })?;
    let (pairs, rest) = split(body, needed)?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes(rest.len()));
    }

    let cells: Vec<Cell> = pairs
        .chunks_exact(PAIR_WIDTH)
        .map(|pair| {
            let x = i32::from_le_bytes(array(&pair[..4]));
            let y = i32::from_le_bytes(array(&pair[4..]));
            Cell::new(x, y)
        })
        .collect();
    debug!(count = cells.len(), "Decoded cell list");
    Ok(cells)
}

fn split(bytes: &[u8], at: usize) -> Result<(&[u8], &[u8]), CodecError> {
    if bytes.len() < at {
        return Err(CodecError::Truncated {
            needed: at,
            available: bytes.len(),
        });
    }
    Ok(bytes.split_at(at))
}

fn array(bytes: &[u8]) -> [u8; 4] {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let bytes = encode_cells(&[Cell::new(1, -2)]);
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1i32.to_le_bytes());
        assert_eq!(&bytes[8..], &(-2i32).to_le_bytes());
    }

    #[test]
    fn test_decode_keeps_order_and_off_board_cells() {
        let cells = vec![Cell::new(20, 5), Cell::new(0, 0), Cell::new(3, 19)];
        assert_eq!(decode_cells(&encode_cells(&cells)), Ok(cells));
    }

    #[test]
    fn test_empty_list() {
        let bytes = encode_cells(&[]);
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert_eq!(decode_cells(&bytes), Ok(vec![]));
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(
            decode_cells(&[1, 0]),
            Err(CodecError::Truncated {
                needed: 4,
                available: 2
            })
        );
    }

    #[test]
    fn test_truncated_body() {
        let mut bytes = encode_cells(&[Cell::new(1, 1), Cell::new(2, 2)]);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            decode_cells(&bytes),
            Err(CodecError::Truncated { needed: 16, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = encode_cells(&[Cell::new(1, 1)]);
        bytes.push(0xff);
        assert_eq!(decode_cells(&bytes), Err(CodecError::TrailingBytes(1)));
    }
}
