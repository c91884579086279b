//! Polyomino shapes, pieces, and the piece catalog.
//!
//! A [`Shape`] is an ordered list of offsets anchored at `(0, 0)`.
//! Rotating or flipping yields a new shape; shapes are never edited in
//! place, so a shape captured with a placement attempt cannot change
//! underneath validation.

use super::grid::Cell;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

/// Identifier of a piece within its owner's inventory.
pub type PieceId = u32;

/// Relative cell offsets making up a polyomino.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape {
    offsets: Vec<Cell>,
}

impl Shape {
    /// Creates a shape from offsets.
    pub fn new(offsets: Vec<Cell>) -> Self {
        Self { offsets }
    }

    /// Creates a shape from `(dx, dy)` pairs.
    pub fn from_pairs(pairs: &[(i32, i32)]) -> Self {
        Self::new(pairs.iter().map(|&(x, y)| Cell::new(x, y)).collect())
    }

    /// Returns the offsets in order.
    pub fn offsets(&self) -> &[Cell] {
        &self.offsets
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True for a shape with no cells.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Quarter turn: `(dx, dy) -> (-dy, dx)`.
    pub fn rotated(&self) -> Shape {
        Shape::new(
            self.offsets
                .iter()
                .map(|c| Cell::new(-c.y, c.x))
                .collect(),
        )
    }

    /// Mirror across the vertical axis: `(dx, dy) -> (-dx, dy)`.
    pub fn flipped(&self) -> Shape {
        Shape::new(
            self.offsets
                .iter()
                .map(|c| Cell::new(-c.x, c.y))
                .collect(),
        )
    }

    /// All distinct rotations and reflections about the anchor, this
    /// orientation first.
    #[instrument(skip(self), fields(cells = self.len()))]
    pub fn orientations(&self) -> Vec<Shape> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(8);
        let mut current = self.clone();
        for _ in 0..2 {
            for _ in 0..4 {
                if seen.insert(current.cell_set()) {
                    out.push(current.clone());
                }
                current = current.rotated();
            }
            current = current.flipped();
        }
        out
    }

    /// True if `self` covers the same offsets as some orientation of `base`.
    #[instrument(skip_all)]
    pub fn is_orientation_of(&self, base: &Shape) -> bool {
        if self.len() != base.len() {
            return false;
        }
        let target = self.cell_set();
        base.orientations()
            .iter()
            .any(|orientation| orientation.cell_set() == target)
    }

    /// Board cells covered when anchored at `anchor`, in offset order.
    ///
    /// The result may contain off-board cells. Returns `None` when a
    /// coordinate does not fit in an `i32`.
    pub fn footprint(&self, anchor: Cell) -> Option<Vec<Cell>> {
        self.offsets
            .iter()
            .map(|offset| anchor.checked_add(*offset))
            .collect()
    }

    fn cell_set(&self) -> BTreeSet<Cell> {
        self.offsets.iter().copied().collect()
    }
}

/// A piece in a player's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Piece {
    /// Inventory id.
    id: PieceId,
    /// Catalog name.
    name: String,
    /// Shape in catalog orientation.
    shape: Shape,
    /// Points awarded on placement.
    points: u32,
    /// Set once the piece is on the board; never cleared.
    placed: bool,
}

impl Piece {
    /// Creates an unplaced piece worth one point per cell.
    #[instrument(skip(shape))]
    pub fn new(id: PieceId, name: &str, shape: Shape) -> Self {
        let points = shape.len() as u32;
        Self {
            id,
            name: name.to_string(),
            shape,
            points,
            placed: false,
        }
    }

    /// Marks the piece as placed.
    pub(crate) fn mark_placed(&mut self) {
        self.placed = true;
    }
}

/// Catalog entry: name and offsets in their base orientation.
struct CatalogEntry {
    name: &'static str,
    offsets: &'static [(i32, i32)],
}

/// Pieces handed out in order.
const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "monomino",
        offsets: &[(0, 0)],
    },
    CatalogEntry {
        name: "domino",
        offsets: &[(0, 0), (1, 0)],
    },
    CatalogEntry {
        name: "i-tromino",
        offsets: &[(0, 0), (1, 0), (2, 0)],
    },
    CatalogEntry {
        name: "l-tromino",
        offsets: &[(0, 0), (1, 0), (0, 1)],
    },
    CatalogEntry {
        name: "o-tetromino",
        offsets: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    CatalogEntry {
        name: "t-tetromino",
        offsets: &[(0, 0), (-1, 0), (1, 0), (0, 1)],
    },
    CatalogEntry {
        name: "l-tetromino",
        offsets: &[(0, 0), (0, 1), (0, 2), (1, 0)],
    },
    CatalogEntry {
        name: "s-tetromino",
        offsets: &[(0, 0), (1, 0), (1, 1), (2, 1)],
    },
    CatalogEntry {
        name: "i-tetromino",
        offsets: &[(0, 0), (1, 0), (2, 0), (3, 0)],
    },
    CatalogEntry {
        name: "x-pentomino",
        offsets: &[(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)],
    },
];

/// Builds a fresh inventory of `count` pieces.
///
/// Pieces come from the catalog in order, wrapping around when `count`
/// exceeds its length. Ids run from 0.
#[instrument]
pub fn starting_inventory(count: u32) -> Vec<Piece> {
    (0..count)
        .map(|id| {
            let entry = &CATALOG[id as usize % CATALOG.len()];
            Piece::new(id, entry.name, Shape::from_pairs(entry.offsets))
        })
        .collect()
}
