//! First-class invariants over an in-progress game.
//!
//! Invariants are logical properties that must hold after every
//! committed placement. They are testable independently and checked as
//! postconditions in debug builds.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples so sets compose without boxing.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn verdict(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        verdict(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        verdict(violations)
    }
}

pub mod inventory;
pub mod monotonic_board;
pub mod score_ledger;

pub use inventory::InventoryInvariant;
pub use monotonic_board::MonotonicBoardInvariant;
pub use score_ledger::ScoreLedgerInvariant;

/// Every invariant of an in-progress game.
pub type BlokusInvariants = (
    MonotonicBoardInvariant,
    ScoreLedgerInvariant,
    InventoryInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, GameInProgress, PlayerColor, Shape};

    fn opened() -> GameInProgress {
        let mut game = GameInProgress::for_tests(&[PlayerColor::Red, PlayerColor::Green]);
        game.attempt_placement(PlayerColor::Red, 0, Shape::from_pairs(&[(0, 0)]), Cell::new(19, 0))
            .unwrap();
        game
    }

    #[test]
    fn test_invariant_set_holds_for_fresh_game() {
        let game = GameInProgress::for_tests(&[PlayerColor::Red]);
        assert!(BlokusInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_placement() {
        assert!(BlokusInvariants::check_all(&opened()).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        let mut game = opened();
        game.board.mark_occupied(&[Cell::new(10, 10)], PlayerColor::Green);
        game.history.clear();

        let violations = BlokusInvariants::check_all(&game).unwrap_err();
        assert!(violations.len() >= 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        type BoardAndScore = (MonotonicBoardInvariant, ScoreLedgerInvariant);
        assert!(BoardAndScore::check_all(&opened()).is_ok());
    }
}
