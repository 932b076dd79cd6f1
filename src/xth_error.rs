// Error taxonomy for the puzzle core
// Nothing here is fatal: every error is recoverable by the player retrying an action

use thiserror::Error;

use crate::xth_game::{MAX_DISKS, MIN_DISKS};

pub type Result<T> = std::result::Result<T, HanoiError>;

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("source tower is empty")]
    EmptySource,

    #[error("disk {disk} cannot be placed on smaller disk {onto}")]
    LargerOnSmaller { disk: u8, onto: u8 },

    #[error("source and target are the same tower")]
    SameTower,

    #[error("there is no tower {0}")]
    NoSuchTower(usize),
}

/// Errors surfaced by the game core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HanoiError {
    /// Disk count outside the playable range; state is left unchanged
    #[error("disk count must be between {} and {}, got {disks}", MIN_DISKS, MAX_DISKS)]
    Configuration { disks: usize },

    /// Move refused; the selection is cleared but the towers are untouched
    #[error("illegal move from tower {from} to tower {to}: {reason}")]
    IllegalMove {
        from: usize,
        to: usize,
        reason: MoveRejection,
    },
}
