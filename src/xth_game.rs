// Core puzzle state
// Holds the three towers, the pending selection and the win condition, and enforces move legality

use tracing::{debug, info};

use crate::xth_error::{HanoiError, MoveRejection, Result};

pub const MIN_DISKS: usize = 1;
pub const MAX_DISKS: usize = 7;
pub const TOWER_COUNT: usize = 3;
pub const START_TOWER: usize = 0;
pub const GOAL_TOWER: usize = 2;

/// One tower: disk sizes from bottom to top (last element is the top disk)
pub type Tower = Vec<u8>;

/// Validate a disk count against the playable range
pub fn check_disk_count(disks: usize) -> Result<usize> {
    if (MIN_DISKS..=MAX_DISKS).contains(&disks) {
        Ok(disks)
    } else {
        Err(HanoiError::Configuration { disks })
    }
}

/// Result of a successful move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
    pub disk: u8,
    pub from: usize,
    pub to: usize,
    pub just_solved: bool, // True only on the move that completes the puzzle
}

/// Main game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    disks: usize,                // Disk count N
    towers: [Tower; TOWER_COUNT],
    selected: Option<usize>,     // Tower armed as the source of the next move
    solved: bool,                // Latched once tower 2 first holds every disk
    moves: usize,                // Successful moves since the game started
}

impl GameState {
    /// Create a new game with all disks stacked on the first tower
    pub fn new(disks: usize) -> Result<Self> {
        let disks = check_disk_count(disks)?;
        let start: Tower = (1..=disks as u8).rev().collect();
        Ok(GameState {
            disks,
            towers: [start, Vec::new(), Vec::new()],
            selected: None,
            solved: false,
            moves: 0,
        })
    }

    pub fn disks(&self) -> usize {
        self.disks
    }

    pub fn towers(&self) -> &[Tower; TOWER_COUNT] {
        &self.towers
    }

    /// Size of the top disk of a tower, if any
    pub fn top(&self, index: usize) -> Option<u8> {
        self.towers.get(index).and_then(|t| t.last().copied())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn move_count(&self) -> usize {
        self.moves
    }

    /// Whether the game has been solved at some point since it started
    pub fn solved(&self) -> bool {
        self.solved
    }

    /// True iff every disk currently sits on the goal tower
    pub fn is_solved(&self) -> bool {
        self.towers[GOAL_TOWER].len() == self.disks
    }

    /// Whether the towers are still in the starting configuration
    pub fn is_initial(&self) -> bool {
        self.towers[START_TOWER].len() == self.disks
    }

    /// Arm a tower as the source of the next move
    /// No-op when something is already selected or the tower is empty
    pub fn select(&mut self, index: usize) {
        if self.selected.is_some() {
            return;
        }
        if self.towers.get(index).is_some_and(|t| !t.is_empty()) {
            self.selected = Some(index);
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Check a move without applying it
    pub fn check_move(&self, from: usize, to: usize) -> Result<()> {
        let reject = |reason| HanoiError::IllegalMove { from, to, reason };
        for index in [from, to] {
            if index >= TOWER_COUNT {
                return Err(reject(MoveRejection::NoSuchTower(index)));
            }
        }
        let disk = self.top(from).ok_or_else(|| reject(MoveRejection::EmptySource))?;
        if from == to {
            return Err(reject(MoveRejection::SameTower));
        }
        match self.top(to) {
            Some(onto) if onto < disk => Err(reject(MoveRejection::LargerOnSmaller { disk, onto })),
            _ => Ok(()),
        }
    }

    /// Move the top disk of `from` onto `to`
    /// Either fully applies or leaves the towers untouched; the selection is cleared in both cases
    pub fn attempt_move(&mut self, from: usize, to: usize) -> Result<Moved> {
        self.selected = None;
        if let Err(err) = self.check_move(from, to) {
            info!(%err, "move rejected");
            return Err(err);
        }
        // check_move guarantees a disk on `from`
        let Some(disk) = self.towers[from].pop() else {
            return Err(HanoiError::IllegalMove { from, to, reason: MoveRejection::EmptySource });
        };
        self.towers[to].push(disk);
        self.moves += 1;

        let just_solved = !self.solved && self.is_solved();
        if just_solved {
            self.solved = true;
            info!(disks = self.disks, moves = self.moves, "puzzle solved");
        }
        debug!(disk, from, to, moves = self.moves, "disk moved");
        Ok(Moved { disk, from, to, just_solved })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_invariants(game: &GameState) {
        for tower in game.towers() {
            assert!(tower.windows(2).all(|w| w[0] > w[1]), "tower not decreasing: {tower:?}");
        }
        let mut all: Vec<u8> = game.towers().iter().flatten().copied().collect();
        all.sort_unstable();
        let expected: Vec<u8> = (1..=game.disks() as u8).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn new_game_stacks_every_disk_on_first_tower() {
        let game = GameState::new(3).unwrap();
        assert_eq!(game.towers(), &[vec![3, 2, 1], vec![], vec![]]);
        assert_eq!(game.selected(), None);
        assert!(!game.solved());
        assert!(!game.is_solved());
        assert!(game.is_initial());
    }

    #[test]
    fn disk_count_bounds() {
        assert_eq!(GameState::new(0), Err(HanoiError::Configuration { disks: 0 }));
        assert_eq!(GameState::new(8), Err(HanoiError::Configuration { disks: 8 }));
        assert!(GameState::new(1).is_ok());
        assert_eq!(GameState::new(7).unwrap().towers()[0].len(), 7);
    }

    #[test]
    fn single_disk_solves_in_one_move() {
        let mut game = GameState::new(1).unwrap();
        let moved = game.attempt_move(0, 2).unwrap();
        assert!(moved.just_solved);
        assert!(game.is_solved());

        let err = game.attempt_move(0, 1).unwrap_err();
        assert_eq!(
            err,
            HanoiError::IllegalMove { from: 0, to: 1, reason: MoveRejection::EmptySource }
        );
        assert!(game.solved());
    }

    #[test]
    fn larger_disk_onto_smaller_is_rejected_without_change() {
        let mut game = GameState::new(3).unwrap();
        game.attempt_move(0, 2).unwrap(); // disk 1 -> tower 2
        game.attempt_move(0, 1).unwrap(); // disk 2 -> tower 1
        game.attempt_move(2, 1).unwrap(); // disk 1 -> tower 1
        game.attempt_move(0, 2).unwrap(); // disk 3 -> tower 2
        game.attempt_move(1, 0).unwrap(); // disk 1 -> tower 0
        let before = game.clone();

        game.select(2);
        let err = game.attempt_move(2, 0).unwrap_err();
        assert_eq!(
            err,
            HanoiError::IllegalMove {
                from: 2,
                to: 0,
                reason: MoveRejection::LargerOnSmaller { disk: 3, onto: 1 },
            }
        );
        assert_eq!(game.towers(), before.towers());
        assert_eq!(game.move_count(), before.move_count());
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn same_tower_and_unknown_tower_are_illegal() {
        let mut game = GameState::new(2).unwrap();
        assert_eq!(
            game.attempt_move(0, 0).unwrap_err(),
            HanoiError::IllegalMove { from: 0, to: 0, reason: MoveRejection::SameTower }
        );
        assert_eq!(
            game.attempt_move(0, 3).unwrap_err(),
            HanoiError::IllegalMove { from: 0, to: 3, reason: MoveRejection::NoSuchTower(3) }
        );
        assert!(game.is_initial());
    }

    #[test]
    fn select_is_lenient() {
        let mut game = GameState::new(3).unwrap();
        game.select(1); // empty tower
        assert_eq!(game.selected(), None);
        game.select(0);
        assert_eq!(game.selected(), Some(0));
        game.select(0); // already selected: stays armed
        assert_eq!(game.selected(), Some(0));
        game.select(2); // something else armed: no-op
        assert_eq!(game.selected(), Some(0));
        game.deselect();
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn solved_notification_fires_once() {
        let mut game = GameState::new(1).unwrap();
        assert!(game.attempt_move(0, 2).unwrap().just_solved);
        assert!(!game.attempt_move(2, 1).unwrap().just_solved);
        assert!(!game.is_solved());
        assert!(!game.attempt_move(1, 2).unwrap().just_solved);
        assert!(game.solved());
    }

    proptest! {
        #[test]
        fn random_play_keeps_invariants(
            disks in MIN_DISKS..=MAX_DISKS,
            moves in proptest::collection::vec((0usize..3, 0usize..3), 0..200)
        ) {
            let mut game = GameState::new(disks).unwrap();
            for (from, to) in moves {
                let before = game.clone();
                match game.attempt_move(from, to) {
                    Ok(moved) => {
                        prop_assert_eq!(game.move_count(), before.move_count() + 1);
                        prop_assert_eq!(game.top(to), Some(moved.disk));
                    }
                    Err(err) => {
                        let illegal = matches!(err, HanoiError::IllegalMove { .. });
                        prop_assert!(illegal, "unexpected error {:?}", err);
                        prop_assert_eq!(game.towers(), before.towers());
                    }
                }
                assert_invariants(&game);
            }
        }
    }
}
