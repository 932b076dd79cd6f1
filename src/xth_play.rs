// Game controller
// Owns the puzzle state, the precomputed solution and the animated-solve playback queue.
// The UI forwards clicks and commands here and redraws from `state()` afterwards.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::xth_error::Result;
use crate::xth_game::{GOAL_TOWER, GameState, Moved, START_TOWER, check_disk_count};
use crate::xth_solver::{Move, generate, solve_from};

/// Animated-solve progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    Idle,
    Playing(VecDeque<Move>), // Remaining moves, front is next
    Done,
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected(usize),
    Moved(Moved),
}

pub struct Controller {
    state: GameState,
    plan: Vec<Move>,    // generate(n, 0, 2) for the current game
    playback: Playback,
    assisted: bool,     // Solver was used in this game
    started_at: Option<Instant>,
    elapsed: Duration,  // Frozen once the puzzle is solved
}

impl Controller {
    pub fn new(disks: usize) -> Result<Self> {
        let state = GameState::new(disks)?;
        let plan = generate(disks, START_TOWER, GOAL_TOWER);
        info!(disks, "new game");
        Ok(Controller {
            state,
            plan,
            playback: Playback::Idle,
            assisted: false,
            started_at: None,
            elapsed: Duration::ZERO,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing(_))
    }

    /// Moves still queued in the animated solve
    pub fn remaining(&self) -> usize {
        match &self.playback {
            Playback::Playing(queue) => queue.len(),
            _ => 0,
        }
    }

    /// Whether the solver has touched this game (no record is kept then)
    pub fn assisted(&self) -> bool {
        self.assisted
    }

    /// Play time so far; starts at the first manual move and stops once solved
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(t0) if !self.state.solved() => t0.elapsed(),
            _ => self.elapsed,
        }
    }

    /// Reinitialize with `disks` disks; playback in progress is discarded
    /// An invalid count leaves the current game untouched
    pub fn start_new_game(&mut self, disks: usize) -> Result<()> {
        let disks = check_disk_count(disks)?;
        *self = Controller::new(disks)?;
        Ok(())
    }

    /// Unified click handler: arms a tower or completes the pending move
    pub fn select_or_move(&mut self, tower: usize) -> Result<ClickOutcome> {
        if self.is_playing() {
            return Ok(ClickOutcome::Ignored);
        }
        match self.state.selected() {
            None => {
                self.state.select(tower);
                Ok(match self.state.selected() {
                    Some(t) => ClickOutcome::Selected(t),
                    None => ClickOutcome::Ignored,
                })
            }
            Some(from) if from == tower => Ok(ClickOutcome::Ignored),
            Some(from) => {
                let moved = self.state.attempt_move(from, tower)?;
                if self.started_at.is_none() {
                    self.started_at = Some(Instant::now());
                }
                self.after_move(&moved);
                Ok(ClickOutcome::Moved(moved))
            }
        }
    }

    pub fn deselect(&mut self) {
        self.state.deselect();
    }

    /// Begin the animated solve; returns false when there is nothing to play
    pub fn request_solve(&mut self) -> bool {
        if self.is_playing() || self.state.is_solved() {
            return false;
        }
        self.state.deselect();
        let queue: VecDeque<Move> = if self.state.is_initial() {
            self.plan.iter().copied().collect()
        } else {
            solve_from(self.state.towers(), GOAL_TOWER).into()
        };
        info!(moves = queue.len(), from_start = self.state.is_initial(), "solve started");
        self.assisted = true;
        self.playback = Playback::Playing(queue);
        true
    }

    /// Advance the animated solve by exactly one move
    pub fn tick(&mut self) -> Option<Moved> {
        let Playback::Playing(queue) = &mut self.playback else {
            return None;
        };
        let next = queue.pop_front()?;
        let finished = queue.is_empty();
        match self.state.attempt_move(next.from, next.to) {
            Ok(moved) => {
                if finished {
                    info!(moves = self.state.move_count(), "solve finished");
                    self.playback = Playback::Done;
                }
                self.after_move(&moved);
                Some(moved)
            }
            Err(err) => {
                error!(%err, "solver move rejected, playback aborted");
                self.playback = Playback::Idle;
                None
            }
        }
    }

    fn after_move(&mut self, moved: &Moved) {
        if moved.just_solved {
            if let Some(t0) = self.started_at {
                self.elapsed = t0.elapsed();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xth_error::{HanoiError, MoveRejection};

    fn play_out(ctl: &mut Controller) -> Vec<Moved> {
        let mut out = Vec::new();
        while ctl.is_playing() {
            if let Some(m) = ctl.tick() {
                out.push(m);
            }
        }
        out
    }

    #[test]
    fn click_selects_then_moves() {
        let mut ctl = Controller::new(3).unwrap();
        assert_eq!(ctl.select_or_move(1).unwrap(), ClickOutcome::Ignored);
        assert_eq!(ctl.select_or_move(0).unwrap(), ClickOutcome::Selected(0));
        assert_eq!(ctl.select_or_move(0).unwrap(), ClickOutcome::Ignored);
        assert_eq!(ctl.state().selected(), Some(0));

        match ctl.select_or_move(2).unwrap() {
            ClickOutcome::Moved(m) => assert_eq!((m.disk, m.from, m.to), (1, 0, 2)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ctl.state().selected(), None);
        assert_eq!(ctl.state().towers(), &[vec![3, 2], vec![], vec![1]]);
    }

    #[test]
    fn illegal_click_clears_selection() {
        let mut ctl = Controller::new(3).unwrap();
        ctl.select_or_move(0).unwrap();
        ctl.select_or_move(2).unwrap(); // disk 1 -> tower 2
        ctl.select_or_move(0).unwrap();
        let err = ctl.select_or_move(2).unwrap_err();
        assert_eq!(
            err,
            HanoiError::IllegalMove {
                from: 0,
                to: 2,
                reason: MoveRejection::LargerOnSmaller { disk: 2, onto: 1 },
            }
        );
        assert_eq!(ctl.state().selected(), None);
        assert_eq!(ctl.state().towers(), &[vec![3, 2], vec![], vec![1]]);
    }

    #[test]
    fn deselect_cancels_pending_move() {
        let mut ctl = Controller::new(2).unwrap();
        ctl.select_or_move(0).unwrap();
        ctl.deselect();
        assert_eq!(ctl.state().selected(), None);
        assert_eq!(ctl.select_or_move(1).unwrap(), ClickOutcome::Ignored);
    }

    #[test]
    fn invalid_new_game_keeps_current_state() {
        let mut ctl = Controller::new(3).unwrap();
        ctl.select_or_move(0).unwrap();
        ctl.select_or_move(1).unwrap();
        let before = ctl.state().clone();
        assert_eq!(ctl.start_new_game(0), Err(HanoiError::Configuration { disks: 0 }));
        assert_eq!(ctl.start_new_game(8), Err(HanoiError::Configuration { disks: 8 }));
        assert_eq!(ctl.state(), &before);
    }

    #[test]
    fn solve_plays_one_move_per_tick() {
        let mut ctl = Controller::new(3).unwrap();
        assert!(ctl.request_solve());
        assert!(ctl.assisted());
        assert_eq!(ctl.remaining(), 7);
        ctl.tick();
        assert_eq!(ctl.remaining(), 6);
        assert_eq!(ctl.state().move_count(), 1);

        let rest = play_out(&mut ctl);
        assert_eq!(rest.len(), 6);
        assert_eq!(rest.iter().filter(|m| m.just_solved).count(), 1);
        assert!(rest.last().unwrap().just_solved);
        assert_eq!(ctl.playback(), &Playback::Done);
        assert_eq!(ctl.state().towers(), &[vec![], vec![], vec![3, 2, 1]]);
        assert_eq!(ctl.tick(), None);
        assert!(!ctl.request_solve());
    }

    #[test]
    fn clicks_are_ignored_while_playing() {
        let mut ctl = Controller::new(2).unwrap();
        ctl.request_solve();
        assert_eq!(ctl.select_or_move(0).unwrap(), ClickOutcome::Ignored);
        assert_eq!(ctl.state().selected(), None);
        assert!(!ctl.request_solve());
    }

    #[test]
    fn solve_continues_from_a_played_position() {
        let mut ctl = Controller::new(3).unwrap();
        ctl.select_or_move(0).unwrap();
        ctl.select_or_move(1).unwrap(); // disk 1 -> tower 1
        ctl.select_or_move(0).unwrap(); // armed, then solve drops the selection
        assert!(ctl.request_solve());
        assert_eq!(ctl.state().selected(), None);
        play_out(&mut ctl);
        assert!(ctl.state().is_solved());
        assert_eq!(ctl.playback(), &Playback::Done);
    }

    #[test]
    fn new_game_discards_queued_moves() {
        let mut ctl = Controller::new(5).unwrap();
        ctl.request_solve();
        for _ in 0..4 {
            ctl.tick();
        }
        ctl.start_new_game(2).unwrap();
        assert_eq!(ctl.playback(), &Playback::Idle);
        assert_eq!(ctl.remaining(), 0);
        assert_eq!(ctl.tick(), None);
        assert_eq!(ctl.state().towers(), &[vec![2, 1], vec![], vec![]]);
        assert_eq!(ctl.plan.len(), 3);
        assert!(!ctl.assisted());
    }

    #[test]
    fn manual_solve_stops_the_clock() {
        let mut ctl = Controller::new(1).unwrap();
        assert_eq!(ctl.elapsed(), Duration::ZERO);
        ctl.select_or_move(0).unwrap();
        let outcome = ctl.select_or_move(2).unwrap();
        assert!(matches!(outcome, ClickOutcome::Moved(m) if m.just_solved));
        let frozen = ctl.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(ctl.elapsed(), frozen);
        assert!(!ctl.assisted());
    }

    #[test]
    fn rejected_move_does_not_start_the_clock() {
        let mut ctl = Controller::new(3).unwrap();
        ctl.state.attempt_move(0, 2).unwrap(); // disk 1 -> tower 2
        ctl.state.attempt_move(0, 1).unwrap(); // disk 2 -> tower 1
        ctl.select_or_move(1).unwrap();
        assert!(ctl.select_or_move(2).is_err());
        assert_eq!(ctl.started_at, None);
        assert_eq!(ctl.elapsed(), Duration::ZERO);

        ctl.select_or_move(2).unwrap();
        ctl.select_or_move(1).unwrap(); // disk 1 -> tower 1
        assert!(ctl.started_at.is_some());
    }
}
