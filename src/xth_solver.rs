// Optimal move-sequence generation
// Canonical recursion for the starting position, plus a planner for any legal position

use std::fmt;

use crate::xth_game::{TOWER_COUNT, Tower};

/// Transfer of the top disk of one tower onto another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub const fn new(from: usize, to: usize) -> Self {
        Move { from, to }
    }
}

impl From<(usize, usize)> for Move {
    fn from((from, to): (usize, usize)) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

/// Tower that is neither `from` nor `to` (three towers only)
fn spare(from: usize, to: usize) -> usize {
    TOWER_COUNT - from - to
}

/// Number of moves in an optimal solution: 2^n - 1
pub fn optimal_moves(n: usize) -> usize {
    (1usize << n) - 1
}

/// Moves that carry a stack of `n` disks from `from` to `to`
pub fn generate(n: usize, from: usize, to: usize) -> Vec<Move> {
    let mut moves = Vec::with_capacity(optimal_moves(n));
    push_stack(n, from, to, &mut moves);
    moves
}

fn push_stack(n: usize, from: usize, to: usize, out: &mut Vec<Move>) {
    if n == 0 {
        return;
    }
    let aux = spare(from, to);
    push_stack(n - 1, from, aux, out);
    out.push(Move::new(from, to));
    push_stack(n - 1, aux, to, out);
}

/// Optimal moves that gather every disk onto `target` from an arbitrary legal position
/// From the starting position this is exactly `generate(n, 0, target)`
pub fn solve_from(towers: &[Tower; TOWER_COUNT], target: usize) -> Vec<Move> {
    // place[d] = tower currently holding disk d (index 0 unused)
    let disks: usize = towers.iter().map(Vec::len).sum();
    let mut place = vec![0usize; disks + 1];
    for (i, tower) in towers.iter().enumerate() {
        for &disk in tower {
            place[disk as usize] = i;
        }
    }
    let mut moves = Vec::new();
    gather(&mut place, disks, target, &mut moves);
    moves
}

fn gather(place: &mut [usize], k: usize, target: usize, out: &mut Vec<Move>) {
    if k == 0 {
        return;
    }
    let from = place[k];
    if from == target {
        gather(place, k - 1, target, out);
        return;
    }
    // Clear everything smaller off both `from` and `target`, then move disk k
    gather(place, k - 1, spare(from, target), out);
    out.push(Move::new(from, target));
    place[k] = target;
    gather(place, k - 1, target, out);
}
