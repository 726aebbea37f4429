use std::collections::HashSet;

use petri_protocol::{Command, OrganId};

use crate::board::Board;
use crate::candidates::Candidate;
use crate::stock::Stock;

/// Turn-level commit authority. Owns the running stock and the reserved-cell
/// grid; both are mutated only here, in score order, so no two organisms can
/// double-spend a protein or claim the same cell within one turn.
pub struct Arbiter {
    stock: Stock,
    width: i32,
    reserved: Vec<bool>,
    used: HashSet<OrganId>,
    commands: Vec<Command>,
    committed: usize,
}

impl Arbiter {
    pub fn new(board: &Board, stock: Stock) -> Self {
        Self {
            stock,
            width: board.width(),
            reserved: vec![false; board.len()],
            used: HashSet::new(),
            commands: Vec::new(),
            committed: 0,
        }
    }

    /// The running stock, already debited by earlier commits this turn.
    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    /// Whether the organism anchored at `root` already has an action.
    pub fn is_used(&self, root: OrganId) -> bool {
        self.used.contains(&root)
    }

    /// Actions committed so far this turn, WAITs included.
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Commits one category's candidates: best score first, one action per
    /// organism, skipping anything unaffordable or aimed at a reserved cell.
    /// Returns how many committed.
    pub fn commit_category(
        &mut self,
        mut scored: Vec<(OrganId, Candidate)>,
        allow_non_positive: bool,
    ) -> usize {
        if !allow_non_positive {
            scored.retain(|(_, candidate)| candidate.score > 0);
        }
        scored.sort_by(|(root_a, a), (root_b, b)| {
            b.score.cmp(&a.score).then(root_a.cmp(root_b))
        });

        let mut count = 0;
        for (root, candidate) in scored {
            if self.used.contains(&root) {
                continue;
            }

            let cell = candidate
                .target()
                .map(|at| (at.y * self.width + at.x) as usize);
            if let Some(index) = cell {
                if self.reserved[index] {
                    continue;
                }
            }
            if let Some(kind) = candidate.cost() {
                if !self.stock.spend(kind) {
                    continue;
                }
            }

            if let Some(index) = cell {
                self.reserved[index] = true;
            }
            self.used.insert(root);
            self.commands.push(candidate.command());
            self.committed += 1;
            count += 1;
        }
        count
    }

    /// The turn's commands, in commit order.
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}
