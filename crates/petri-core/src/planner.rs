use std::time::Instant;

use tracing::{debug, warn};

use petri_protocol::{Command, OrganId, Player};

use crate::arbiter::Arbiter;
use crate::board::Board;
use crate::candidates::{Candidate, Category, Generator};
use crate::config::Tunables;
use crate::organism::Organism;
use crate::stock::Stock;
use crate::territory::TerritoryMap;

/// Per-turn orchestrator: territory build, category passes, arbitration.
#[derive(Clone, Debug, Default)]
pub struct Planner {
    tunables: Tunables,
}

impl Planner {
    pub fn new(tunables: Tunables) -> Self {
        Self { tunables }
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Plans the whole turn: exactly one command per organism, in commit
    /// order.
    pub fn plan(&self, board: &Board, stock: Stock) -> Vec<Command> {
        self.plan_until(board, stock, None)
    }

    /// Like [`Planner::plan`], but once `deadline` passes, the remaining
    /// categories are skipped and unassigned organisms degrade to WAIT.
    pub fn plan_until(
        &self,
        board: &Board,
        stock: Stock,
        deadline: Option<Instant>,
    ) -> Vec<Command> {
        let turn_start = Instant::now();
        let organisms = board.organisms(Player::Me);
        let territory = TerritoryMap::build(board);
        let mut generator = Generator::new(board, &territory, &self.tunables);
        let mut arbiter = Arbiter::new(board, stock);

        for category in Category::PRIORITY {
            if out_of_time(deadline) {
                warn!(
                    category = category.label(),
                    "turn budget exhausted, degrading to WAIT"
                );
                break;
            }
            let pass_start = Instant::now();
            let candidates = collect(&mut generator, &arbiter, &organisms, category);
            let proposed = candidates.len();
            let committed = arbiter.commit_category(candidates, false);
            debug!(
                category = category.label(),
                proposed,
                committed,
                elapsed_ms = pass_start.elapsed().as_millis() as u64,
            );
        }

        // Forward-progress fallback: when nothing at all committed, re-run
        // expansion accepting non-positive gains.
        if arbiter.committed() == 0 && !out_of_time(deadline) {
            let candidates = collect(&mut generator, &arbiter, &organisms, Category::Consolidation);
            let committed = arbiter.commit_category(candidates, true);
            debug!(
                category = Category::Consolidation.label(),
                committed,
                "consolidation pass"
            );
        }

        let waits = collect(&mut generator, &arbiter, &organisms, Category::Wait);
        arbiter.commit_category(waits, false);

        let commands = arbiter.into_commands();
        debug_assert_eq!(commands.len(), organisms.len());
        debug!(
            organisms = organisms.len(),
            actions = commands.len(),
            elapsed_ms = turn_start.elapsed().as_millis() as u64,
            "turn planned"
        );
        commands
    }
}

fn collect(
    generator: &mut Generator<'_>,
    arbiter: &Arbiter,
    organisms: &[Organism],
    category: Category,
) -> Vec<(OrganId, Candidate)> {
    organisms
        .iter()
        .filter(|organism| !arbiter.is_used(organism.root))
        .filter_map(|organism| {
            generator
                .best_candidate(category, organism, arbiter.stock())
                .map(|candidate| (organism.root, candidate))
        })
        .collect()
}

fn out_of_time(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}
