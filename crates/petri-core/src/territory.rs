use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use petri_protocol::{Coord, Player};

use crate::board::Board;

/// Distance sentinel for cells no frontier reaches.
pub const UNREACHED: u32 = u32::MAX;

/// Who reaches a cell first, and in how many steps. `owner` is `None` both
/// for contested cells (equal distance) and unreached ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub owner: Option<Player>,
    pub distance: u32,
}

/// Territory control over free cells: a simultaneous multi-source BFS from
/// both players' organ networks. Built once per turn from the rebuilt board
/// and treated as a read-only baseline afterwards; what-if growth is answered
/// by [`TerritoryMap::simulate`] without mutating the baseline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerritoryMap {
    claims: Vec<Claim>,
}

impl TerritoryMap {
    pub fn build(board: &Board) -> Self {
        let mine = Self::distances(board, Player::Me);
        let theirs = Self::distances(board, Player::Foe);

        let claims = mine
            .into_iter()
            .zip(theirs)
            .map(|(dm, df)| match dm.cmp(&df) {
                std::cmp::Ordering::Less => Claim {
                    owner: Some(Player::Me),
                    distance: dm,
                },
                std::cmp::Ordering::Greater => Claim {
                    owner: Some(Player::Foe),
                    distance: df,
                },
                // Contested when both arrive together; unreached when neither
                // does. Either way no one owns it.
                std::cmp::Ordering::Equal => Claim {
                    owner: None,
                    distance: dm,
                },
            })
            .collect();

        Self { claims }
    }

    /// Hop distances from every organ of `player`, walking only free cells.
    /// Organ cells seed at 0; walls and organs otherwise terminate the search.
    fn distances(board: &Board, player: Player) -> Vec<u32> {
        let mut dist = vec![UNREACHED; board.len()];
        let mut queue = VecDeque::new();

        for (_, organ) in board.organs().iter() {
            if organ.owner != player {
                continue;
            }
            if let Some(index) = board.index_of(organ.pos) {
                dist[index] = 0;
                queue.push_back(index);
            }
        }

        while let Some(index) = queue.pop_front() {
            let next = dist[index] + 1;
            for neighbor in board.neighbors_indices(index).into_iter().flatten() {
                if !board.is_free_index(neighbor) {
                    continue;
                }
                if dist[neighbor] <= next {
                    continue;
                }
                dist[neighbor] = next;
                queue.push_back(neighbor);
            }
        }

        dist
    }

    pub fn claim_at(&self, board: &Board, pos: Coord) -> Option<Claim> {
        board.index_of(pos).map(|index| self.claims[index])
    }

    pub fn claim_index(&self, index: usize) -> Claim {
        self.claims[index]
    }

    /// Marginal territory gain for Me of a hypothetical organ at `at`: the
    /// number of cells whose owner would flip to Me, directly or transitively.
    ///
    /// Works on a scratch copy of the baseline, relaxing distances strictly
    /// downward only; arrival at equal distance never flips a cell, which is
    /// also what bounds the search. The candidate cell itself is not counted.
    pub fn simulate(&self, board: &Board, at: Coord) -> u32 {
        let Some(start) = board.index_of(at) else {
            return 0;
        };
        if self.claims[start].owner == Some(Player::Me) && self.claims[start].distance == 0 {
            return 0;
        }

        let mut overlay = self.claims.clone();
        overlay[start] = Claim {
            owner: Some(Player::Me),
            distance: 0,
        };

        let mut won = 0u32;
        let mut queue = VecDeque::from([start]);
        while let Some(index) = queue.pop_front() {
            let next = overlay[index].distance + 1;
            for neighbor in board.neighbors_indices(index).into_iter().flatten() {
                if !board.is_free_index(neighbor) {
                    continue;
                }
                if next >= overlay[neighbor].distance {
                    continue;
                }
                if overlay[neighbor].owner != Some(Player::Me) {
                    won += 1;
                }
                overlay[neighbor] = Claim {
                    owner: Some(Player::Me),
                    distance: next,
                };
                queue.push_back(neighbor);
            }
        }

        won
    }
}
