use serde::{Deserialize, Serialize};

use petri_protocol::{OrganKind, ProteinKind};

/// One player's protein counters plus the fixed organ cost table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    counts: [u32; 4],
}

impl Stock {
    pub fn new(counts: [u32; 4]) -> Self {
        Self { counts }
    }

    pub fn count(&self, kind: ProteinKind) -> u32 {
        self.counts[kind.index()]
    }

    /// Proteins required to grow one organ of `kind`, indexed by
    /// [`ProteinKind::index`].
    pub const fn cost(kind: OrganKind) -> [u32; 4] {
        match kind {
            OrganKind::Basic => [1, 0, 0, 0],
            OrganKind::Harvester => [0, 0, 1, 1],
            OrganKind::Tentacle => [0, 1, 1, 0],
            OrganKind::Sporer => [0, 1, 0, 1],
            OrganKind::Root => [1, 1, 1, 1],
        }
    }

    pub fn can_afford(&self, kind: OrganKind) -> bool {
        let cost = Self::cost(kind);
        self.counts.iter().zip(cost).all(|(&have, need)| have >= need)
    }

    /// Whether the cumulative cost of every kind in `kinds` is affordable at
    /// once.
    pub fn can_afford_all(&self, kinds: &[OrganKind]) -> bool {
        let mut total = [0u32; 4];
        for &kind in kinds {
            for (slot, need) in total.iter_mut().zip(Self::cost(kind)) {
                *slot += need;
            }
        }
        self.counts.iter().zip(total).all(|(&have, need)| have >= need)
    }

    /// All-or-nothing spend: either every counter is debited or none is.
    pub fn spend(&mut self, kind: OrganKind) -> bool {
        if !self.can_afford(kind) {
            return false;
        }
        for (slot, need) in self.counts.iter_mut().zip(Self::cost(kind)) {
            *slot -= need;
        }
        true
    }

    /// Fallback grow kind when a category does not dictate one: BASIC while
    /// any A remains, otherwise the kind with the deepest combined stock
    /// behind its cost (zero when either required protein is out), earliest
    /// of [`OrganKind::GROWABLE`] on ties.
    pub fn best_growable_kind(&self) -> OrganKind {
        let [a, b, c, d] = self.counts;
        if a > 0 {
            return OrganKind::Basic;
        }

        let coverage = |kind: OrganKind| -> u32 {
            match kind {
                OrganKind::Basic => a,
                OrganKind::Harvester => {
                    if c > 0 && d > 0 {
                        c + d
                    } else {
                        0
                    }
                }
                OrganKind::Tentacle => {
                    if b > 0 && c > 0 {
                        b + c
                    } else {
                        0
                    }
                }
                OrganKind::Sporer => {
                    if b > 0 && d > 0 {
                        b + d
                    } else {
                        0
                    }
                }
                OrganKind::Root => 0,
            }
        };

        let mut best = OrganKind::Basic;
        let mut best_coverage = coverage(best);
        for kind in OrganKind::GROWABLE {
            let value = coverage(kind);
            if value > best_coverage {
                best = kind;
                best_coverage = value;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_is_all_or_nothing() {
        let mut stock = Stock::new([1, 1, 0, 1]);

        // Tentacle needs B and C; C is empty, so nothing may be debited.
        assert!(!stock.can_afford(OrganKind::Tentacle));
        assert!(!stock.spend(OrganKind::Tentacle));
        assert_eq!(stock, Stock::new([1, 1, 0, 1]));

        assert!(stock.spend(OrganKind::Sporer));
        assert_eq!(stock, Stock::new([1, 0, 0, 0]));
    }

    #[test]
    fn counters_never_go_negative() {
        let mut stock = Stock::new([1, 0, 0, 0]);
        assert!(stock.spend(OrganKind::Basic));
        assert!(!stock.spend(OrganKind::Basic));
        for kind in ProteinKind::ALL {
            assert_eq!(stock.count(kind), 0);
        }
    }

    #[test]
    fn can_afford_all_is_cumulative() {
        // Sporer + root together need A1 B2 C1 D2.
        let kinds = [OrganKind::Sporer, OrganKind::Root];
        assert!(Stock::new([1, 2, 1, 2]).can_afford_all(&kinds));
        assert!(!Stock::new([1, 1, 1, 2]).can_afford_all(&kinds));
        assert!(Stock::new([9, 9, 9, 9]).can_afford_all(&kinds));
    }

    #[test]
    fn best_growable_kind_prefers_basic_when_a_remains() {
        assert_eq!(
            Stock::new([1, 9, 9, 9]).best_growable_kind(),
            OrganKind::Basic
        );
    }

    #[test]
    fn best_growable_kind_falls_back_to_deepest_coverage() {
        // No A; harvester coverage 5, tentacle 4, sporer 5: harvester wins the
        // tie by coming first.
        assert_eq!(
            Stock::new([0, 2, 2, 3]).best_growable_kind(),
            OrganKind::Harvester
        );
        // Only B and C: tentacle.
        assert_eq!(
            Stock::new([0, 3, 1, 0]).best_growable_kind(),
            OrganKind::Tentacle
        );
    }
}
