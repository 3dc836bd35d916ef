//! Barrel store.

use std::collections::HashMap;

use barrelhub_domain::barrel::{Barrel, BarrelState};
use barrelhub_domain::id::TeamId;

use crate::ports::Transport;
use crate::store::Store;

pub type BarrelStore<T> = Store<Barrel, T>;

impl<T: Transport + 'static> Store<Barrel, T> {
    #[must_use]
    pub fn with_state(&self, state: BarrelState) -> Vec<Barrel> {
        self.filter(|barrel| barrel.state == state)
    }

    /// Barrels currently assigned to `team`.
    #[must_use]
    pub fn for_team(&self, team: &TeamId) -> Vec<Barrel> {
        self.filter(|barrel| barrel.place.as_ref() == Some(team))
    }

    /// Number of barrels in each state. Every state is present, possibly 0.
    #[must_use]
    pub fn count_by_state(&self) -> HashMap<BarrelState, usize> {
        let mut counts: HashMap<BarrelState, usize> =
            BarrelState::ALL.into_iter().map(|state| (state, 0)).collect();
        for barrel in self.snapshot().iter() {
            *counts.entry(barrel.state).or_default() += 1;
        }
        counts
    }

    /// Copy of the collection ordered by barrel number, for display. The
    /// store's own order is unchanged.
    #[must_use]
    pub fn sorted_by_number(&self) -> Vec<Barrel> {
        let mut barrels = self.snapshot().to_vec();
        barrels.sort_by_key(|barrel| barrel.num);
        barrels
    }
}
