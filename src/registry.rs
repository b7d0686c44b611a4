//! Body registry: which live entities are planets, and of which rank.
//!
//! The registry is the single source of truth for rank lookups.  Walls and
//! cosmetic entities never enter it, so a collision involving them fails the
//! lookup and is ignored by the merge pipeline.

use std::collections::HashMap;

use bevy::prelude::*;

/// Map from planet entity to rank index, scoped to the active run.
#[derive(Resource, Debug, Default, Clone)]
pub struct BodyRegistry {
    ranks: HashMap<Entity, usize>,
}

impl BodyRegistry {
    /// Record a freshly spawned planet.  Re-registering overwrites the rank.
    pub fn register(&mut self, entity: Entity, rank: usize) {
        self.ranks.insert(entity, rank);
    }

    #[inline]
    pub fn rank_of(&self, entity: Entity) -> Option<usize> {
        self.ranks.get(&entity).copied()
    }

    /// Forget a planet; returns its rank if it was registered.
    pub fn unregister(&mut self, entity: Entity) -> Option<usize> {
        self.ranks.remove(&entity)
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.ranks.contains_key(&entity)
    }

    /// Every registered planet with its rank, in no particular order.
    pub fn all_registered(&self) -> impl Iterator<Item = (Entity, usize)> + '_ {
        self.ranks.iter().map(|(e, r)| (*e, *r))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranks.clear();
    }
}
