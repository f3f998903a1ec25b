//! Ordered set of live entities
//!
//! Insertion order is update order and render order (back to front). An
//! entity being updated is checked out of its slot so the update can still
//! reach the rest of the registry, including removing itself or others.

use serde::{Deserialize, Serialize};

/// Stable handle to an entity; never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone)]
struct Slot<T> {
    id: EntityId,
    /// `None` while checked out for an update
    entity: Option<T>,
}

/// Owner of every live entity
#[derive(Debug, Clone)]
pub struct EntityRegistry<T> {
    slots: Vec<Slot<T>>,
    next_id: u32,
}

impl<T> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> EntityRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity at the front of the render order
    pub fn spawn(&mut self, entity: T) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            entity: Some(entity),
        });
        id
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    /// Remove an entity. Removing something already gone is a no-op.
    ///
    /// Works on a checked-out entity too; `restore` will then discard it.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.position(id) {
            Some(i) => {
                self.slots.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove every entity matching `pred`, returning their ids
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.slots.retain(|slot| match &slot.entity {
            Some(e) if pred(e) => {
                removed.push(slot.id);
                false
            }
            _ => true,
        });
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| s.entity.as_mut())
    }

    /// Ids of every live entity, in order, for iteration that may mutate
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    /// Take an entity out of its slot for updating
    pub fn checkout(&mut self, id: EntityId) -> Option<T> {
        let i = self.position(id)?;
        self.slots[i].entity.take()
    }

    /// Put a checked-out entity back. Dropped if it was removed meanwhile.
    pub fn restore(&mut self, id: EntityId, entity: T) -> bool {
        match self.position(id) {
            Some(i) => {
                self.slots[i].entity = Some(entity);
                true
            }
            None => false,
        }
    }

    /// Live entities in render order (checked-out ones are skipped)
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .filter_map(|s| s.entity.as_ref().map(|e| (s.id, e)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn count_where(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.iter().filter(|(_, e)| pred(e)).count()
    }

    /// Run `update` over a snapshot of the live set.
    ///
    /// Each entity is checked out while its update runs, so the callback gets
    /// the whole registry. Entities removed before their turn are skipped;
    /// entities spawned during the pass wait for the next one.
    pub fn update_each<C>(
        ctx: &mut C,
        registry: impl Fn(&mut C) -> &mut Self,
        mut update: impl FnMut(EntityId, &mut T, &mut C),
    ) {
        let ids = registry(ctx).snapshot();
        for id in ids {
            let Some(mut entity) = registry(ctx).checkout(id) else {
                continue;
            };
            update(id, &mut entity, ctx);
            registry(ctx).restore(id, entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Marker {
        name: &'static str,
        /// Remove this id when updated
        kills: Option<EntityId>,
    }

    struct World {
        registry: EntityRegistry<Marker>,
        log: Vec<&'static str>,
    }

    fn world(markers: &[(&'static str, Option<u32>)]) -> World {
        let mut registry = EntityRegistry::new();
        for &(name, kills) in markers {
            registry.spawn(Marker {
                name,
                kills: kills.map(EntityId),
            });
        }
        World {
            registry,
            log: Vec::new(),
        }
    }

    fn run(world: &mut World) {
        EntityRegistry::update_each(
            world,
            |w| &mut w.registry,
            |_, marker, w| {
                w.log.push(marker.name);
                if let Some(target) = marker.kills {
                    w.registry.remove(target);
                }
            },
        );
    }

    #[test]
    fn test_self_removal_does_not_skip_neighbors() {
        // "b" (id 2) removes itself mid-pass
        let mut w = world(&[("a", None), ("b", Some(2)), ("c", None), ("d", None)]);
        run(&mut w);
        assert_eq!(w.log, vec!["a", "b", "c", "d"]);
        assert_eq!(w.registry.len(), 3);
        assert!(!w.registry.contains(EntityId(2)));
    }

    #[test]
    fn test_removing_later_entity_skips_it() {
        // "a" removes "c" before its turn
        let mut w = world(&[("a", Some(3)), ("b", None), ("c", None), ("d", None)]);
        run(&mut w);
        assert_eq!(w.log, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_removing_earlier_entity_does_not_repeat_anyone() {
        // "c" removes "a" after it already ran
        let mut w = world(&[("a", None), ("b", None), ("c", Some(1)), ("d", None)]);
        run(&mut w);
        assert_eq!(w.log, vec!["a", "b", "c", "d"]);
        assert_eq!(w.registry.len(), 3);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = EntityRegistry::new();
        let id = registry.spawn(1);
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_restore_after_removal_discards() {
        let mut registry = EntityRegistry::new();
        let id = registry.spawn("taxi");
        let taxi = registry.checkout(id).unwrap();
        assert!(registry.remove(id));
        assert!(!registry.restore(id, taxi));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_spawn_during_pass_waits() {
        let mut registry: EntityRegistry<u32> = EntityRegistry::new();
        registry.spawn(0);
        let mut seen = Vec::new();
        EntityRegistry::update_each(
            &mut registry,
            |r| r,
            |_, value, r| {
                seen.push(*value);
                r.spawn(*value + 1);
            },
        );
        assert_eq!(seen, vec![0]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_iter_preserves_order_and_remove_where() {
        let mut registry = EntityRegistry::new();
        for v in [5, 6, 7, 8] {
            registry.spawn(v);
        }
        let removed = registry.remove_where(|v| v % 2 == 0);
        assert_eq!(removed, vec![EntityId(2), EntityId(4)]);
        let left: Vec<_> = registry.iter().map(|(_, v)| *v).collect();
        assert_eq!(left, vec![5, 7]);
        assert_eq!(registry.count_where(|v| *v > 5), 1);
    }
}
