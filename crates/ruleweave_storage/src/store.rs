//! Fact ownership with generational identities.
//!
//! The `FactStore` owns every fact inserted into it and hands out
//! [`FactId`]s. Slots are reused from a free list; each reuse bumps the
//! slot's generation so that ids kept past removal are detected as stale.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use ruleweave_foundation::{Error, FactId, Result};
use tracing::trace;

use crate::fact::{Fact, FactShape};

#[derive(Debug)]
struct Slot {
    /// Even generations are free, odd generations are occupied.
    generation: u32,
    fact: Option<Fact>,
}

/// Owns the working set of facts.
///
/// An evaluation borrows the store immutably, so the borrow itself is the
/// read-only snapshot: the store cannot be mutated while any evaluation
/// holds it.
#[derive(Debug, Default)]
pub struct FactStore {
    slots: Vec<Slot>,
    free_list: Vec<u64>,
    /// Slot indices of live facts, by fact name. Ordered so that
    /// `facts_named` is deterministic.
    by_name: HashMap<Arc<str>, BTreeSet<u64>>,
    live_count: usize,
}

impl FactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a fact and returns its identity.
    ///
    /// Reuses slots from the free list when available.
    pub fn insert(&mut self, fact: Fact) -> FactId {
        self.live_count += 1;
        let name: Arc<str> = fact.name().into();

        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            // Was even/free, now odd/occupied
            slot.generation += 1;
            slot.fact = Some(fact);
            FactId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u64;
            self.slots.push(Slot {
                generation: 1,
                fact: Some(fact),
            });
            FactId::new(index, 1)
        };

        self.by_name.entry(name).or_default().insert(id.index);
        trace!(fact = %id, "fact inserted");
        id
    }

    /// Removes a fact, returning ownership of it to the caller.
    ///
    /// # Errors
    /// Returns `FactNotFound` if the id was never issued or its slot is
    /// empty, and `StaleFact` if the slot has since been reused.
    pub fn remove(&mut self, id: FactId) -> Result<Fact> {
        self.validate(id)?;

        let slot = &mut self.slots[id.index as usize];
        let fact = slot
            .fact
            .take()
            .ok_or_else(|| Error::fact_not_found(id))?;
        // Was odd/occupied, now even/free
        slot.generation += 1;
        self.free_list.push(id.index);
        self.live_count -= 1;

        if let Some(indices) = self.by_name.get_mut(fact.name()) {
            indices.remove(&id.index);
            if indices.is_empty() {
                self.by_name.remove(fact.name());
            }
        }

        trace!(fact = %id, "fact removed");
        Ok(fact)
    }

    /// Validates that an id refers to a live fact.
    ///
    /// # Errors
    /// Returns `FactNotFound` or `StaleFact` as for [`FactStore::remove`].
    pub fn validate(&self, id: FactId) -> Result<()> {
        let Some(slot) = self.slots.get(id.index as usize) else {
            return Err(Error::fact_not_found(id));
        };

        if slot.generation != id.generation {
            // Generation mismatch - fact was removed and possibly replaced
            return Err(Error::stale_fact(id));
        }

        if slot.generation % 2 == 0 {
            return Err(Error::fact_not_found(id));
        }

        Ok(())
    }

    /// Returns the fact with the given id, if it is live.
    #[must_use]
    pub fn get(&self, id: FactId) -> Option<&Fact> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation == id.generation {
            slot.fact.as_ref()
        } else {
            None
        }
    }

    /// Returns true if the id refers to a live fact.
    #[must_use]
    pub fn contains(&self, id: FactId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if the store holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates all live facts with their ids, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (FactId, &Fact)> + Clone + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.fact
                .as_ref()
                .map(|fact| (FactId::new(index as u64, slot.generation), fact))
        })
    }

    /// Facts with the given name, in slot order.
    ///
    /// The sequence is lazy and finite, and cloning the iterator restarts
    /// it. An unknown name yields an empty sequence.
    pub fn facts_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Fact> + Clone + 'a {
        self.facts_named_with_ids(name).map(|(_, fact)| fact)
    }

    /// Like [`FactStore::facts_named`], paired with each fact's id.
    pub fn facts_named_with_ids<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = (FactId, &'a Fact)> + Clone + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(move |&index| {
                let slot = self.slots.get(index as usize)?;
                slot.fact
                    .as_ref()
                    .map(|fact| (FactId::new(index, slot.generation), fact))
            })
    }

    /// Facts with the given name and shape, in slot order.
    pub fn facts_shaped<'a>(
        &'a self,
        name: &str,
        shape: FactShape,
    ) -> impl Iterator<Item = &'a Fact> + Clone + 'a {
        self.facts_named(name).filter(move |fact| fact.shape() == shape)
    }

    /// Distinct fact names currently in the store, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(AsRef::as_ref).collect();
        names.sort_unstable();
        names
    }
}
