//! Unordered actor storage with swap-remove deletion
//!
//! Removing an actor moves the last one into its slot. A forward scan that
//! removes at index `i` must look at index `i` again instead of advancing.

use super::actor::Actor;
use crate::error::SimError;

#[derive(Debug, Clone)]
pub struct ActorBag {
    actors: Vec<Actor>,
    /// Logical capacity: doubles when full, halves when half empty
    capacity: usize,
}

impl Default for ActorBag {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorBag {
    pub fn new() -> Self {
        Self {
            actors: Vec::with_capacity(1),
            capacity: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Actor> {
        self.actors.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.actors.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Actor> {
        self.actors.iter_mut()
    }

    pub fn push(&mut self, actor: Actor) -> Result<(), SimError> {
        if self.actors.len() == self.capacity {
            let grown = self.capacity * 2;
            self.actors.try_reserve_exact(grown - self.actors.len())?;
            self.capacity = grown;
        }
        self.actors.push(actor);
        Ok(())
    }

    /// Remove the actor at `index` by moving the last one into its place
    pub fn swap_remove(&mut self, index: usize) -> Result<Actor, SimError> {
        if index >= self.actors.len() {
            return Err(SimError::NullReference("actor index out of bounds"));
        }
        let actor = self.actors.swap_remove(index);

        let len = self.actors.len();
        if len > 0 && len * 2 <= self.capacity {
            self.capacity /= 2;
            self.actors.shrink_to(self.capacity);
        }
        Ok(actor)
    }
}
