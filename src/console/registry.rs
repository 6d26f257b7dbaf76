//! Operation registry with the current-operation cursor.
//!
//! Entries keep insertion order (tab order). Once anything is registered,
//! exactly one entry is current and its form is the only active one.

use std::collections::HashMap;

use super::error::{ConsoleError, ConsoleResult};
use super::form::FormState;
use super::operation::{OperationDefinition, OperationKey};

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub definition: OperationDefinition,
    pub form: FormState,
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<OperationKey, usize>,
    current: Option<usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition and build its form. The first entry becomes current.
    pub fn register(&mut self, definition: OperationDefinition) -> ConsoleResult<()> {
        if self.index.contains_key(&definition.key) {
            return Err(ConsoleError::DuplicateOperation(definition.key));
        }
        let mut form = FormState::new(&definition.fields);
        let slot = self.entries.len();
        if self.current.is_none() {
            form.active = true;
            self.current = Some(slot);
        }
        self.index.insert(definition.key, slot);
        self.entries.push(RegistryEntry { definition, form });
        Ok(())
    }

    /// Move the cursor. Selecting the current key changes nothing.
    pub fn select(&mut self, key: OperationKey) -> ConsoleResult<()> {
        let slot = *self
            .index
            .get(&key)
            .ok_or(ConsoleError::UnknownOperation(key))?;
        if self.current == Some(slot) {
            return Ok(());
        }
        if let Some(prev) = self.current {
            self.entries[prev].form.active = false;
        }
        self.entries[slot].form.active = true;
        self.current = Some(slot);
        Ok(())
    }

    pub fn current_key(&self) -> Option<OperationKey> {
        self.current.map(|i| self.entries[i].definition.key)
    }

    pub fn current(&self) -> Option<&RegistryEntry> {
        self.current.map(|i| &self.entries[i])
    }

    pub fn current_mut(&mut self) -> Option<&mut RegistryEntry> {
        self.current.map(move |i| &mut self.entries[i])
    }

    /// Position of the current entry in tab order.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn get(&self, key: OperationKey) -> Option<&RegistryEntry> {
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, key: OperationKey) -> Option<&mut RegistryEntry> {
        self.index.get(&key).map(|&i| &mut self.entries[i])
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key at `offset` tabs from the current one, wrapping around.
    pub fn key_at_offset(&self, offset: isize) -> Option<OperationKey> {
        let current = self.current? as isize;
        let len = self.entries.len() as isize;
        let slot = (current + offset).rem_euclid(len) as usize;
        Some(self.entries[slot].definition.key)
    }
}
