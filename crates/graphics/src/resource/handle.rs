//! Opaque handles and the table that issues them.
//!
//! A handle is a non-zero `u32` issued per resource kind, starting at 1. It is
//! stable for the lifetime of the issuing table and decouples consumers from
//! the storage key (path or logical name) of the resource.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker for mesh handles.
#[derive(Debug)]
pub enum MeshKind {}

/// Marker for texture handles.
#[derive(Debug)]
pub enum TextureKind {}

pub struct Handle<K> {
    id: u32,
    _kind: PhantomData<fn() -> K>,
}

pub type MeshHandle = Handle<MeshKind>;
pub type TextureHandle = Handle<TextureKind>;

impl<K> Handle<K> {
    pub const INVALID: Self = Self::from_raw(0);

    pub const fn from_raw(id: u32) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Non-zero check only. Whether the handle resolves is up to the issuing table.
    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    fn index(&self) -> Option<usize> {
        self.id.checked_sub(1).map(|index| index as usize)
    }
}

impl<K> Default for Handle<K> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

/// Issues handles keyed by name and maps each one directly to a storage slot.
///
/// `handle.id - 1` indexes `slots`, so resolution is a bounds check and a load.
pub struct HandleTable<K> {
    slots: Vec<usize>,
    by_key: HashMap<String, Handle<K>>,
}

impl<K> Default for HandleTable<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            by_key: HashMap::new(),
        }
    }
}

impl<K> HandleTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing handle for `key`, or issues the next one bound to `slot`.
    pub fn insert(&mut self, key: &str, slot: usize) -> Handle<K> {
        if let Some(handle) = self.by_key.get(key) {
            return *handle;
        }

        self.slots.push(slot);
        let handle = Handle::from_raw(self.slots.len() as u32);
        self.by_key.insert(key.to_string(), handle);
        handle
    }

    /// Handle for `key`, or [`Handle::INVALID`].
    pub fn get(&self, key: &str) -> Handle<K> {
        self.by_key.get(key).copied().unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn contains(&self, handle: Handle<K>) -> bool {
        self.slot(handle).is_some()
    }

    pub fn slot(&self, handle: Handle<K>) -> Option<usize> {
        handle.index().and_then(|index| self.slots.get(index)).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
