use crate::error::{ForgeError, ForgeResult};
use std::marker::PhantomData;

/// Marker for the three resource kinds a [`Handle`] can name. Kept as a
/// zero-sized type parameter so `Handle<VertexBufferKind>` and
/// `Handle<TextureKind>` can't be swapped by accident at a call site, without
/// needing a distinct struct per kind.
pub trait ResourceKind {}

#[derive(Debug)]
pub struct VertexBufferKind;
impl ResourceKind for VertexBufferKind {}
#[derive(Debug)]
pub struct IndexBufferKind;
impl ResourceKind for IndexBufferKind {}
#[derive(Debug)]
pub struct TextureKind;
impl ResourceKind for TextureKind {}

pub type VertexBufferHandle = Handle<VertexBufferKind>;
pub type IndexBufferHandle = Handle<IndexBufferKind>;
pub type TextureHandle = Handle<TextureKind>;

/// An opaque resource id: a wrapper over an optional 32 bit index. Absence
/// (`None`) models the invalid handle; there is no separate sentinel value.
/// Handles are produced and owned by a [`crate::backend::RenderBackend`]'s
/// resource tables; this type carries no lifetime of its own.
pub struct Handle<K: ResourceKind> {
  index: Option<u32>,
  _kind: PhantomData<K>,
}

// Manual impls: derive(Copy/Clone/..) would require K: Copy/Clone/.., but K
// is a zero-sized marker and should never constrain the handle's own traits.
impl<K: ResourceKind> Copy for Handle<K> {}
impl<K: ResourceKind> Clone for Handle<K> {
  fn clone(&self) -> Self {
    *self
  }
}
impl<K: ResourceKind> PartialEq for Handle<K> {
  fn eq(&self, other: &Self) -> bool {
    self.index == other.index
  }
}
impl<K: ResourceKind> Eq for Handle<K> {}
impl<K: ResourceKind> std::hash::Hash for Handle<K> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.index.hash(state);
  }
}
impl<K: ResourceKind> std::fmt::Debug for Handle<K> {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self.index {
      Some(i) => write!(f, "Handle({})", i),
      None => write!(f, "Handle(invalid)"),
    }
  }
}

impl<K: ResourceKind> Handle<K> {
  pub fn new(index: u32) -> Self {
    Self {
      index: Some(index),
      _kind: PhantomData,
    }
  }

  pub fn invalid() -> Self {
    Self {
      index: None,
      _kind: PhantomData,
    }
  }

  pub fn is_valid(&self) -> bool {
    self.index.is_some()
  }

  /// The raw table index, if this handle is valid.
  pub fn index(&self) -> Option<u32> {
    self.index
  }
}

impl<K: ResourceKind> Default for Handle<K> {
  fn default() -> Self {
    Self::invalid()
  }
}

/// A free-list backed table mapping `Handle<K>` to `T`, used by a backend to
/// own uploaded resources. Grounded on the store+handle idiom used throughout
/// the renderer (shader store, buffer/image store): a table behind a handle,
/// with destruction keyed off the handle's index rather than the handle
/// owning the resource directly. Unlike that store, this table's keys are the
/// literal `u32` index the handle type requires, so a plain free list (not a
/// generational slot map) is the natural fit here.
pub struct HandleTable<K: ResourceKind, T> {
  slots: Vec<Option<T>>,
  free_list: Vec<u32>,
  _kind: PhantomData<K>,
}

impl<K: ResourceKind, T> Default for HandleTable<K, T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K: ResourceKind, T> HandleTable<K, T> {
  pub fn new() -> Self {
    Self {
      slots: Vec::new(),
      free_list: Vec::new(),
      _kind: PhantomData,
    }
  }

  pub fn insert(&mut self, value: T) -> Handle<K> {
    if let Some(index) = self.free_list.pop() {
      self.slots[index as usize] = Some(value);
      Handle::new(index)
    } else {
      let index = self.slots.len() as u32;
      self.slots.push(Some(value));
      Handle::new(index)
    }
  }

  pub fn get(&self, handle: Handle<K>) -> Option<&T> {
    handle.index().and_then(|i| self.slots.get(i as usize)?.as_ref())
  }

  /// Like [`Self::get`], but surfaces the error taxonomy's `InvalidHandle`
  /// variant for callers that propagate with `?` instead of matching on an
  /// `Option`.
  pub fn resolve(&self, handle: Handle<K>) -> ForgeResult<&T> {
    self.get(handle).ok_or(ForgeError::InvalidHandle)
  }

  pub fn get_mut(&mut self, handle: Handle<K>) -> Option<&mut T> {
    handle
      .index()
      .and_then(move |i| self.slots.get_mut(i as usize)?.as_mut())
  }

  pub fn remove(&mut self, handle: Handle<K>) -> Option<T> {
    let index = handle.index()?;
    let slot = self.slots.get_mut(index as usize)?;
    let value = slot.take();
    if value.is_some() {
      self.free_list.push(index);
    }
    value
  }

  pub fn len(&self) -> usize {
    self.slots.len() - self.free_list.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invalid_handle_has_no_index() {
    let h: VertexBufferHandle = Handle::invalid();
    assert!(!h.is_valid());
    assert_eq!(h.index(), None);
  }

  #[test]
  fn table_reuses_freed_slots() {
    let mut table: HandleTable<VertexBufferKind, u32> = HandleTable::new();
    let a = table.insert(1);
    let b = table.insert(2);
    assert_eq!(table.remove(a), Some(1));
    let c = table.insert(3);
    assert_eq!(c.index(), a.index());
    assert_eq!(*table.get(b).unwrap(), 2);
    assert_eq!(*table.get(c).unwrap(), 3);
  }

  #[test]
  fn removing_invalid_handle_is_noop() {
    let mut table: HandleTable<TextureKind, u32> = HandleTable::new();
    assert_eq!(table.remove(Handle::invalid()), None);
  }

  #[test]
  fn resolving_an_invalid_handle_reports_invalid_handle() {
    let table: HandleTable<TextureKind, u32> = HandleTable::new();
    assert!(matches!(table.resolve(Handle::invalid()), Err(ForgeError::InvalidHandle)));
  }
}
