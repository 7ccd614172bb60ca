// Copyright 2025 Cowboy AI, LLC.

//! Identifier types for brands and branded objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Brand ID - the identity of a simple brand
///
/// Issued by the brand factory, never derived from the descriptor. Two brands
/// built from identical descriptors still have different IDs and never share
/// members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrandId(Uuid);

impl BrandId {
    /// Create a new random brand ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BrandId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BrandId> for Uuid {
    fn from(id: BrandId) -> Self {
        id.0
    }
}

impl From<&BrandId> for Uuid {
    fn from(id: &BrandId) -> Self {
        id.0
    }
}

/// Object key - the identity of a shared allocation
///
/// Only meaningful while the allocation exists. Equal keys mean the same
/// allocation, never equal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKey(usize);

impl ObjectKey {
    /// Key for the allocation behind `object`
    pub fn of<T: ?Sized>(object: &Arc<T>) -> Self {
        Self(Arc::as_ptr(object).cast::<()>() as usize)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
