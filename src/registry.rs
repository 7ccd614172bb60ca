// Copyright 2025 Cowboy AI, LLC.

//! Identity-keyed membership storage for a single brand
//!
//! A registry answers one question: was this exact allocation accepted? It
//! keys by [`ObjectKey`] and stores only [`Weak`] references, so membership
//! never keeps an object's value alive. A held `Weak` keeps the allocation
//! itself reserved, which means a key cannot be reused by a different object
//! while its entry exists, so dead entries are purged automatically once the
//! registry has doubled since the last purge.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

use crate::errors::{BrandError, BrandResult};
use crate::identifiers::ObjectKey;

/// Entry count below which no automatic purge runs
pub(crate) const MIN_PURGE_THRESHOLD: usize = 64;

/// Weak, identity-keyed set of branded objects
pub(crate) struct BrandRegistry<T: ?Sized> {
    members: DashMap<ObjectKey, Weak<T>>,
    purge_at: AtomicUsize,
}

impl<T: ?Sized> BrandRegistry<T> {
    /// Create an empty registry
    pub(crate) fn new() -> Self {
        Self {
            members: DashMap::new(),
            purge_at: AtomicUsize::new(MIN_PURGE_THRESHOLD),
        }
    }

    /// Check if `object` is a live member
    pub(crate) fn contains(&self, object: &Arc<T>) -> bool {
        self.members
            .get(&ObjectKey::of(object))
            .is_some_and(|entry| is_live(entry.value()))
    }

    /// Record `object` as a member
    ///
    /// The check and the insert happen under one shard lock, so two callers
    /// racing on the same object cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::AlreadyBranded`] if `object` is already a live
    /// member; `brand` labels the error.
    pub(crate) fn add(&self, object: &Arc<T>, brand: &str) -> BrandResult<()> {
        match self.members.entry(ObjectKey::of(object)) {
            Entry::Occupied(mut occupied) => {
                if is_live(occupied.get()) {
                    return Err(BrandError::already_branded(brand));
                }
                occupied.insert(Arc::downgrade(object));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::downgrade(object));
            }
        }

        // The shard lock is released here; retain takes every shard.
        if self.members.len() >= self.purge_at.load(Ordering::Relaxed) {
            self.purge();
        }
        Ok(())
    }

    /// Drop `object`'s membership; only used to roll back a failed branding
    pub(crate) fn remove(&self, object: &Arc<T>) {
        self.members.remove(&ObjectKey::of(object));
    }

    /// Release entries whose objects have been dropped
    ///
    /// Returns the number of entries released. Membership answers are the
    /// same before and after; this only returns the retained allocations.
    pub(crate) fn purge(&self) -> usize {
        let before = self.members.len();
        self.members.retain(|_, member| is_live(member));
        let after = self.members.len();
        self.purge_at
            .store((after * 2).max(MIN_PURGE_THRESHOLD), Ordering::Relaxed);

        let released = before.saturating_sub(after);
        if released > 0 {
            trace!(released, "purged dropped objects from brand registry");
        }
        released
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }
}

impl<T: ?Sized> Default for BrandRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for BrandRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrandRegistry").finish_non_exhaustive()
    }
}

fn is_live<T: ?Sized>(member: &Weak<T>) -> bool {
    member.strong_count() > 0
}
