// Copyright 2025 Cowboy AI, LLC.

//! Brand composition
//!
//! `merge` pairs two brands into one whose membership is the conjunction of
//! both. `refine` mints a new simple brand from an extra descriptor and merges
//! it onto an existing brand. Composites own no registry; they delegate.

use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::brand::{Brand, BrandNode};
use crate::descriptor::BrandDescriptor;
use crate::errors::BrandResult;
use crate::identifiers::{BrandId, ObjectKey};

/// Composition of two brands
///
/// Branding runs `first` then `second`. If `first` fails, `second` is never
/// invoked. If `second` fails, `first` keeps its registration.
pub(crate) struct CompositeBrand<T: ?Sized> {
    descriptor: BrandDescriptor,
    first: Brand<T>,
    second: Brand<T>,
}

impl<T: ?Sized> CompositeBrand<T> {
    /// Create a new composition
    pub(crate) fn new(first: Brand<T>, second: Brand<T>) -> Self {
        Self {
            descriptor: first.descriptor().union(second.descriptor()),
            first,
            second,
        }
    }

    pub(crate) fn brand(&self, object: &Arc<T>) -> BrandResult<()> {
        trace!(object = %ObjectKey::of(object), "branding through composite");
        self.first.brand(object)?;
        self.second.brand(object)?;
        Ok(())
    }

    pub(crate) fn has(&self, object: &Arc<T>) -> bool {
        self.first.has(object) && self.second.has(object)
    }

    pub(crate) fn assert(&self, object: &Arc<T>) -> BrandResult<()> {
        self.first.assert(object)?;
        self.second.assert(object)
    }

    pub(crate) fn descriptor(&self) -> &BrandDescriptor {
        &self.descriptor
    }

    pub(crate) fn fmt_label(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} & {}",
            self.first.label_display(),
            self.second.label_display()
        )
    }

    pub(crate) fn collect_lineage(&self, ids: &mut Vec<BrandId>) {
        self.first.collect_lineage(ids);
        self.second.collect_lineage(ids);
    }

    pub(crate) fn purge(&self) -> usize {
        self.first.purge() + self.second.purge()
    }
}

impl<T: ?Sized> Brand<T> {
    /// Combine with `other` into a brand that requires both
    ///
    /// The result's descriptor is the union of both descriptors, with
    /// `other` winning on key collisions. Membership and assertion do not
    /// depend on operand order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cim_brand::{Brand, BrandDescriptor};
    /// use std::sync::Arc;
    ///
    /// #[derive(Debug)]
    /// struct Request;
    ///
    /// let external = Brand::<Request>::new(BrandDescriptor::new().with("kind", "external"));
    /// let authed = Brand::<Request>::new(BrandDescriptor::new().with("authenticated", true));
    /// let both = external.merge(&authed);
    ///
    /// let req = Arc::new(Request);
    /// external.brand(&req).unwrap();
    /// assert!(!both.has(&req));
    ///
    /// authed.brand(&req).unwrap();
    /// assert!(both.has(&req));
    /// ```
    pub fn merge(&self, other: &Brand<T>) -> Brand<T> {
        Brand::from_node(BrandNode::Composite(CompositeBrand::new(
            self.clone(),
            other.clone(),
        )))
    }

    /// Merge with a new simple brand described by `descriptor`
    ///
    /// The new brand's descriptor is this brand's descriptor extended by
    /// `descriptor` (new fields win).
    pub fn refine(&self, descriptor: BrandDescriptor) -> Brand<T> {
        self.merge(&Brand::new(self.descriptor().union(&descriptor)))
    }

    /// Like [`refine`](Self::refine), with a callback for the new brand
    ///
    /// Branding through the result runs this brand's callbacks first, then
    /// `on_brand`.
    pub fn refine_with<F>(&self, descriptor: BrandDescriptor, on_brand: F) -> Brand<T>
    where
        F: Fn(&Arc<T>, &BrandDescriptor) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.merge(&Brand::with_callback(
            self.descriptor().union(&descriptor),
            on_brand,
        ))
    }
}
