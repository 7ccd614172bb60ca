// Copyright 2025 Cowboy AI, LLC.

//! Branding functions
//!
//! A [`Brand<T>`] marks shared objects (`Arc<T>`) without touching them.
//! Simple brands own a registry; composite brands built by
//! [`Brand::merge`] and [`Brand::refine`] delegate to their constituents.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::composition::CompositeBrand;
use crate::descriptor::BrandDescriptor;
use crate::errors::{BrandError, BrandResult};
use crate::identifiers::{BrandId, ObjectKey};
use crate::registry::BrandRegistry;

/// Side-effect run every time an object is newly branded
///
/// Receives the object and the descriptor of the simple brand that accepted
/// it. Returning an error rolls the registration back.
pub type OnBrand<T> =
    Arc<dyn Fn(&Arc<T>, &BrandDescriptor) -> anyhow::Result<()> + Send + Sync>;

/// A brand that can be attached to, checked on, and asserted for objects
///
/// Cloning a `Brand` is cheap and yields a handle to the same brand; clones
/// share membership.
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
/// let req = Arc::new(Request);
///
/// assert!(!external.has(&req));
/// let same = external.brand(&req).unwrap();
/// assert!(Arc::ptr_eq(same, &req));
/// assert!(external.has(&req));
/// assert!(external.brand(&req).unwrap_err().is_already_branded());
/// ```
pub struct Brand<T: ?Sized> {
    node: Arc<BrandNode<T>>,
}

pub(crate) enum BrandNode<T: ?Sized> {
    Simple(SimpleBrand<T>),
    Composite(CompositeBrand<T>),
}

pub(crate) struct SimpleBrand<T: ?Sized> {
    id: BrandId,
    label: String,
    descriptor: BrandDescriptor,
    registry: BrandRegistry<T>,
    on_brand: Option<OnBrand<T>>,
}

impl<T: ?Sized> SimpleBrand<T> {
    fn brand(&self, object: &Arc<T>) -> BrandResult<()> {
        self.registry.add(object, &self.label)?;

        if let Some(on_brand) = &self.on_brand {
            let rollback = Rollback::arm(&self.registry, object);
            if let Err(err) = on_brand(object, &self.descriptor) {
                warn!(
                    brand = %self.label,
                    id = %self.id,
                    object = %ObjectKey::of(object),
                    error = %err,
                    "on_brand callback failed, branding rolled back"
                );
                return Err(BrandError::Callback(err));
            }
            rollback.disarm();
        }

        debug!(
            brand = %self.label,
            id = %self.id,
            object = %ObjectKey::of(object),
            "object branded"
        );
        Ok(())
    }
}

/// Removes a fresh registration unless disarmed, including on unwind
struct Rollback<'a, T: ?Sized> {
    registry: &'a BrandRegistry<T>,
    object: &'a Arc<T>,
    armed: bool,
}

impl<'a, T: ?Sized> Rollback<'a, T> {
    fn arm(registry: &'a BrandRegistry<T>, object: &'a Arc<T>) -> Self {
        Self {
            registry,
            object,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<T: ?Sized> Drop for Rollback<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.registry.remove(self.object);
        }
    }
}

impl<T: ?Sized> Brand<T> {
    /// Create a brand with no callback
    pub fn new(descriptor: BrandDescriptor) -> Self {
        Self::builder().descriptor(descriptor).build()
    }

    /// Create a brand whose callback runs on every successful branding
    pub fn with_callback<F>(descriptor: BrandDescriptor, on_brand: F) -> Self
    where
        F: Fn(&Arc<T>, &BrandDescriptor) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::builder()
            .descriptor(descriptor)
            .on_brand(on_brand)
            .build()
    }

    /// Start configuring a brand
    pub fn builder() -> BrandBuilder<T> {
        BrandBuilder::new()
    }

    pub(crate) fn from_node(node: BrandNode<T>) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// Brand `object`, returning the same reference
    ///
    /// For a simple brand the object is registered and then the callback, if
    /// any, runs; within the callback [`has`](Self::has) already reports
    /// true. For a composite brand each constituent brands the object in
    /// order.
    ///
    /// # Errors
    ///
    /// - [`BrandError::AlreadyBranded`] if the object already carries the brand
    /// - [`BrandError::Callback`] if a callback failed; that registration is
    ///   rolled back
    pub fn brand<'a>(&self, object: &'a Arc<T>) -> BrandResult<&'a Arc<T>> {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => simple.brand(object)?,
            BrandNode::Composite(composite) => composite.brand(object)?,
        }
        Ok(object)
    }

    /// Check if `object` carries this brand
    pub fn has(&self, object: &Arc<T>) -> bool {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => simple.registry.contains(object),
            BrandNode::Composite(composite) => composite.has(object),
        }
    }

    /// Require that `object` carries this brand
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::NotBranded`] naming the first missing brand
    pub fn assert(&self, object: &Arc<T>) -> BrandResult<()> {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => {
                if simple.registry.contains(object) {
                    Ok(())
                } else {
                    Err(BrandError::not_branded(&simple.label))
                }
            }
            BrandNode::Composite(composite) => composite.assert(object),
        }
    }

    /// The descriptor, or the union of constituent descriptors when composite
    pub fn descriptor(&self) -> &BrandDescriptor {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => &simple.descriptor,
            BrandNode::Composite(composite) => composite.descriptor(),
        }
    }

    /// Human-readable name used in errors and logs
    ///
    /// Composite labels join the constituent labels with `" & "` and are
    /// built on each call.
    pub fn label(&self) -> Cow<'_, str> {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => Cow::Borrowed(&simple.label),
            BrandNode::Composite(_) => Cow::Owned(self.label_display().to_string()),
        }
    }

    pub(crate) fn label_display(&self) -> LabelDisplay<'_, T> {
        LabelDisplay(self)
    }

    /// The brand's own ID; `None` for composite brands
    pub fn id(&self) -> Option<BrandId> {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => Some(simple.id),
            BrandNode::Composite(_) => None,
        }
    }

    /// IDs of the simple brands this brand is built from, in branding order
    pub fn lineage(&self) -> Vec<BrandId> {
        let mut ids = Vec::new();
        self.collect_lineage(&mut ids);
        ids
    }

    pub(crate) fn collect_lineage(&self, ids: &mut Vec<BrandId>) {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => ids.push(simple.id),
            BrandNode::Composite(composite) => composite.collect_lineage(ids),
        }
    }

    /// Check if this brand was produced by `merge` or `refine`
    pub fn is_composite(&self) -> bool {
        matches!(self.node.as_ref(), BrandNode::Composite(_))
    }

    /// Check if both handles refer to the same brand
    pub fn ptr_eq(&self, other: &Brand<T>) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Release registry entries of dropped objects, across the lineage
    ///
    /// Returns the number of entries released.
    pub fn purge(&self) -> usize {
        match self.node.as_ref() {
            BrandNode::Simple(simple) => simple.registry.purge(),
            BrandNode::Composite(composite) => composite.purge(),
        }
    }
}

/// Writes a brand's label without materializing composite labels
pub(crate) struct LabelDisplay<'a, T: ?Sized>(&'a Brand<T>);

impl<T: ?Sized> fmt::Display for LabelDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.node.as_ref() {
            BrandNode::Simple(simple) => f.write_str(&simple.label),
            BrandNode::Composite(composite) => composite.fmt_label(f),
        }
    }
}

impl<T: ?Sized> Clone for Brand<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Brand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Brand")
            .field("label", &self.label_display().to_string())
            .field("descriptor", self.descriptor())
            .field("lineage", &self.lineage())
            .finish()
    }
}

/// Builder for simple brands
pub struct BrandBuilder<T: ?Sized> {
    descriptor: BrandDescriptor,
    label: Option<String>,
    on_brand: Option<OnBrand<T>>,
}

impl<T: ?Sized> BrandBuilder<T> {
    /// Create a builder with an empty descriptor and no callback
    pub fn new() -> Self {
        Self {
            descriptor: BrandDescriptor::new(),
            label: None,
            on_brand: None,
        }
    }

    /// Set the descriptor
    pub fn descriptor(mut self, descriptor: BrandDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Set the label used in errors and logs
    ///
    /// Defaults to the descriptor's `kind` field, or the brand ID.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the callback run on every successful branding
    pub fn on_brand<F>(mut self, on_brand: F) -> Self
    where
        F: Fn(&Arc<T>, &BrandDescriptor) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_brand = Some(Arc::new(on_brand));
        self
    }

    /// Set an already shared callback
    pub fn on_brand_shared(mut self, on_brand: OnBrand<T>) -> Self {
        self.on_brand = Some(on_brand);
        self
    }

    /// Build the brand with a fresh ID and an empty registry
    pub fn build(self) -> Brand<T> {
        let id = BrandId::new();
        let label = self
            .label
            .or_else(|| self.descriptor.kind().map(str::to_string))
            .unwrap_or_else(|| id.to_string());

        Brand::from_node(BrandNode::Simple(SimpleBrand {
            id,
            label,
            descriptor: self.descriptor,
            registry: BrandRegistry::new(),
            on_brand: self.on_brand,
        }))
    }
}

impl<T: ?Sized> Default for BrandBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
