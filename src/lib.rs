//! # CIM Brand
//!
//! Side-channel brands for shared domain objects.
//!
//! A brand marks an `Arc<T>` as having passed some check (validated,
//! authenticated, external, ...) without altering, copying, or wrapping it.
//! Other code later asks the same brand whether the object carries it.
//!
//! - **Brand**: created from a [`BrandDescriptor`] and an optional callback;
//!   `brand`, `has`, `assert`
//! - **Registry**: weak, identity-keyed membership owned by each simple brand
//! - **Composition**: `merge` two brands into one that requires both, or
//!   `refine` a brand with an extra descriptor
//!
//! ## Design Principles
//!
//! 1. **Identity, not equality**: membership is keyed by allocation
//! 2. **Non-owning**: a registry never keeps a branded object's value alive
//! 3. **Explicit identity**: every brand gets a [`BrandId`]; descriptors are data
//! 4. **No global state**: each brand owns or shares only its lineage's registries
//!
//! ## Example
//!
//! ```rust
//! use cim_brand::{Brand, BrandDescriptor, BrandError};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Request {
//!     path: String,
//! }
//!
//! let external = Brand::<Request>::new(BrandDescriptor::new().with("kind", "external"));
//! let req = Arc::new(Request { path: "/orders".into() });
//!
//! external.brand(&req)?;
//! assert!(external.has(&req));
//! assert!(external.brand(&req).unwrap_err().is_already_branded());
//!
//! let other = Arc::new(Request { path: "/orders".into() });
//! assert!(!external.has(&other));
//! assert!(external.assert(&other).unwrap_err().is_not_branded());
//! # Ok::<(), BrandError>(())
//! ```

#![warn(missing_docs)]

mod brand;
mod composition;
mod descriptor;
mod errors;
mod identifiers;
mod registry;

pub use brand::{Brand, BrandBuilder, OnBrand};
pub use descriptor::BrandDescriptor;
pub use errors::{BrandError, BrandResult};
pub use identifiers::{BrandId, ObjectKey};
