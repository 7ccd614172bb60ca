// Copyright 2025 Cowboy AI, LLC.

//! Error types for brand operations

use thiserror::Error;

/// Errors that can occur while branding or checking objects
#[derive(Debug, Error)]
pub enum BrandError {
    /// The object already carries this exact brand
    #[error("Object already branded: {brand}")]
    AlreadyBranded {
        /// Label of the brand that refused the object
        brand: String,
    },

    /// The object does not carry the required brand
    #[error("Object not branded: {brand}")]
    NotBranded {
        /// Label of the brand that was required
        brand: String,
    },

    /// The `on_brand` callback failed; the registration was rolled back.
    ///
    /// The callback's error is carried unchanged and can be downcast.
    #[error(transparent)]
    Callback(anyhow::Error),

    /// A descriptor could not be built from the supplied value
    #[error("Invalid brand descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Result type for brand operations
pub type BrandResult<T> = Result<T, BrandError>;

impl BrandError {
    /// Create an already-branded error for the given brand label
    pub fn already_branded(brand: impl Into<String>) -> Self {
        BrandError::AlreadyBranded {
            brand: brand.into(),
        }
    }

    /// Create a not-branded error for the given brand label
    pub fn not_branded(brand: impl Into<String>) -> Self {
        BrandError::NotBranded {
            brand: brand.into(),
        }
    }

    /// Check if this is an already-branded error
    pub fn is_already_branded(&self) -> bool {
        matches!(self, BrandError::AlreadyBranded { .. })
    }

    /// Check if this is a not-branded error
    pub fn is_not_branded(&self) -> bool {
        matches!(self, BrandError::NotBranded { .. })
    }

    /// Check if this error came from an `on_brand` callback
    pub fn is_callback(&self) -> bool {
        matches!(self, BrandError::Callback(_))
    }

    /// Borrow the callback's original error, if this is a callback failure
    pub fn callback_error(&self) -> Option<&anyhow::Error> {
        match self {
            BrandError::Callback(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BrandError {
    fn from(err: serde_json::Error) -> Self {
        BrandError::InvalidDescriptor(err.to_string())
    }
}
