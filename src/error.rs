use std::fmt;

use thiserror::Error;

use crate::model::RecipeField;

/// A single rule violation on one recipe field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: RecipeField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: RecipeField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Raw recipe data violated one or more field rules.
///
/// The factory stops at the first violation, so errors coming from
/// [`crate::factory::RecipeFactory::create`] always hold exactly one entry.
/// [`crate::validation::validate_all`] collects every violation instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The first offending field in validation order
    pub fn first(&self) -> &FieldError {
        &self.errors[0]
    }

    pub fn message_for(&self, field: RecipeField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl From<FieldError> for ValidationError {
    fn from(err: FieldError) -> Self {
        ValidationError::new(vec![err])
    }
}

/// Failures raised by a key-value medium
#[derive(Error, Debug)]
pub enum MediumError {
    /// The medium has no room left for the value
    #[error("Storage capacity exceeded while writing '{key}'")]
    CapacityExceeded { key: String },

    /// The stored bytes are not valid UTF-8
    #[error("Stored value under '{key}' is not valid UTF-8")]
    Undecodable { key: String },

    /// Any other read or write failure
    #[error("Storage I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during recipe store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller passed a recipe or id that cannot be stored
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Persisting the collection ran out of space
    #[error("Storage is full. Delete some recipes to free space and try again.")]
    CapacityExceeded {
        #[source]
        source: MediumError,
    },

    /// Persisting the collection failed for a reason other than space
    #[error("Failed to persist recipes: {0}")]
    Persistence(#[source] MediumError),

    /// Failed to encode the collection
    #[error("Failed to serialize recipes: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<MediumError> for StoreError {
    fn from(err: MediumError) -> Self {
        match err {
            MediumError::CapacityExceeded { .. } => StoreError::CapacityExceeded { source: err },
            MediumError::Undecodable { .. } | MediumError::Io { .. } => {
                StoreError::Persistence(err)
            }
        }
    }
}

impl StoreError {
    /// Whether the user can recover by freeing space
    pub fn is_capacity(&self) -> bool {
        matches!(self, StoreError::CapacityExceeded { .. })
    }
}

/// Crate-level error for the CRUD façade and binary
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Raw input did not pass validation
    #[error("Invalid recipe: {0}")]
    ValidationError(#[from] ValidationError),

    /// Store operation failed
    #[error(transparent)]
    StoreError(#[from] StoreError),

    /// No recipe with the given id
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
