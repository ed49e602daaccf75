use std::sync::Arc;

use log::debug;

use crate::error::{MediumError, StoreError};
use crate::medium::KeyValueMedium;
use crate::model::RawRecipe;
use crate::reporter::{ErrorReporter, Notice};

/// Default key for the in-progress form draft
pub const DRAFT_KEY: &str = "recipe_form_draft";

/// Keeps one unsubmitted recipe form between sessions.
///
/// Drafts are raw and unvalidated. An unreadable draft is reported,
/// deleted, and treated as absent.
pub struct DraftStore<M: KeyValueMedium> {
    medium: M,
    key: String,
    reporter: Arc<dyn ErrorReporter>,
}

impl<M: KeyValueMedium> DraftStore<M> {
    pub fn new(medium: M, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self::with_key(medium, DRAFT_KEY, reporter)
    }

    pub fn with_key(medium: M, key: impl Into<String>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            medium,
            key: key.into(),
            reporter,
        }
    }

    pub fn save(&mut self, draft: &RawRecipe) -> Result<(), StoreError> {
        let blob = serde_json::to_string(draft)?;
        self.medium.set(&self.key, &blob)?;
        debug!("Saved draft '{}'", self.key);
        Ok(())
    }

    pub fn load(&mut self) -> Result<Option<RawRecipe>, StoreError> {
        let blob = match self.medium.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Ok(None),
            Err(err @ MediumError::Undecodable { .. }) => {
                return self.drop_unreadable(err.to_string());
            }
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&blob) {
            Ok(draft) => Ok(Some(draft)),
            Err(err) => self.drop_unreadable(err.to_string()),
        }
    }

    fn drop_unreadable(&mut self, reason: String) -> Result<Option<RawRecipe>, StoreError> {
        self.reporter.warn(&Notice::DraftUnreadable {
            key: self.key.clone(),
            reason,
        });
        self.discard()?;
        Ok(None)
    }

    /// Delete the draft, typically after a successful submit or on cancel
    pub fn discard(&mut self) -> Result<(), StoreError> {
        self.medium.remove(&self.key)?;
        Ok(())
    }

    pub fn into_medium(self) -> M {
        self.medium
    }
}
