//! # Draft / Publish Hand-off
//!
//! The editor never stores pages itself. Saving a draft or publishing means
//! exporting the current tree and passing it to a [`DraftStore`]. Retries,
//! conflicts and transport errors are the store's business; its error is
//! returned to the caller untouched.

use crate::export::ExportedDocument;
use std::cell::RefCell;
use std::convert::Infallible;

/// External collaborator that receives serialized pages
pub trait DraftStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save_draft(&self, document: &ExportedDocument) -> Result<(), Self::Error>;

    fn publish(&self, document: &ExportedDocument) -> Result<(), Self::Error>;
}

/// In-memory store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    drafts: RefCell<Vec<ExportedDocument>>,
    published: RefCell<Vec<ExportedDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drafts(&self) -> Vec<ExportedDocument> {
        self.drafts.borrow().clone()
    }

    pub fn published(&self) -> Vec<ExportedDocument> {
        self.published.borrow().clone()
    }

    pub fn latest_draft(&self) -> Option<ExportedDocument> {
        self.drafts.borrow().last().cloned()
    }
}

impl DraftStore for MemoryStore {
    type Error = Infallible;

    fn save_draft(&self, document: &ExportedDocument) -> Result<(), Self::Error> {
        self.drafts.borrow_mut().push(document.clone());
        Ok(())
    }

    fn publish(&self, document: &ExportedDocument) -> Result<(), Self::Error> {
        self.published.borrow_mut().push(document.clone());
        Ok(())
    }
}
