//! # Pipeline Step
//!
//! [`ValidationStep`] is the transport-agnostic form of "validate, write back,
//! then continue". It owns a [`SchemaSet`], reads raw segments from any
//! [`SegmentStore`], and on success replaces every bound segment with its
//! sanitized value before control moves on.
//!
//! HTTP adapters (see `reqval-api`) wrap this step; they only translate their
//! request type into a `SegmentStore` and the error into a response.

use crate::engine::{self, Outcome};
use crate::error::RequestValidationError;
use crate::schema::SchemaSet;
use crate::segment::SegmentStore;

#[derive(Debug, Clone)]
pub struct ValidationStep {
    schemas: SchemaSet,
}

impl ValidationStep {
    pub fn new(schemas: SchemaSet) -> Self {
        Self { schemas }
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    /// Validate `store` without modifying it.
    pub fn check<S: SegmentStore + ?Sized>(&self, store: &S) -> Outcome {
        engine::validate(&self.schemas, store)
    }

    /// Validate `store` and, on success, write every sanitized segment back.
    ///
    /// On failure `store` is left exactly as it was.
    pub fn apply<S: SegmentStore + ?Sized>(&self, store: &mut S) -> Result<(), RequestValidationError> {
        let sanitized = self.check(&*store).into_result()?;
        for (name, value) in sanitized {
            store.set_segment(name.as_str(), value);
        }
        Ok(())
    }

    /// Continuation form: `proceed(store, None)` after write-back, or
    /// `proceed(store, Some(error))` when the request is invalid.
    pub fn run<S, F, R>(&self, store: &mut S, proceed: F) -> R
    where
        S: SegmentStore + ?Sized,
        F: FnOnce(&mut S, Option<RequestValidationError>) -> R,
    {
        match self.apply(store) {
            Ok(()) => proceed(store, None),
            Err(err) => proceed(store, Some(err)),
        }
    }
}

impl From<SchemaSet> for ValidationStep {
    fn from(schemas: SchemaSet) -> Self {
        Self::new(schemas)
    }
}
