//! Loader - fills a quad store from Turtle text.
//!
//! A parse error ends the load early. Quads read before the error stay in the
//! store, so a partially broken document still yields a usable fact base.

use std::path::Path;
use tracing::{error, info};

use fable_store::turtle;
use fable_store::{QuadStore, TurtleError};

use crate::config::FableConfig;
use crate::dialogue::DialogueEngine;
use crate::error::Result;
use crate::projection::{GraphProjector, VisualGraph};

/// The bundled "Ant and the Grasshopper" data set.
pub const SAMPLE_TURTLE: &str = include_str!("../../data/ant_grasshopper.ttl");

/// Outcome of a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// Quads added to the store by this load.
    pub quads_loaded: usize,
    /// The error that ended the load early, if any.
    pub error: Option<TurtleError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// The quad count, or the parse error.
    pub fn into_result(self) -> Result<usize> {
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(self.quads_loaded),
        }
    }
}

/// Stream Turtle text into `store`.
pub fn load_turtle(store: &mut QuadStore, input: &str) -> LoadReport {
    let before = store.len();
    let outcome = turtle::parse(input, store);
    let quads_loaded = store.len() - before;

    match outcome {
        Ok(_) => {
            info!(quads = quads_loaded, "loaded fable facts");
            LoadReport {
                quads_loaded,
                error: None,
            }
        }
        Err(err) => {
            error!(
                position = ?err.position(),
                quads_kept = quads_loaded,
                "failed to parse fable facts: {}",
                err
            );
            LoadReport {
                quads_loaded,
                error: Some(err),
            }
        }
    }
}

/// Load the bundled data set into a fresh store.
pub fn load_sample() -> FactBase {
    FactBase::from_turtle(SAMPLE_TURTLE)
}

/// A finished load: the read-only store and how the load went.
#[derive(Debug, Clone)]
pub struct FactBase {
    store: QuadStore,
    report: LoadReport,
}

impl FactBase {
    /// Load Turtle text into a fresh store.
    pub fn from_turtle(input: &str) -> Self {
        let mut store = QuadStore::new();
        let report = load_turtle(&mut store, input);
        Self { store, report }
    }

    /// The bundled data set.
    pub fn sample() -> Self {
        load_sample()
    }

    /// Read a Turtle file. Only I/O failures are errors here; parse failures
    /// land in the report.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_turtle(&input))
    }

    pub fn store(&self) -> &QuadStore {
        &self.store
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Project the facts with the default vocabulary.
    pub fn project(&self) -> VisualGraph {
        GraphProjector::new(&self.store).project()
    }

    /// A dialogue engine with the built-in rules.
    pub fn dialogue(&self) -> DialogueEngine<'_> {
        DialogueEngine::new(&self.store)
    }

    /// A dialogue engine built from configuration.
    pub fn dialogue_with(&self, config: &FableConfig) -> DialogueEngine<'_> {
        DialogueEngine::from_config(&self.store, config)
    }
}
