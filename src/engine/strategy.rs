// In: src/engine/strategy.rs

//! The strategy document and its compiled form.
//!
//! A strategy is a named sequence of flagging steps, stored on disk as a
//! JSON document. "Compiling" a document means parsing it and running the
//! semantic checks the serde layer cannot express (positive thresholds,
//! at least one step). The compiled form is what a strategy handle owns.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FlagError;

/// One flagging operation inside a strategy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StrategyStep {
    /// Flag samples whose amplitude exceeds the robust plane median by more
    /// than `factor` times the MAD-estimated noise level.
    Threshold { factor: f32 },

    /// The iterative SumThreshold pass: exponentially growing windows in
    /// both the time and channel directions, with the per-window threshold
    /// decaying as the window grows.
    SumThreshold {
        #[serde(default = "default_base_sensitivity")]
        base_sensitivity: f32,
        #[serde(default = "default_max_window")]
        max_window: usize,
    },

    /// Morphological dilation of the mask by `time` cells along the time
    /// axis and `channel` cells along the frequency axis.
    Extend {
        #[serde(default)]
        time: usize,
        #[serde(default)]
        channel: usize,
    },
}

fn default_base_sensitivity() -> f32 {
    6.0
}

fn default_max_window() -> usize {
    64
}

/// The on-disk strategy document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StrategyDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<StrategyStep>,
}

/// A parsed and validated strategy, ready to run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStrategy {
    doc: StrategyDoc,
}

impl CompiledStrategy {
    /// Validates a parsed document and seals it.
    pub fn compile(doc: StrategyDoc) -> Result<Self, FlagError> {
        if doc.steps.is_empty() {
            return Err(FlagError::MalformedStrategy(format!(
                "strategy '{}' has no steps",
                doc.name
            )));
        }
        for step in &doc.steps {
            match *step {
                StrategyStep::Threshold { factor } => {
                    if !factor.is_finite() || factor <= 0.0 {
                        return Err(FlagError::MalformedStrategy(format!(
                            "strategy '{}': threshold factor must be positive, got {}",
                            doc.name, factor
                        )));
                    }
                }
                StrategyStep::SumThreshold {
                    base_sensitivity,
                    max_window,
                } => {
                    if !base_sensitivity.is_finite() || base_sensitivity <= 0.0 {
                        return Err(FlagError::MalformedStrategy(format!(
                            "strategy '{}': base sensitivity must be positive, got {}",
                            doc.name, base_sensitivity
                        )));
                    }
                    if max_window == 0 {
                        return Err(FlagError::MalformedStrategy(format!(
                            "strategy '{}': max window must be at least 1",
                            doc.name
                        )));
                    }
                }
                StrategyStep::Extend { .. } => {}
            }
        }
        Ok(Self { doc })
    }

    /// Parses and compiles a strategy from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, FlagError> {
        let doc: StrategyDoc = serde_json::from_str(json)?;
        Self::compile(doc)
    }

    /// Loads, parses and compiles a strategy file. Missing or unreadable
    /// files surface as [`FlagError::Io`], parse failures as
    /// [`FlagError::SerdeJson`]; there is no retry and no fallback.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FlagError> {
        let json = fs::read_to_string(path.as_ref())?;
        let compiled = Self::from_json(&json)?;
        log::info!(
            "loaded strategy '{}' ({} steps) from {}",
            compiled.name(),
            compiled.steps().len(),
            path.as_ref().display()
        );
        Ok(compiled)
    }

    pub fn name(&self) -> &str {
        &self.doc.name
    }

    pub fn steps(&self) -> &[StrategyStep] {
        &self.doc.steps
    }
}
