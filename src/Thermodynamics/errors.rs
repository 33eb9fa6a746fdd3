use crate::Reactions::reaction_parser::ParseError;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Residual element/charge counts of an unbalanced reaction (substrates minus products).
/// Components that are exactly zero are not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Imbalance {
    pub reaction: String,
    pub residual: BTreeMap<String, f64>,
}

impl Imbalance {
    /// largest absolute residual component
    pub fn magnitude(&self) -> f64 {
        self.residual.values().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    pub fn is_balanced(&self) -> bool {
        self.residual.is_empty()
    }
}

impl fmt::Display for Imbalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .residual
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        write!(f, "'{}' is not balanced ({})", self.reaction, parts.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum ThermoError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("unknown compound identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("imbalanced reaction: {0}")]
    ImbalancedReaction(Imbalance),
    #[error("covariance matrix of rank {rank} (size {size}) is singular, precision is undefined")]
    SingularCovariance { size: usize, rank: usize },
    #[error("imbalance {imbalance} exceeds tolerance {tolerance}")]
    ToleranceExceeded { imbalance: f64, tolerance: f64 },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("calculation error: {0}")]
    Calculation(String),
    #[error("failed to load data: {0}")]
    DataLoad(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}
