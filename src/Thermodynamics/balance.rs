//! Element and charge balance of a parsed reaction.
//!
//! The residual is the substrate total minus the product total of every element and of
//! the charge. The two policy flags only decide what the caller sees for an unbalanced
//! reaction; they never change the residual itself.
use crate::Reactions::reaction_parser::{ReactionEquation, StoichTerm};
use crate::Thermodynamics::errors::{Imbalance, ThermoError};
use crate::Thermodynamics::reference_engine::ReferenceEngine;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Residual components at or below this count as zero. The floor only absorbs the
/// rounding left by fractional coefficients (0.1·16 + 0.2·2 is not exactly 2.0);
/// any real imbalance is far above it.
pub const BALANCE_NOISE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePolicy {
    /// return no value for an unbalanced reaction
    pub skip_unbalanced: bool,
    /// report an unbalanced reaction as a non-fatal warning
    pub balance_warn: bool,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self {
            skip_unbalanced: false,
            balance_warn: true,
        }
    }
}

impl BalancePolicy {
    pub fn new(skip_unbalanced: bool, balance_warn: bool) -> Self {
        Self {
            skip_unbalanced,
            balance_warn,
        }
    }
}

/// What the policy made of a balance check
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceVerdict {
    /// false when the reaction must produce an absent result
    pub proceed: bool,
    pub warning: Option<Imbalance>,
}

impl BalancePolicy {
    pub fn apply(&self, imbalance: Imbalance) -> BalanceVerdict {
        if imbalance.is_balanced() {
            return BalanceVerdict {
                proceed: true,
                warning: None,
            };
        }
        let warning = if self.balance_warn {
            warn!("{}", imbalance);
            Some(imbalance)
        } else {
            None
        };
        BalanceVerdict {
            proceed: !self.skip_unbalanced,
            warning,
        }
    }
}

fn side_totals<E: ReferenceEngine>(
    engine: &E,
    terms: &[StoichTerm],
    sign: f64,
    totals: &mut BTreeMap<String, f64>,
) -> Result<(), ThermoError> {
    for term in terms {
        engine
            .composition(&term.identifier)?
            .accumulate(sign * term.coefficient, totals);
    }
    Ok(())
}

/// Residual of `reaction`; an unknown identifier is an error.
pub fn check_balance<E: ReferenceEngine>(
    engine: &E,
    reaction: &ReactionEquation,
) -> Result<Imbalance, ThermoError> {
    let mut totals = BTreeMap::new();
    side_totals(engine, &reaction.left, 1.0, &mut totals)?;
    side_totals(engine, &reaction.right, -1.0, &mut totals)?;
    totals.retain(|_, v| v.abs() > BALANCE_NOISE);
    Ok(Imbalance {
        reaction: reaction.to_string(),
        residual: totals,
    })
}

pub fn is_balanced<E: ReferenceEngine>(
    engine: &E,
    reaction: &ReactionEquation,
) -> Result<bool, ThermoError> {
    Ok(check_balance(engine, reaction)?.is_balanced())
}
