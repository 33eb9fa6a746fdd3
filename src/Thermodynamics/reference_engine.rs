//! # Reference engine interface
//!
//! The estimators never compute formation energies themselves: they ask an injected
//! [`ReferenceEngine`] for
//! - the transformed standard formation energy of a compound at a given state together
//!   with its uncertainty vector (`formation_energy`),
//! - the element and charge composition of a compound (`composition`).
//!
//! Uncertainty vectors of all compounds have the same length `k`; column `j` is the
//! contribution of the `j`-th independent error source, so two compounds sharing a
//! source are correlated. [`crate::Thermodynamics::compound_table::CompoundTable`] is the
//! implementation shipped with the crate; tests use small in-memory tables.
use crate::Thermodynamics::errors::ThermoError;
use crate::Thermodynamics::thermo_state::ThermodynamicState;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uom::si::f64::MolarConcentration;
use uom::si::molar_concentration::mole_per_liter;

/// Phase of a compound. It decides which activity correction a concentration gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Phases {
    #[default]
    Aqueous,
    Gas,
    Liquid,
    Solid,
}

impl Phases {
    /// liquid and solid species always have unit activity
    pub fn has_fixed_activity(&self) -> bool {
        matches!(self, Phases::Liquid | Phases::Solid)
    }
}

/// Element counts and net charge of one compound
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Composition {
    pub elements: BTreeMap<String, f64>,
    pub charge: f64,
}

/// key used for charge in residual maps
pub const CHARGE_KEY: &str = "charge";

impl Composition {
    pub fn new(elements: BTreeMap<String, f64>, charge: f64) -> Self {
        Self { elements, charge }
    }

    pub fn count(&self, element: &str) -> f64 {
        self.elements.get(element).copied().unwrap_or(0.0)
    }

    /// a bare proton: one hydrogen, charge +1
    pub fn is_proton(&self) -> bool {
        self.charge == 1.0 && self.elements.len() == 1 && self.count("H") == 1.0
    }

    /// Adds `factor` times this composition (charge included) to `totals`.
    pub fn accumulate(&self, factor: f64, totals: &mut BTreeMap<String, f64>) {
        for (element, n) in &self.elements {
            *totals.entry(element.clone()).or_insert(0.0) += factor * n;
        }
        *totals.entry(CHARGE_KEY.to_string()).or_insert(0.0) += factor * self.charge;
    }
}

/// Formation energy of one compound at one state, kJ/mol
#[derive(Debug, Clone, PartialEq)]
pub struct FormationEnergy {
    pub mean: f64,
    pub uncertainty: DVector<f64>,
}

pub trait ReferenceEngine {
    /// Transformed standard formation energy (kJ/mol) and its uncertainty vector
    fn formation_energy(
        &self,
        identifier: &str,
        state: &ThermodynamicState,
    ) -> Result<FormationEnergy, ThermoError>;
    fn composition(&self, identifier: &str) -> Result<Composition, ThermoError>;
    /// number of independent uncertainty sources `k`
    fn uncertainty_dimension(&self) -> usize;
    fn phase(&self, _identifier: &str) -> Result<Phases, ThermoError> {
        Ok(Phases::Aqueous)
    }
    /// concentration used by `dg_prime` when the caller gives none
    fn default_abundance(&self, _identifier: &str) -> MolarConcentration {
        MolarConcentration::new::<mole_per_liter>(1.0)
    }
}

impl<E: ReferenceEngine + ?Sized> ReferenceEngine for &E {
    fn formation_energy(
        &self,
        identifier: &str,
        state: &ThermodynamicState,
    ) -> Result<FormationEnergy, ThermoError> {
        (**self).formation_energy(identifier, state)
    }
    fn composition(&self, identifier: &str) -> Result<Composition, ThermoError> {
        (**self).composition(identifier)
    }
    fn uncertainty_dimension(&self) -> usize {
        (**self).uncertainty_dimension()
    }
    fn phase(&self, identifier: &str) -> Result<Phases, ThermoError> {
        (**self).phase(identifier)
    }
    fn default_abundance(&self, identifier: &str) -> MolarConcentration {
        (**self).default_abundance(identifier)
    }
}
