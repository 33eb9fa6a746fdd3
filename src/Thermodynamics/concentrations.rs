//! Per-compound concentration overrides for `dg_prime`.
//!
//! Values arrive in any unit convertible to mol/L, are canonicalized to molar and are
//! clamped from below at [`EPSILON_MOLAR`] (0.001 mM): the reference data is not valid
//! for smaller concentrations, so such values are replaced rather than rejected.
//! Compounds missing from the map are not zero; the estimator uses the engine's default.
use crate::Thermodynamics::errors::ThermoError;
use log::debug;
use std::collections::HashMap;
use uom::si::f64::MolarConcentration;
use uom::si::molar_concentration::mole_per_liter;

/// lower bound of any resolved concentration, mol/L
pub const EPSILON_MOLAR: f64 = 1e-6;

/// `max(x, eps)`
pub fn lower_bound(x: f64, eps: f64) -> f64 {
    if x < eps { eps } else { x }
}

/// identifier -> concentration in mol/L, every value >= [`EPSILON_MOLAR`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConcentrationMap {
    molar: HashMap<String, f64>,
}

impl ConcentrationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `(identifier, concentration)` pairs. A `HashMap` or a `Vec` of pairs both
    /// work. Listing the same identifier twice is a caller error and is rejected.
    pub fn resolve<I, K>(pairs: I) -> Result<Self, ThermoError>
    where
        I: IntoIterator<Item = (K, MolarConcentration)>,
        K: AsRef<str>,
    {
        let mut molar = HashMap::new();
        for (identifier, concentration) in pairs {
            let identifier = identifier.as_ref().trim().to_string();
            let value = concentration.get::<mole_per_liter>();
            if !value.is_finite() {
                return Err(ThermoError::InvalidInput(format!(
                    "concentration of '{}' is not a finite number",
                    identifier
                )));
            }
            let resolved = lower_bound(value, EPSILON_MOLAR);
            if resolved != value {
                debug!(
                    "concentration of '{}' raised from {} M to {} M",
                    identifier, value, resolved
                );
            }
            if molar.insert(identifier.clone(), resolved).is_some() {
                return Err(ThermoError::InvalidInput(format!(
                    "concentration of '{}' given more than once",
                    identifier
                )));
            }
        }
        Ok(Self { molar })
    }

    pub fn get(&self, identifier: &str) -> Option<MolarConcentration> {
        self.molar
            .get(identifier)
            .map(|&c| MolarConcentration::new::<mole_per_liter>(c))
    }

    /// mol/L
    pub fn get_molar(&self, identifier: &str) -> Option<f64> {
        self.molar.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.molar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molar.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, MolarConcentration)> {
        self.molar
            .iter()
            .map(|(k, &v)| (k, MolarConcentration::new::<mole_per_liter>(v)))
    }
}
