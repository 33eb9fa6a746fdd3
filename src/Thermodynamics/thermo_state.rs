//! Thermodynamic conditions of the aqueous compartment: pH, pMg, ionic strength and
//! temperature. Quantities enter as `uom` values in any unit and are kept in kelvin and
//! mol/L internally.
use serde::{Deserialize, Serialize};
use std::fmt;
use uom::si::f64::{MolarConcentration, ThermodynamicTemperature};
use uom::si::molar_concentration::mole_per_liter;
use uom::si::thermodynamic_temperature::kelvin;

/// gas constant, kJ/(mol K)
pub const R: f64 = 8.314_462_618e-3;
/// Faraday constant, kJ/(mol V)
pub const FARADAY: f64 = 96.485_332_12;

pub const DEFAULT_PH: f64 = 7.5;
pub const DEFAULT_PMG: f64 = 3.0;
pub const DEFAULT_IONIC_STRENGTH_M: f64 = 0.25;
pub const DEFAULT_TEMPERATURE_K: f64 = 298.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct ThermodynamicState {
    pH: f64,
    pMg: f64,
    /// mol/L
    ionic_strength: f64,
    /// K
    temperature: f64,
}

/// Partial state used for the outer compartment of a membrane reaction.
/// Fields left `None` fall back to the base state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(non_snake_case)]
pub struct StateOverride {
    pub pH: Option<f64>,
    pub pMg: Option<f64>,
    pub ionic_strength: Option<MolarConcentration>,
}

impl Default for ThermodynamicState {
    fn default() -> Self {
        Self {
            pH: DEFAULT_PH,
            pMg: DEFAULT_PMG,
            ionic_strength: DEFAULT_IONIC_STRENGTH_M,
            temperature: DEFAULT_TEMPERATURE_K,
        }
    }
}

#[allow(non_snake_case)]
impl ThermodynamicState {
    pub fn new(
        pH: f64,
        pMg: f64,
        ionic_strength: MolarConcentration,
        temperature: ThermodynamicTemperature,
    ) -> Self {
        Self {
            pH,
            pMg,
            ionic_strength: ionic_strength.get::<mole_per_liter>(),
            temperature: temperature.get::<kelvin>(),
        }
    }
    /// pH 7.5, pMg 3, 0.25 M, 298.15 K
    pub fn reset(&mut self) {
        *self = Self::default();
    }
    pub fn pH(&self) -> f64 {
        self.pH
    }
    pub fn pMg(&self) -> f64 {
        self.pMg
    }
    pub fn ionic_strength(&self) -> MolarConcentration {
        MolarConcentration::new::<mole_per_liter>(self.ionic_strength)
    }
    pub fn temperature(&self) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(self.temperature)
    }
    pub fn ionic_strength_molar(&self) -> f64 {
        self.ionic_strength
    }
    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature
    }
    pub fn set_pH(&mut self, pH: f64) {
        self.pH = pH;
    }
    pub fn set_pMg(&mut self, pMg: f64) {
        self.pMg = pMg;
    }
    pub fn set_ionic_strength(&mut self, ionic_strength: MolarConcentration) {
        self.ionic_strength = ionic_strength.get::<mole_per_liter>();
    }
    pub fn set_temperature(&mut self, temperature: ThermodynamicTemperature) {
        self.temperature = temperature.get::<kelvin>();
    }
    /// R*T in kJ/mol
    pub fn RT(&self) -> f64 {
        R * self.temperature
    }
    /// Copy of this state with the given fields replaced; `self` is untouched.
    pub fn with_overrides(&self, overrides: &StateOverride) -> Self {
        Self {
            pH: overrides.pH.unwrap_or(self.pH),
            pMg: overrides.pMg.unwrap_or(self.pMg),
            ionic_strength: overrides
                .ionic_strength
                .map(|i| i.get::<mole_per_liter>())
                .unwrap_or(self.ionic_strength),
            temperature: self.temperature,
        }
    }
}

impl fmt::Display for ThermodynamicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Temperature:    {} K", self.temperature)?;
        writeln!(f, "Ionic strength: {} M", self.ionic_strength)?;
        writeln!(f, "pH:             {}", self.pH)?;
        write!(f, "pMg:            {}", self.pMg)
    }
}
