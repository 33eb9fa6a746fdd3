//! # Compound table
//!
//! ## Aim
//! A [`ReferenceEngine`] backed by a JSON library of compound records. Each record holds
//! the chemical formation energy of one reference species (pH 0, zero ionic strength),
//! its formula and charge, its phase and a set of named uncertainty contributions.
//!
//! ## Main logic
//! - the union of all uncertainty source names (sorted) defines the columns of the
//!   uncertainty vectors, so compounds sharing a source are correlated;
//! - formation energies are transformed to the requested pH, pMg and ionic strength with
//!   the Legendre transform of Alberty (extended Debye-Hückel activity correction):
//!   `ΔfG'° = ΔfG° + nH·RT·ln10·pH + nMg·(RT·ln10·pMg − ΔfG°(Mg)) − RTα·√I/(1+B√I)·(z² − nH − 4nMg)`.
//!   The proton itself is the species whose chemical potential the transform holds fixed,
//!   so its transformed formation energy is zero.
//!
//! ## Library format
//! ```json
//! { "compounds": [
//!   { "id": "bigg.metabolite:atp", "aliases": ["kegg:C00002"], "formula": "C10H16N5O13P3",
//!     "charge": 0, "formation_energy": -2776.1,
//!     "uncertainty": { "adenosine": 1.0, "p_anhydride": 0.4 } }
//! ] }
//! ```
//! `phase` defaults to `"Aqueous"`, `aliases` and `uncertainty` to empty,
//! `default_abundance` (mol/L) to none.
use crate::Thermodynamics::errors::ThermoError;
use crate::Thermodynamics::reference_engine::{
    Composition, FormationEnergy, Phases, ReferenceEngine,
};
use crate::Thermodynamics::thermo_state::ThermodynamicState;
use crate::Utils::load_from_file::load_compound_library;
use log::{debug, info};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::f64::consts::LN_10;
use uom::si::f64::MolarConcentration;
use uom::si::molar_concentration::mole_per_liter;

/// Debye-Hückel B parameter, (kg/mol)^0.5
pub const DEBYE_HUCKEL_B: f64 = 1.6;
/// formation energy of Mg2+, kJ/mol
pub const MG_FORMATION_ENERGY: f64 = -455.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub formula: String,
    #[serde(default)]
    pub charge: f64,
    /// kJ/mol
    pub formation_energy: f64,
    /// kJ/mol per named source
    #[serde(default)]
    pub uncertainty: BTreeMap<String, f64>,
    #[serde(default)]
    pub phase: Phases,
    /// mol/L
    #[serde(default)]
    pub default_abundance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundLibrary {
    pub compounds: Vec<CompoundRecord>,
}

/// Parses formulas like `C10H16N5O13P3` or `Na(NO3)2` into element counts.
pub fn parse_formula(formula: &str) -> Result<BTreeMap<String, f64>, ThermoError> {
    let bad = |why: &str| ThermoError::InvalidInput(format!("formula '{}': {}", formula, why));
    let chars: Vec<char> = formula.chars().filter(|c| !c.is_whitespace()).collect();
    let mut stack: Vec<BTreeMap<String, f64>> = vec![BTreeMap::new()];
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '(' {
            stack.push(BTreeMap::new());
            i += 1;
        } else if c == ')' {
            let (multiplier, next) = read_count(&chars, i + 1);
            i = next;
            if stack.len() < 2 {
                return Err(bad("unmatched ')'"));
            }
            let Some(group) = stack.pop() else {
                return Err(bad("unmatched ')'"));
            };
            let Some(top) = stack.last_mut() else {
                return Err(bad("unmatched ')'"));
            };
            for (element, n) in group {
                *top.entry(element).or_insert(0.0) += n * multiplier;
            }
        } else if c.is_ascii_uppercase() {
            let mut element = c.to_string();
            i += 1;
            if i < chars.len() && chars[i].is_ascii_lowercase() {
                element.push(chars[i]);
                i += 1;
            }
            let (n, next) = read_count(&chars, i);
            i = next;
            let Some(top) = stack.last_mut() else {
                return Err(bad("malformed groups"));
            };
            *top.entry(element).or_insert(0.0) += n;
        } else {
            return Err(bad(&format!("unexpected character '{}'", c)));
        }
    }
    if stack.len() != 1 {
        return Err(bad("unmatched '('"));
    }
    Ok(stack.pop().unwrap_or_default())
}

// count after an element or a closing bracket, 1 when absent
fn read_count(chars: &[char], start: usize) -> (f64, usize) {
    let mut end = start;
    while end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '.') {
        end += 1;
    }
    let digits: String = chars[start..end].iter().collect();
    (digits.parse().unwrap_or(1.0), end)
}

/// RT·α(T)·√I/(1+B·√I), kJ/mol
pub fn debye_huckel(state: &ThermodynamicState) -> f64 {
    let t = state.temperature_kelvin();
    let alpha = 1.10708 - 1.54508e-3 * t + 5.95584e-6 * t * t;
    let sqrt_i = state.ionic_strength_molar().max(0.0).sqrt();
    state.RT() * alpha * sqrt_i / (1.0 + DEBYE_HUCKEL_B * sqrt_i)
}

#[derive(Debug, Clone)]
pub struct CompoundTable {
    records: Vec<CompoundRecord>,
    compositions: Vec<Composition>,
    index: HashMap<String, usize>,
    sources: Vec<String>,
}

impl CompoundTable {
    pub fn from_records(records: Vec<CompoundRecord>) -> Result<Self, ThermoError> {
        let mut index = HashMap::new();
        let mut compositions = Vec::with_capacity(records.len());
        let mut sources = BTreeSet::new();
        for (i, record) in records.iter().enumerate() {
            for key in std::iter::once(&record.id).chain(record.aliases.iter()) {
                if index.insert(key.clone(), i).is_some() {
                    return Err(ThermoError::InvalidInput(format!(
                        "identifier '{}' appears twice in the compound library",
                        key
                    )));
                }
            }
            compositions.push(Composition::new(
                parse_formula(&record.formula)?,
                record.charge,
            ));
            sources.extend(record.uncertainty.keys().cloned());
        }
        debug!(
            "compound table: {} compounds, {} uncertainty sources",
            records.len(),
            sources.len()
        );
        Ok(Self {
            records,
            compositions,
            index,
            sources: sources.into_iter().collect(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ThermoError> {
        let library: CompoundLibrary = serde_json::from_str(json)?;
        Self::from_records(library.compounds)
    }

    /// Loads the library file. This is the slow part of building an estimator.
    pub fn from_file(path: &str) -> Result<Self, ThermoError> {
        let library = load_compound_library(path).map_err(ThermoError::DataLoad)?;
        let table = Self::from_records(library.compounds)?;
        info!("loaded {} compounds from '{}'", table.len(), path);
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn uncertainty_sources(&self) -> &[String] {
        &self.sources
    }

    pub fn record(&self, identifier: &str) -> Result<&CompoundRecord, ThermoError> {
        self.position(identifier).map(|i| &self.records[i])
    }

    fn position(&self, identifier: &str) -> Result<usize, ThermoError> {
        self.index
            .get(identifier)
            .copied()
            .ok_or_else(|| ThermoError::UnknownIdentifier(identifier.to_string()))
    }
}

impl ReferenceEngine for CompoundTable {
    fn formation_energy(
        &self,
        identifier: &str,
        state: &ThermodynamicState,
    ) -> Result<FormationEnergy, ThermoError> {
        let i = self.position(identifier)?;
        let record = &self.records[i];
        let composition = &self.compositions[i];
        // H+ is the species held constant by the transform, its ΔfG'° is zero at every pH
        if composition.is_proton() {
            return Ok(FormationEnergy {
                mean: 0.0,
                uncertainty: DVector::zeros(self.sources.len()),
            });
        }
        let n_h = composition.count("H");
        let n_mg = composition.count("Mg");
        let z = record.charge;
        let rt_ln10 = state.RT() * LN_10;
        let mean = record.formation_energy
            + n_h * rt_ln10 * state.pH()
            + n_mg * (rt_ln10 * state.pMg() - MG_FORMATION_ENERGY)
            - debye_huckel(state) * (z * z - n_h - 4.0 * n_mg);
        let uncertainty = DVector::from_iterator(
            self.sources.len(),
            self.sources
                .iter()
                .map(|s| record.uncertainty.get(s).copied().unwrap_or(0.0)),
        );
        Ok(FormationEnergy { mean, uncertainty })
    }

    fn composition(&self, identifier: &str) -> Result<Composition, ThermoError> {
        self.position(identifier)
            .map(|i| self.compositions[i].clone())
    }

    fn uncertainty_dimension(&self) -> usize {
        self.sources.len()
    }

    fn phase(&self, identifier: &str) -> Result<Phases, ThermoError> {
        self.record(identifier).map(|r| r.phase)
    }

    fn default_abundance(&self, identifier: &str) -> MolarConcentration {
        let molar = self
            .record(identifier)
            .ok()
            .and_then(|r| r.default_abundance)
            .unwrap_or(1.0);
        MolarConcentration::new::<mole_per_liter>(molar)
    }
}
