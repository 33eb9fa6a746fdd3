//! Small in-memory compound table shared by the unit tests.
//! Nucleotides are stored in their neutral fully protonated form, so hydrolysis reactions
//! balance without explicit protons and their ΔrG'° does not depend on pH.
//! Lactate dehydrogenase needs one explicit H⁺ and its ΔrG'° rises by RT·ln10 per pH unit.
use crate::Thermodynamics::compound_table::CompoundTable;

pub(crate) const FIXTURE_LIBRARY: &str = r#"{"compounds": [
  {"id": "bigg.metabolite:atp", "aliases": ["kegg:C00002"], "formula": "C10H16N5O13P3",
   "formation_energy": -2776.1, "uncertainty": {"adenosine": 1.0, "p_anhydride": 0.4}},
  {"id": "bigg.metabolite:adp", "formula": "C10H15N5O10P2",
   "formation_energy": -1906.1, "uncertainty": {"adenosine": 1.0, "p_anhydride": 0.2, "adp_own": 0.05}},
  {"id": "bigg.metabolite:amp", "formula": "C10H14N5O7P",
   "formation_energy": -1040.4, "uncertainty": {"adenosine": 1.0}},
  {"id": "bigg.metabolite:gtp", "formula": "C10H16N5O14P3",
   "formation_energy": -2970.0, "uncertainty": {"guanosine": 1.2, "p_anhydride": 0.4}},
  {"id": "bigg.metabolite:gdp", "formula": "C10H15N5O11P2",
   "formation_energy": -2099.9, "uncertainty": {"guanosine": 1.2, "p_anhydride": 0.2}},
  {"id": "bigg.metabolite:pi", "formula": "H3PO4",
   "formation_energy": -1137.3, "uncertainty": {"phosphate": 0.1}},
  {"id": "bigg.metabolite:h2o", "formula": "H2O", "formation_energy": -237.19, "phase": "Liquid"},
  {"id": "bigg.metabolite:h", "formula": "H", "charge": 1, "formation_energy": 0.0},
  {"id": "bigg.metabolite:co2", "formula": "CO2", "formation_energy": -394.36, "phase": "Gas"},
  {"id": "bigg.metabolite:pyr", "formula": "C3H4O3", "formation_energy": -486.0,
   "uncertainty": {"carboxylate": 0.7}},
  {"id": "bigg.metabolite:lac__L", "formula": "C3H6O3", "formation_energy": -630.9,
   "uncertainty": {"carboxylate": 0.7, "alcohol": 0.8}},
  {"id": "bigg.metabolite:nad", "formula": "C21H28N7O14P2", "charge": 1, "formation_energy": -1038.9,
   "uncertainty": {"nicotinamide": 2.0}},
  {"id": "bigg.metabolite:nadh", "formula": "C21H29N7O14P2", "formation_energy": -1120.1,
   "uncertainty": {"nicotinamide": 2.0, "dihydropyridine": 0.5}},
  {"id": "bigg.metabolite:glc__D", "formula": "C6H12O6", "formation_energy": -915.9,
   "uncertainty": {"hexose": 1.5}, "default_abundance": 0.005}
]}"#;

/// ΔrG° of `atp + h2o = adp + pi` in the fixture, kJ/mol
pub(crate) const ATP_HYDROLYSIS: f64 = -30.11;

/// ΔrG° of `pyr + nadh + h = lac__L + nad` in the fixture (pH 0), kJ/mol
pub(crate) const LACTATE_DEHYDROGENASE: f64 = -63.7;

pub(crate) fn fixture_table() -> CompoundTable {
    CompoundTable::from_json_str(FIXTURE_LIBRARY).unwrap()
}
