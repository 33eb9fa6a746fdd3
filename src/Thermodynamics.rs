/// error types shared by the thermodynamic modules
pub mod errors;
/// pH, pMg, ionic strength and temperature of a compartment
#[allow(non_snake_case)]
pub mod thermo_state;
/// interface of the formation energy source injected into the estimators
pub mod reference_engine;
/// JSON compound library with the Legendre transform to a given thermodynamic state
/// # Examples
/// ```
/// use BioThermo::Thermodynamics::compound_table::CompoundTable;
/// use BioThermo::Thermodynamics::reference_engine::ReferenceEngine;
/// use BioThermo::Thermodynamics::thermo_state::ThermodynamicState;
/// let table = CompoundTable::from_json_str(
///     r#"{"compounds": [{"id": "kegg:C00080", "formula": "H", "charge": 1, "formation_energy": 0.0}]}"#,
/// )
/// .unwrap();
/// let proton = table.formation_energy("kegg:C00080", &ThermodynamicState::default()).unwrap();
/// assert_eq!(proton.mean, 0.0);
/// ```
pub mod compound_table;
/// user given concentrations, converted to mol/L and clamped at 0.001 mM
/// # Examples
/// ```
/// use BioThermo::Thermodynamics::concentrations::{ConcentrationMap, EPSILON_MOLAR};
/// use uom::si::f64::MolarConcentration;
/// use uom::si::molar_concentration::{micromole_per_liter, millimole_per_liter};
/// let map = ConcentrationMap::resolve(vec![
///     ("bigg.metabolite:atp", MolarConcentration::new::<millimole_per_liter>(2.0)),
///     ("bigg.metabolite:adp", MolarConcentration::new::<micromole_per_liter>(0.003)),
/// ])
/// .unwrap();
/// assert_eq!(map.get_molar("bigg.metabolite:adp"), Some(EPSILON_MOLAR));
/// ```
pub mod concentrations;
/// element and charge balance with the skip/warn policies
pub mod balance;
/// ΔG'⁰, ΔG'ᵐ, ΔG' and the reversibility index of single reactions
#[allow(non_snake_case)]
pub mod gibbs_estimator;
mod gibbs_estimator_tests;
/// ΔG'⁰ of reaction batches with covariance, precision, sqrt or fullrank uncertainty
/// # Examples
/// ```
/// use BioThermo::Reactions::reaction_parser::ReactionEquation;
/// use BioThermo::Thermodynamics::compound_table::CompoundTable;
/// use BioThermo::Thermodynamics::gibbs_estimator::GibbsEstimator;
/// use BioThermo::Thermodynamics::thermo_state::ThermodynamicState;
/// use BioThermo::Thermodynamics::uncertainty::RepresentationKind;
/// let table = CompoundTable::from_json_str(r#"{"compounds": [
///     {"id": "a", "formula": "C2H4O2", "formation_energy": -389.9, "uncertainty": {"s1": 0.5}},
///     {"id": "b", "formula": "C2H4O2", "formation_energy": -380.0, "uncertainty": {"s2": 0.3}}
/// ]}"#)
/// .unwrap();
/// let estimator = GibbsEstimator::new(table, ThermodynamicState::default());
/// let reactions = vec![ReactionEquation::parse("a = b").unwrap()];
/// let result = estimator
///     .standard_dg_prime_multi(&reactions, RepresentationKind::FullRank, false)
///     .unwrap();
/// assert_eq!(result.uncertainty.matrix().shape(), (1, 1));
/// result.to_table().printstd();
/// ```
pub mod uncertainty;
/// reactions split over two compartments with a membrane potential
pub mod multicompartment;
#[cfg(test)]
pub(crate) mod test_fixtures;
