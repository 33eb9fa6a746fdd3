//! # Gibbs energy estimator
//!
//! ## Aim
//! ΔG' of a single reaction at the estimator's thermodynamic state:
//! - `standard_dg_prime`: every reactant at 1 M (ΔG'⁰);
//! - `physiological_dg_prime`: every reactant at 1 mM, gases at 1 mbar (ΔG'ᵐ);
//! - `dg_prime`: concentrations from a [`ConcentrationMap`], engine defaults for the rest;
//! - `ln_reversibility_index`: ln Γ = (2/N)·ΔG'ᵐ/RT.
//!
//! ## Main logic
//! ΔG' = Σ νᵢ (ΔfG'°ᵢ + RT·ln aᵢ) over the net stoichiometry (products positive),
//! stddev = ‖Σ νᵢ uᵢ‖ where uᵢ are the uncertainty vectors of the engine. Protons do not
//! contribute at all: their activity is set by pH, and ΔfG'°(H⁺) + RT·ln a(H⁺) = 0 in the
//! transformed frame. The pH dependence enters through the hydrogen count of the other
//! species. The activity term is dropped for liquid or solid species.
//!
//! Every estimate starts with the balance check; the [`BalancePolicy`] of the estimator
//! decides whether an unbalanced reaction gives an absent value and whether it is reported.
//!
//! ## Usage
//! ```no_run
//! use BioThermo::Reactions::namespaces::bigg;
//! use BioThermo::Reactions::reaction_parser::ReactionEquation;
//! use BioThermo::Thermodynamics::compound_table::CompoundTable;
//! use BioThermo::Thermodynamics::gibbs_estimator::GibbsEstimator;
//! use BioThermo::Thermodynamics::thermo_state::ThermodynamicState;
//! let table = CompoundTable::from_file("data/compounds.json").unwrap();
//! let estimator = GibbsEstimator::new(table, ThermodynamicState::default());
//! let atp_hydrolysis = ReactionEquation::parse(&bigg("atp + h2o = adp + pi").unwrap()).unwrap();
//! let dg = estimator.standard_dg_prime(&atp_hydrolysis).unwrap();
//! println!("{}", dg.value.unwrap());
//! ```
use crate::Reactions::reaction_parser::ReactionEquation;
use crate::Thermodynamics::balance::{BalancePolicy, check_balance};
use crate::Thermodynamics::concentrations::{ConcentrationMap, EPSILON_MOLAR, lower_bound};
use crate::Thermodynamics::errors::{Imbalance, ThermoError};
use crate::Thermodynamics::reference_engine::{Phases, ReferenceEngine};
use crate::Thermodynamics::thermo_state::ThermodynamicState;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use std::fmt;
use uom::si::f64::{MolarConcentration, MolarEnergy, Pressure, ThermodynamicTemperature};
use uom::si::molar_concentration::mole_per_liter;
use uom::si::molar_energy::kilojoule_per_mole;
use uom::si::pressure::{bar, millibar};

/// reactant concentration under physiological conditions, mol/L
pub const PHYSIOLOGICAL_CONCENTRATION_M: f64 = 1e-3;

/// partial pressure of gases under physiological conditions
pub fn physiological_pressure() -> Pressure {
    Pressure::new::<millibar>(1.0)
}

/// Mean and standard deviation of a reaction energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GibbsEnergyEstimate {
    pub mean: MolarEnergy,
    pub stddev: MolarEnergy,
}

impl GibbsEnergyEstimate {
    pub fn from_kj_per_mol(mean: f64, stddev: f64) -> Self {
        Self {
            mean: MolarEnergy::new::<kilojoule_per_mole>(mean),
            stddev: MolarEnergy::new::<kilojoule_per_mole>(stddev),
        }
    }

    pub fn mean_kj(&self) -> f64 {
        self.mean.get::<kilojoule_per_mole>()
    }

    pub fn stddev_kj(&self) -> f64 {
        self.stddev.get::<kilojoule_per_mole>()
    }
}

impl fmt::Display for GibbsEnergyEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ± {:.2} kJ/mol", self.mean_kj(), self.stddev_kj())
    }
}

/// ln Γ and its standard deviation, dimensionless
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReversibilityIndex {
    pub mean: f64,
    pub stddev: f64,
}

impl fmt::Display for ReversibilityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ln(Γ) = {:.2} ± {:.2}", self.mean, self.stddev)
    }
}

/// A value that the balance policy may have suppressed, plus the imbalance report if any
#[derive(Debug, Clone, PartialEq)]
pub struct Estimated<T> {
    pub value: Option<T>,
    pub warning: Option<Imbalance>,
}

impl<T> Estimated<T> {
    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Estimated<U> {
        Estimated {
            value: self.value.map(f),
            warning: self.warning,
        }
    }
}

/// Which activities enter the reaction energy
#[derive(Debug, Clone, Copy)]
pub(crate) enum Conditions<'a> {
    Standard,
    Physiological,
    Measured(Option<&'a ConcentrationMap>),
}

pub struct GibbsEstimator<E: ReferenceEngine> {
    pub(crate) engine: E,
    pub(crate) state: ThermodynamicState,
    pub(crate) policy: BalancePolicy,
}

#[allow(non_snake_case)]
impl<E: ReferenceEngine> GibbsEstimator<E> {
    pub fn new(engine: E, state: ThermodynamicState) -> Self {
        Self {
            engine,
            state,
            policy: BalancePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BalancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> &ThermodynamicState {
        &self.state
    }

    pub fn policy(&self) -> BalancePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: BalancePolicy) {
        self.policy = policy;
    }

    pub fn get_pH(&self) -> f64 {
        self.state.pH()
    }

    pub fn get_pMg(&self) -> f64 {
        self.state.pMg()
    }

    pub fn get_ionic_strength(&self) -> MolarConcentration {
        self.state.ionic_strength()
    }

    pub fn get_temperature(&self) -> ThermodynamicTemperature {
        self.state.temperature()
    }

    pub fn set_pH(&mut self, pH: f64) {
        self.state.set_pH(pH);
    }

    pub fn set_pMg(&mut self, pMg: f64) {
        self.state.set_pMg(pMg);
    }

    pub fn set_ionic_strength(&mut self, ionic_strength: MolarConcentration) {
        self.state.set_ionic_strength(ionic_strength);
    }

    pub fn set_temperature(&mut self, temperature: ThermodynamicTemperature) {
        self.state.set_temperature(temperature);
    }

    /// back to pH 7.5, pMg 3, 0.25 M, 298.15 K
    pub fn reset_state(&mut self) {
        self.state.reset();
    }

    /// ΔG'⁰, every reactant at 1 M
    pub fn standard_dg_prime(
        &self,
        reaction: &ReactionEquation,
    ) -> Result<Estimated<GibbsEnergyEstimate>, ThermoError> {
        self.estimate(reaction, Conditions::Standard)
    }

    /// ΔG'ᵐ, every reactant at 1 mM and gases at 1 mbar
    pub fn physiological_dg_prime(
        &self,
        reaction: &ReactionEquation,
    ) -> Result<Estimated<GibbsEnergyEstimate>, ThermoError> {
        self.estimate(reaction, Conditions::Physiological)
    }

    /// ΔG' at the given concentrations. Compounds missing from the map (or every compound
    /// when `concentrations` is `None`) take the default abundance of the engine.
    /// Gas species stay at the 1 bar reference pressure.
    pub fn dg_prime(
        &self,
        reaction: &ReactionEquation,
        concentrations: Option<&ConcentrationMap>,
    ) -> Result<Estimated<GibbsEnergyEstimate>, ThermoError> {
        self.estimate(reaction, Conditions::Measured(concentrations))
    }

    /// ln Γ = (2/N)·ΔG'ᵐ/RT, N being the number of reactant molecules whose activity
    /// is not fixed (protons, liquids and solids excluded)
    pub fn ln_reversibility_index(
        &self,
        reaction: &ReactionEquation,
    ) -> Result<Estimated<ReversibilityIndex>, ThermoError> {
        let physiological = self.physiological_dg_prime(reaction)?;
        let Some(dg) = physiological.value else {
            return Ok(Estimated {
                value: None,
                warning: physiological.warning,
            });
        };
        let mut n = 0.0;
        for (identifier, nu) in reaction.net_stoichiometry() {
            if self.engine.composition(&identifier)?.is_proton()
                || self.engine.phase(&identifier)?.has_fixed_activity()
            {
                continue;
            }
            n += nu.abs();
        }
        if n == 0.0 {
            return Err(ThermoError::Calculation(format!(
                "reversibility index of '{}' is undefined: no reactant has a variable activity",
                reaction
            )));
        }
        let scale = 2.0 / (n * self.state.RT());
        Ok(Estimated {
            value: Some(ReversibilityIndex {
                mean: scale * dg.mean_kj(),
                stddev: scale * dg.stddev_kj(),
            }),
            warning: physiological.warning,
        })
    }

    /// ΔfG'⁰ of the given compounds and their covariance matrix, kJ/mol and (kJ/mol)²
    pub fn standard_dg_formation<S: AsRef<str>>(
        &self,
        identifiers: &[S],
    ) -> Result<(DVector<f64>, DMatrix<f64>), ThermoError> {
        let (mean, sqrt) = self.formation_terms(identifiers, &self.state)?;
        let cov = &sqrt * sqrt.transpose();
        Ok((mean, cov))
    }

    /// ΔfG'⁰ vector (m) and uncertainty matrix U (m×k) of the given compounds
    pub(crate) fn formation_terms<S: AsRef<str>>(
        &self,
        identifiers: &[S],
        state: &ThermodynamicState,
    ) -> Result<(DVector<f64>, DMatrix<f64>), ThermoError> {
        let k = self.engine.uncertainty_dimension();
        let mut mean = DVector::zeros(identifiers.len());
        let mut sqrt = DMatrix::zeros(identifiers.len(), k);
        for (i, identifier) in identifiers.iter().enumerate() {
            let formation = self.engine.formation_energy(identifier.as_ref(), state)?;
            check_dimension(identifier.as_ref(), formation.uncertainty.len(), k)?;
            mean[i] = formation.mean;
            sqrt.set_row(i, &formation.uncertainty.transpose());
        }
        Ok((mean, sqrt))
    }

    fn estimate(
        &self,
        reaction: &ReactionEquation,
        conditions: Conditions<'_>,
    ) -> Result<Estimated<GibbsEnergyEstimate>, ThermoError> {
        let verdict = self.policy.apply(check_balance(&self.engine, reaction)?);
        if !verdict.proceed {
            info!("'{}' is not balanced, no estimate returned", reaction);
            return Ok(Estimated {
                value: None,
                warning: verdict.warning,
            });
        }
        let (mean, uncertainty) = self.reaction_terms(reaction, &self.state, conditions)?;
        Ok(Estimated {
            value: Some(GibbsEnergyEstimate::from_kj_per_mol(mean, uncertainty.norm())),
            warning: verdict.warning,
        })
    }

    /// Σν(ΔfG'° + RT ln a) and Σν·u of `reaction` at `state`, no balance check
    pub(crate) fn reaction_terms(
        &self,
        reaction: &ReactionEquation,
        state: &ThermodynamicState,
        conditions: Conditions<'_>,
    ) -> Result<(f64, DVector<f64>), ThermoError> {
        let k = self.engine.uncertainty_dimension();
        let rt = state.RT();
        let mut mean = 0.0;
        let mut uncertainty = DVector::zeros(k);
        for (identifier, nu) in reaction.net_stoichiometry() {
            if nu == 0.0 || self.engine.composition(&identifier)?.is_proton() {
                continue;
            }
            let formation = self.engine.formation_energy(&identifier, state)?;
            check_dimension(&identifier, formation.uncertainty.len(), k)?;
            let ln_activity = self.ln_activity(&identifier, conditions)?;
            mean += nu * (formation.mean + rt * ln_activity);
            uncertainty.axpy(nu, &formation.uncertainty, 1.0);
        }
        debug!("ΔG' of '{}': {} kJ/mol", reaction, mean);
        Ok((mean, uncertainty))
    }

    fn ln_activity(&self, identifier: &str, conditions: Conditions<'_>) -> Result<f64, ThermoError> {
        let phase = self.engine.phase(identifier)?;
        if phase.has_fixed_activity() {
            return Ok(0.0);
        }
        let ln_activity = match (conditions, phase) {
            (Conditions::Standard, _) => 0.0,
            (Conditions::Physiological, Phases::Gas) => {
                (physiological_pressure().get::<bar>()).ln()
            }
            (Conditions::Physiological, _) => PHYSIOLOGICAL_CONCENTRATION_M.ln(),
            (Conditions::Measured(_), Phases::Gas) => 0.0,
            (Conditions::Measured(concentrations), _) => {
                let molar = concentrations
                    .and_then(|map| map.get_molar(identifier))
                    .unwrap_or_else(|| {
                        self.engine
                            .default_abundance(identifier)
                            .get::<mole_per_liter>()
                    });
                lower_bound(molar, EPSILON_MOLAR).ln()
            }
        };
        Ok(ln_activity)
    }
}

pub(crate) fn check_dimension(identifier: &str, found: usize, expected: usize) -> Result<(), ThermoError> {
    if found != expected {
        return Err(ThermoError::Calculation(format!(
            "uncertainty vector of '{}' has {} components, expected {}",
            identifier, found, expected
        )));
    }
    Ok(())
}
