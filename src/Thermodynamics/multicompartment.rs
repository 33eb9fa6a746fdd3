//! # Reactions across a membrane
//!
//! A transport reaction is written as two half reactions: `inner` takes place in the
//! compartment described by the estimator's state, `outer` in a second compartment whose
//! pH, pMg and ionic strength may differ. Only the two halves together are a real
//! reaction, so only their sum is balance-checked.
//!
//! `ΔG'⁰ = ΔG'⁰(inner) + ΔG'⁰(outer) + nH·RT·ln10·(pH(inner) − pH(outer)) + F·z·Δψ`
//!
//! Each half is transformed at the pH of its own compartment. nH is the net number of
//! hydrogen atoms (protons included) the outer half produces, z the net charge it produces,
//! and Δψ = ψ(outer) − ψ(inner). The pH term puts the hydrogen moved between the two frames
//! back at the chemical potential of H⁺ in each compartment, so moving protons towards the
//! acidic side costs energy and a neutral species crosses at no cost.
use crate::Reactions::reaction_parser::ReactionEquation;
use crate::Thermodynamics::balance::check_balance;
use crate::Thermodynamics::errors::ThermoError;
use crate::Thermodynamics::gibbs_estimator::{Conditions, GibbsEnergyEstimate, GibbsEstimator};
use crate::Thermodynamics::reference_engine::ReferenceEngine;
use crate::Thermodynamics::thermo_state::{FARADAY, StateOverride};
use log::debug;
use std::f64::consts::LN_10;
use uom::si::electric_potential::volt;
use uom::si::f64::ElectricPotential;

#[derive(Debug, Clone, PartialEq)]
pub struct MultiCompartmentSpec {
    pub inner: ReactionEquation,
    pub outer: ReactionEquation,
    /// ψ(outer) − ψ(inner)
    pub potential_difference: ElectricPotential,
    pub outer_state: StateOverride,
    /// largest allowed element or charge residual of inner + outer
    pub tolerance: f64,
}

impl MultiCompartmentSpec {
    /// Exact balance is required until [`MultiCompartmentSpec::with_tolerance`] says otherwise.
    pub fn new(
        inner: ReactionEquation,
        outer: ReactionEquation,
        potential_difference: ElectricPotential,
        outer_state: StateOverride,
    ) -> Self {
        Self {
            inner,
            outer,
            potential_difference,
            outer_state,
            tolerance: 0.0,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl<E: ReferenceEngine> GibbsEstimator<E> {
    /// net charge produced by `reaction`
    pub fn transported_charge(&self, reaction: &ReactionEquation) -> Result<f64, ThermoError> {
        let mut charge = 0.0;
        for (identifier, nu) in reaction.net_stoichiometry() {
            charge += nu * self.engine.composition(&identifier)?.charge;
        }
        Ok(charge)
    }

    /// net number of hydrogen atoms produced by `reaction`, free protons included
    pub fn transported_hydrogen(&self, reaction: &ReactionEquation) -> Result<f64, ThermoError> {
        let mut hydrogen = 0.0;
        for (identifier, nu) in reaction.net_stoichiometry() {
            hydrogen += nu * self.engine.composition(&identifier)?.count("H");
        }
        Ok(hydrogen)
    }

    /// ΔG'⁰ of a reaction split over two compartments
    pub fn multicompartmental_standard_dg_prime(
        &self,
        spec: &MultiCompartmentSpec,
    ) -> Result<GibbsEnergyEstimate, ThermoError> {
        if !spec.tolerance.is_finite() || spec.tolerance < 0.0 {
            return Err(ThermoError::InvalidInput(format!(
                "balance tolerance must be a non-negative number, got {}",
                spec.tolerance
            )));
        }
        let overall = spec.inner.combine(&spec.outer);
        let imbalance = check_balance(&self.engine, &overall)?.magnitude();
        if imbalance > spec.tolerance {
            return Err(ThermoError::ToleranceExceeded {
                imbalance,
                tolerance: spec.tolerance,
            });
        }

        let outer_state = self.state.with_overrides(&spec.outer_state);
        let (inner_dg, inner_u) =
            self.reaction_terms(&spec.inner, &self.state, Conditions::Standard)?;
        let (outer_dg, outer_u) =
            self.reaction_terms(&spec.outer, &outer_state, Conditions::Standard)?;
        let n_h = self.transported_hydrogen(&spec.outer)?;
        let proton_gradient =
            n_h * self.state.RT() * LN_10 * (self.state.pH() - outer_state.pH());
        let z = self.transported_charge(&spec.outer)?;
        let electric = FARADAY * z * spec.potential_difference.get::<volt>();
        debug!(
            "inner {} kJ/mol, outer {} kJ/mol, nH = {}, ΔpH term {} kJ/mol, z = {}, electric term {} kJ/mol",
            inner_dg, outer_dg, n_h, proton_gradient, z, electric
        );
        let mean = inner_dg + outer_dg + proton_gradient + electric;
        let stddev = (inner_u + outer_u).norm();
        Ok(GibbsEnergyEstimate::from_kj_per_mol(mean, stddev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reactions::namespaces::bigg;
    use crate::Thermodynamics::compound_table::CompoundTable;
    use crate::Thermodynamics::test_fixtures::{ATP_HYDROLYSIS, fixture_table};
    use crate::Thermodynamics::thermo_state::ThermodynamicState;
    use approx::assert_relative_eq;
    use uom::si::electric_potential::millivolt;

    fn estimator() -> GibbsEstimator<CompoundTable> {
        GibbsEstimator::new(fixture_table(), ThermodynamicState::default())
    }

    fn half(text: &str) -> ReactionEquation {
        ReactionEquation::parse_half_reaction(&bigg(text).unwrap()).unwrap()
    }

    fn atp_synthase(outer: &str) -> MultiCompartmentSpec {
        MultiCompartmentSpec::new(
            half("adp + pi + 2 h = h2o + atp"),
            half(&format!(" = {}", outer)),
            ElectricPotential::new::<millivolt>(150.0),
            StateOverride {
                pH: Some(6.5),
                ..StateOverride::default()
            },
        )
    }

    #[test]
    fn test_exact_balance_with_zero_tolerance() {
        let estimator = estimator();
        let result = estimator
            .multicompartmental_standard_dg_prime(&atp_synthase("2 h"))
            .unwrap();
        let rt = estimator.state().RT();
        // two protons pushed from pH 7.5 into pH 6.5 against a positive outer potential
        let expected = -ATP_HYDROLYSIS + 2.0 * rt * LN_10 * (7.5 - 6.5) + 2.0 * FARADAY * 0.150;
        assert_relative_eq!(result.mean_kj(), expected, epsilon = 1e-9);
        assert_relative_eq!(result.stddev_kj(), 0.0525f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_unbalanced_proton_exceeds_zero_tolerance() {
        let estimator = estimator();
        let result = estimator.multicompartmental_standard_dg_prime(&atp_synthase("h"));
        assert!(matches!(
            result,
            Err(ThermoError::ToleranceExceeded { imbalance, tolerance })
                if imbalance == 1.0 && tolerance == 0.0
        ));
        let relaxed = atp_synthase("h").with_tolerance(1.0);
        let result = estimator.multicompartmental_standard_dg_prime(&relaxed).unwrap();
        let rt = estimator.state().RT();
        let expected = -ATP_HYDROLYSIS + rt * LN_10 * (7.5 - 6.5) + FARADAY * 0.150;
        assert_relative_eq!(result.mean_kj(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let estimator = estimator();
        let spec = atp_synthase("2 h").with_tolerance(-0.1);
        assert!(matches!(
            estimator.multicompartmental_standard_dg_prime(&spec),
            Err(ThermoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_outer_state_does_not_touch_estimator_state() {
        let estimator = estimator();
        let before = *estimator.state();
        estimator
            .multicompartmental_standard_dg_prime(&atp_synthase("2 h"))
            .unwrap();
        assert_eq!(*estimator.state(), before);
    }

    #[test]
    fn test_no_potential_and_same_state_reduces_to_chemistry() {
        let estimator = estimator();
        let spec = MultiCompartmentSpec::new(
            half("adp + pi + 2 h = h2o + atp"),
            half(" = 2 h"),
            ElectricPotential::new::<millivolt>(0.0),
            StateOverride::default(),
        );
        let result = estimator.multicompartmental_standard_dg_prime(&spec).unwrap();
        assert_relative_eq!(result.mean_kj(), -ATP_HYDROLYSIS, epsilon = 1e-9);
    }

    fn transport(inner: &str, outer: &str, outer_pH: f64) -> MultiCompartmentSpec {
        MultiCompartmentSpec::new(
            half(inner),
            half(outer),
            ElectricPotential::new::<millivolt>(0.0),
            StateOverride {
                pH: Some(outer_pH),
                ..StateOverride::default()
            },
        )
    }

    #[test]
    fn test_protons_into_acidic_side_cost_energy() {
        let estimator = estimator();
        let rt_ln10 = estimator.state().RT() * LN_10;
        let uphill = estimator
            .multicompartmental_standard_dg_prime(&transport("2 h = ", " = 2 h", 6.5))
            .unwrap();
        assert_relative_eq!(uphill.mean_kj(), 2.0 * rt_ln10, epsilon = 1e-9);
        assert!(uphill.mean_kj() > 11.0);
        let downhill = estimator
            .multicompartmental_standard_dg_prime(&transport(" = 2 h", "2 h = ", 6.5))
            .unwrap();
        assert_relative_eq!(downhill.mean_kj(), -2.0 * rt_ln10, epsilon = 1e-9);
        assert_eq!(uphill.stddev_kj(), 0.0);
    }

    #[test]
    fn test_neutral_species_crosses_a_ph_gradient_for_free() {
        let estimator = estimator();
        let result = estimator
            .multicompartmental_standard_dg_prime(&transport("glc__D = ", " = glc__D", 6.0))
            .unwrap();
        assert_relative_eq!(result.mean_kj(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transported_hydrogen() {
        let estimator = estimator();
        assert_eq!(estimator.transported_hydrogen(&half(" = 2 h")).unwrap(), 2.0);
        assert_eq!(estimator.transported_hydrogen(&half("glc__D = ")).unwrap(), -12.0);
        assert_eq!(
            estimator
                .transported_hydrogen(&half("atp + h2o = adp + pi"))
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn test_transported_charge() {
        let estimator = estimator();
        assert_eq!(estimator.transported_charge(&half(" = 2 h")).unwrap(), 2.0);
        assert_eq!(estimator.transported_charge(&half("2 h = ")).unwrap(), -2.0);
        assert_eq!(
            estimator
                .transported_charge(&half("atp + h2o = adp + pi"))
                .unwrap(),
            0.0
        );
    }
}
