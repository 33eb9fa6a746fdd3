//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Reactions::namespaces::{Namespace, bigg};
    use crate::Reactions::reaction_parser::ReactionEquation;
    use crate::Thermodynamics::balance::BalancePolicy;
    use crate::Thermodynamics::compound_table::CompoundTable;
    use crate::Thermodynamics::concentrations::ConcentrationMap;
    use crate::Thermodynamics::errors::ThermoError;
    use crate::Thermodynamics::gibbs_estimator::{GibbsEnergyEstimate, GibbsEstimator};
    use crate::Thermodynamics::reference_engine::ReferenceEngine;
    use crate::Thermodynamics::test_fixtures::{ATP_HYDROLYSIS, LACTATE_DEHYDROGENASE, fixture_table};
    use crate::Thermodynamics::thermo_state::ThermodynamicState;
    use approx::assert_relative_eq;
    use std::f64::consts::LN_10;
    use uom::si::f64::{MolarConcentration, ThermodynamicTemperature};
    use uom::si::molar_concentration::millimole_per_liter;
    use uom::si::thermodynamic_temperature::kelvin;

    fn estimator() -> GibbsEstimator<CompoundTable> {
        GibbsEstimator::new(fixture_table(), ThermodynamicState::default())
    }

    fn reaction(text: &str) -> ReactionEquation {
        ReactionEquation::parse(&bigg(text).unwrap()).unwrap()
    }

    #[test]
    fn test_standard_atp_hydrolysis() {
        let estimator = estimator();
        let dg = estimator
            .standard_dg_prime(&reaction("atp + h2o = adp + pi"))
            .unwrap();
        assert!(dg.warning.is_none());
        let dg = dg.value.unwrap();
        assert_relative_eq!(dg.mean_kj(), ATP_HYDROLYSIS, epsilon = 1e-9);
        // adp and atp share the adenosine source, it cancels
        assert_relative_eq!(dg.stddev_kj(), 0.0525f64.sqrt(), epsilon = 1e-12);
        assert_eq!(format!("{}", dg), "-30.11 ± 0.23 kJ/mol");
    }

    #[test]
    fn test_hydrolysis_without_protons_does_not_depend_on_state() {
        let mut estimator = estimator();
        let rxn = reaction("atp + h2o = adp + pi");
        estimator.set_pH(6.0);
        estimator.set_ionic_strength(MolarConcentration::new::<millimole_per_liter>(100.0));
        let dg = estimator.standard_dg_prime(&rxn).unwrap().value.unwrap();
        assert_relative_eq!(dg.mean_kj(), ATP_HYDROLYSIS, epsilon = 1e-9);
    }

    #[test]
    fn test_physiological_concentrations() {
        let estimator = estimator();
        let rt = estimator.state().RT();
        let dg = estimator
            .physiological_dg_prime(&reaction("atp + h2o = adp + pi"))
            .unwrap()
            .value
            .unwrap();
        // water keeps unit activity, one net solute is produced
        assert_relative_eq!(dg.mean_kj(), ATP_HYDROLYSIS + rt * 1e-3f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_gas_at_one_millibar() {
        let estimator = estimator().with_policy(BalancePolicy::new(false, false));
        let table = estimator.engine();
        let state = estimator.state();
        let co2 = table.formation_energy("bigg.metabolite:co2", state).unwrap().mean;
        let glc = table.formation_energy("bigg.metabolite:glc__D", state).unwrap().mean;
        let rxn = reaction("glc__D = co2");
        let dg = estimator.physiological_dg_prime(&rxn).unwrap().value.unwrap();
        // 1 mbar over 1 bar cancels 1 mM over 1 M
        assert_relative_eq!(dg.mean_kj(), co2 - glc, epsilon = 1e-9);
        let dg = estimator.dg_prime(&rxn, None).unwrap().value.unwrap();
        // glucose at its default abundance, carbon dioxide at 1 bar
        assert_relative_eq!(
            dg.mean_kj(),
            co2 - glc - state.RT() * 0.005f64.ln(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_dg_prime_with_concentrations() {
        let estimator = estimator();
        let rt = estimator.state().RT();
        let rxn = reaction("atp + h2o = adp + pi");
        let concentrations = ConcentrationMap::resolve(vec![
            (
                Namespace::Bigg.identifier("atp"),
                MolarConcentration::new::<millimole_per_liter>(5.0),
            ),
            (
                Namespace::Bigg.identifier("adp"),
                MolarConcentration::new::<millimole_per_liter>(0.5),
            ),
            (
                Namespace::Bigg.identifier("pi"),
                MolarConcentration::new::<millimole_per_liter>(10.0),
            ),
        ])
        .unwrap();
        let dg = estimator
            .dg_prime(&rxn, Some(&concentrations))
            .unwrap()
            .value
            .unwrap();
        let q: f64 = 0.5e-3 * 10e-3 / 5e-3;
        assert_relative_eq!(dg.mean_kj(), ATP_HYDROLYSIS + rt * q.ln(), epsilon = 1e-9);

        // no map at all: the fixture defaults are 1 M, as in the standard condition
        let default = estimator.dg_prime(&rxn, None).unwrap().value.unwrap();
        let standard = estimator.standard_dg_prime(&rxn).unwrap().value.unwrap();
        assert_relative_eq!(default.mean_kj(), standard.mean_kj(), epsilon = 1e-12);
    }

    #[test]
    fn test_tiny_concentration_is_clamped() {
        let estimator = estimator();
        let rt = estimator.state().RT();
        let rxn = reaction("atp + h2o = adp + pi");
        let concentrations = ConcentrationMap::resolve(vec![(
            "bigg.metabolite:adp",
            MolarConcentration::new::<millimole_per_liter>(1e-9),
        )])
        .unwrap();
        let dg = estimator
            .dg_prime(&rxn, Some(&concentrations))
            .unwrap()
            .value
            .unwrap();
        assert_relative_eq!(dg.mean_kj(), ATP_HYDROLYSIS + rt * 1e-6f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_skip_unbalanced_gives_absent_value() {
        let rxn = reaction("atp + h2o = adp + pi + h");
        let estimator = estimator().with_policy(BalancePolicy::new(true, false));
        let dg = estimator.standard_dg_prime(&rxn).unwrap();
        assert!(dg.is_absent());
        assert!(dg.warning.is_none());
        let index = estimator.ln_reversibility_index(&rxn).unwrap();
        assert!(index.is_absent());
    }

    #[test]
    fn test_warn_unbalanced_gives_value_and_diagnostic() {
        let rxn = reaction("atp + h2o = adp + pi + h");
        let estimator = estimator().with_policy(BalancePolicy::new(false, true));
        let dg = estimator.standard_dg_prime(&rxn).unwrap();
        let warning = dg.warning.clone().unwrap();
        assert_eq!(warning.magnitude(), 1.0);
        let value = dg.value.unwrap();
        // the extra proton carries no transformed energy
        assert_relative_eq!(value.mean_kj(), ATP_HYDROLYSIS, epsilon = 1e-9);
    }

    #[test]
    fn test_proton_consuming_reaction_follows_ph() {
        let mut estimator = estimator();
        let rxn = reaction("pyr + nadh + h = lac__L + nad");
        let at_default = estimator.standard_dg_prime(&rxn).unwrap();
        assert!(at_default.warning.is_none());
        let at_default = at_default.value.unwrap();
        let rt_ln10 = estimator.state().RT() * LN_10;
        // one hydrogen more on the product side; z² and nH changes cancel in the ionic term
        assert_relative_eq!(
            at_default.mean_kj(),
            LACTATE_DEHYDROGENASE + rt_ln10 * 7.5,
            epsilon = 1e-9
        );
        assert_relative_eq!(at_default.stddev_kj(), 0.89f64.sqrt(), epsilon = 1e-12);

        estimator.set_pH(6.0);
        let acidic = estimator.standard_dg_prime(&rxn).unwrap().value.unwrap();
        estimator.set_pH(8.0);
        let basic = estimator.standard_dg_prime(&rxn).unwrap().value.unwrap();
        assert_relative_eq!(
            basic.mean_kj() - acidic.mean_kj(),
            2.0 * rt_ln10,
            epsilon = 1e-9
        );
        assert!(acidic.mean_kj() < basic.mean_kj());
    }

    #[test]
    fn test_protons_have_no_activity_term() {
        let estimator = estimator();
        let rxn = reaction("pyr + nadh + h = lac__L + nad");
        let standard = estimator.standard_dg_prime(&rxn).unwrap().value.unwrap();
        let physiological = estimator.physiological_dg_prime(&rxn).unwrap().value.unwrap();
        // two solutes on each side once the proton is left out
        assert_relative_eq!(physiological.mean_kj(), standard.mean_kj(), epsilon = 1e-9);
        let index = estimator.ln_reversibility_index(&rxn).unwrap().value.unwrap();
        let rt = estimator.state().RT();
        assert_relative_eq!(index.mean, 2.0 / 4.0 * physiological.mean_kj() / rt, epsilon = 1e-12);
    }

    #[test]
    fn test_default_policy_warns_and_returns() {
        let estimator = estimator();
        assert_eq!(estimator.policy(), BalancePolicy::default());
        let dg = estimator
            .physiological_dg_prime(&reaction("atp = adp"))
            .unwrap();
        assert!(dg.value.is_some());
        assert!(dg.warning.is_some());
    }

    #[test]
    fn test_unknown_identifier_is_fatal_under_any_policy() {
        for (skip, warn) in [(true, true), (false, false)] {
            let estimator = estimator().with_policy(BalancePolicy::new(skip, warn));
            assert!(matches!(
                estimator.standard_dg_prime(&reaction("atp = unknown")),
                Err(ThermoError::UnknownIdentifier(_))
            ));
        }
    }

    #[test]
    fn test_ln_reversibility_index() {
        let estimator = estimator();
        let rxn = reaction("atp + h2o = adp + pi");
        let dg = estimator.physiological_dg_prime(&rxn).unwrap().value.unwrap();
        let index = estimator.ln_reversibility_index(&rxn).unwrap().value.unwrap();
        let rt = estimator.state().RT();
        // atp, adp and pi count, water does not
        assert_relative_eq!(index.mean, 2.0 / 3.0 * dg.mean_kj() / rt, epsilon = 1e-12);
        assert_relative_eq!(index.stddev, 2.0 / 3.0 * dg.stddev_kj() / rt, epsilon = 1e-12);
        assert!(index.mean < 0.0);
    }

    #[test]
    fn test_ln_reversibility_index_without_variable_reactants() {
        let estimator = estimator();
        assert!(matches!(
            estimator.ln_reversibility_index(&reaction("h2o = h2o")),
            Err(ThermoError::Calculation(_))
        ));
    }

    #[test]
    fn test_state_forwarding() {
        let mut estimator = estimator();
        estimator.set_pH(7.0);
        estimator.set_pMg(2.5);
        estimator.set_temperature(ThermodynamicTemperature::new::<kelvin>(310.15));
        assert_eq!(estimator.get_pH(), 7.0);
        assert_eq!(estimator.get_pMg(), 2.5);
        assert_relative_eq!(estimator.get_temperature().get::<kelvin>(), 310.15, epsilon = 1e-9);
        estimator.reset_state();
        assert_eq!(*estimator.state(), ThermodynamicState::default());
        assert_relative_eq!(
            estimator.get_ionic_strength().get::<millimole_per_liter>(),
            250.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_standard_dg_formation() {
        let estimator = estimator();
        let ids = ["bigg.metabolite:atp", "bigg.metabolite:adp"];
        let (mean, cov) = estimator.standard_dg_formation(&ids).unwrap();
        let atp = estimator
            .engine()
            .formation_energy(ids[0], estimator.state())
            .unwrap();
        assert_relative_eq!(mean[0], atp.mean, epsilon = 1e-12);
        assert_relative_eq!(cov[(0, 0)], 1.16, epsilon = 1e-12);
        assert_relative_eq!(cov[(0, 1)], 1.08, epsilon = 1e-12);
        assert_relative_eq!(cov[(1, 0)], cov[(0, 1)], epsilon = 1e-12);
        assert!(estimator.standard_dg_formation(&["bigg.metabolite:none"]).is_err());
    }

    #[test]
    fn test_estimate_display() {
        let estimate = GibbsEnergyEstimate::from_kj_per_mol(-29.144, 0.3);
        assert_eq!(estimate.to_string(), "-29.14 ± 0.30 kJ/mol");
    }
}
