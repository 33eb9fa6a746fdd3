use crate::Reactions::namespaces::{Namespace, bigg, kegg};
use crate::Reactions::reaction_parser::ReactionEquation;
use crate::Thermodynamics::balance::BalancePolicy;
use crate::Thermodynamics::compound_table::CompoundTable;
use crate::Thermodynamics::concentrations::ConcentrationMap;
use crate::Thermodynamics::gibbs_estimator::GibbsEstimator;
use crate::Thermodynamics::multicompartment::MultiCompartmentSpec;
use crate::Thermodynamics::thermo_state::{StateOverride, ThermodynamicState};
use crate::Thermodynamics::uncertainty::RepresentationKind;
use crate::Utils::load_from_file::LoadData;
use uom::si::electric_potential::millivolt;
use uom::si::f64::{ElectricPotential, MolarConcentration, ThermodynamicTemperature};
use uom::si::molar_concentration::{micromole_per_liter, millimole_per_liter};
use uom::si::thermodynamic_temperature::degree_celsius;

const LIBRARY: &str = "data/compounds.json";

pub fn gibbs_examples(task: usize) {
    let table = CompoundTable::from_file(LIBRARY).unwrap();
    let mut estimator = GibbsEstimator::new(table, ThermodynamicState::default());
    println!("{}\n", estimator.state());
    match task {
        0 => {
            // ATP hydrolysis in all flavours
            let atp_hydrolysis = ReactionEquation::parse(&bigg("atp + h2o = adp + pi").unwrap()).unwrap();
            let standard = estimator.standard_dg_prime(&atp_hydrolysis).unwrap();
            println!("ΔG'°  = {}", standard.value.unwrap());
            let physiological = estimator.physiological_dg_prime(&atp_hydrolysis).unwrap();
            println!("ΔG'm  = {}", physiological.value.unwrap());
            let concentrations = ConcentrationMap::resolve(vec![
                (
                    Namespace::Bigg.identifier("atp"),
                    MolarConcentration::new::<millimole_per_liter>(5.0),
                ),
                (
                    Namespace::Bigg.identifier("adp"),
                    MolarConcentration::new::<micromole_per_liter>(500.0),
                ),
                (
                    Namespace::Bigg.identifier("pi"),
                    MolarConcentration::new::<millimole_per_liter>(10.0),
                ),
            ])
            .unwrap();
            let dg = estimator
                .dg_prime(&atp_hydrolysis, Some(&concentrations))
                .unwrap();
            println!("ΔG'   = {}", dg.value.unwrap());
            let index = estimator.ln_reversibility_index(&atp_hydrolysis).unwrap();
            println!("{}", index.value.unwrap());
        }
        1 => {
            // same reaction written with KEGG identifiers, at another state
            estimator.set_pH(7.0);
            estimator.set_temperature(ThermodynamicTemperature::new::<degree_celsius>(37.0));
            let hexokinase = ReactionEquation::parse(&kegg("C00031 + C00002 = C00092 + C00008").unwrap()).unwrap();
            let dg = estimator.standard_dg_prime(&hexokinase).unwrap();
            println!("hexokinase at 37 °C, pH 7: {}", dg.value.unwrap());
            estimator.reset_state();
            let (mean, cov) = estimator
                .standard_dg_formation(&["kegg:C00031", "kegg:C00092"])
                .unwrap();
            println!("ΔfG'° of glucose and glucose-6-phosphate: {}", mean);
            println!("covariance: {}", cov);
        }
        2 => {
            // unbalanced reaction under the three policies
            let unbalanced = ReactionEquation::parse(&bigg("atp + h2o = adp + pi + h").unwrap()).unwrap();
            for policy in [
                BalancePolicy::default(),
                BalancePolicy::new(false, false),
                BalancePolicy::new(true, true),
            ] {
                estimator.set_policy(policy);
                let dg = estimator.standard_dg_prime(&unbalanced).unwrap();
                println!(
                    "{:?}: value {:?}, warning {:?}",
                    policy,
                    dg.value.map(|v| v.to_string()),
                    dg.warning.map(|w| w.to_string())
                );
            }
        }
        3 => {
            // batch of glycolytic reactions with correlated uncertainty
            let texts = [
                "glc__D + atp = g6p + adp",
                "g6p = f6p",
                "atp + h2o = adp + pi",
                "pyr + nadh + h = lac__L + nad",
            ];
            let reactions: Vec<ReactionEquation> = texts
                .iter()
                .map(|t| ReactionEquation::parse(&bigg(t).unwrap()).unwrap())
                .collect();
            for kind in [RepresentationKind::Cov, RepresentationKind::FullRank] {
                let result = estimator
                    .standard_dg_prime_multi(&reactions, kind, false)
                    .unwrap();
                result.to_table().printstd();
                println!("{}: {}", kind, result.uncertainty.matrix());
            }
            let projected = estimator
                .standard_dg_prime_multi(&reactions, RepresentationKind::Sqrt, true)
                .unwrap();
            println!("minimum norm mean: {}", projected.mean);
        }
        4 => {
            // ATP synthase: three protons cross from the intermembrane space into the matrix
            let spec = MultiCompartmentSpec::new(
                ReactionEquation::parse_half_reaction(&bigg("adp + pi = h2o + atp + 3 h").unwrap())
                    .unwrap(),
                ReactionEquation::parse_half_reaction(&bigg("3 h = ").unwrap()).unwrap(),
                ElectricPotential::new::<millivolt>(150.0),
                StateOverride {
                    pH: Some(6.8),
                    ..StateOverride::default()
                },
            );
            let dg = estimator.multicompartmental_standard_dg_prime(&spec).unwrap();
            println!("ATP synthase: {}", dg);
        }
        5 => {
            // reactions listed in a task file
            let loader = LoadData::new("data/task.txt".to_string());
            let texts = loader.load_reactions().unwrap();
            for text in texts {
                let reaction = ReactionEquation::parse(&bigg(&text).unwrap()).unwrap();
                let dg = estimator.physiological_dg_prime(&reaction).unwrap();
                match dg.value {
                    Some(value) => println!("{:<40} {}", text, value),
                    None => println!("{:<40} skipped", text),
                }
            }
        }
        _ => {
            println!("no example with number {}", task);
        }
    }
}
