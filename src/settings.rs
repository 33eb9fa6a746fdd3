//! # Settings Module
//!
//! ## Purpose
//! Keeps the defaults of a BioThermo session in one JSON file: the thermodynamic state new
//! estimators start from, the balance policy, the compound library to load and the log level.
//!
//! ## Key Features
//! - **Fallback to defaults**: a missing or unreadable config file gives the default
//!   configuration (pH 7.5, pMg 3, 0.25 M, 298.15 K, warn but do not skip unbalanced reactions)
//! - **File Validation**: the compound library path is only changed to an existing file
//! - **Persistence**: every setter writes the file back
//! - **Projections**: `thermodynamic_state()`, `balance_policy()` and `estimator()` turn the
//!   stored values into the objects the estimators use
//!
//! ## Configuration Format
//! ```json
//! {
//!   "pH": 7.5,
//!   "pMg": 3.0,
//!   "ionic_strength_molar": 0.25,
//!   "temperature_kelvin": 298.15,
//!   "balance": { "skip_unbalanced": false, "balance_warn": true },
//!   "compound_library": "data/compounds.json",
//!   "log_level": "info"
//! }
//! ```
//!
//! ## Usage Pattern
//! ```rust, no_run
//! use BioThermo::settings::Settings;
//!
//! let mut settings = Settings::new();
//! settings.set_compound_library("data/compounds.json").unwrap();
//! let estimator = settings.estimator().unwrap();
//! println!("{}", estimator.state());
//! ```
use crate::Thermodynamics::balance::BalancePolicy;
use crate::Thermodynamics::compound_table::CompoundTable;
use crate::Thermodynamics::errors::ThermoError;
use crate::Thermodynamics::gibbs_estimator::GibbsEstimator;
use crate::Thermodynamics::thermo_state::{
    DEFAULT_IONIC_STRENGTH_M, DEFAULT_PH, DEFAULT_PMG, DEFAULT_TEMPERATURE_K, ThermodynamicState,
};
use crate::Utils::logger::level_from_name;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fs;
use std::path::Path;
use uom::si::f64::{MolarConcentration, ThermodynamicTemperature};
use uom::si::molar_concentration::mole_per_liter;
use uom::si::thermodynamic_temperature::kelvin;

/// default location of the settings file
pub const CONFIG_FILE: &str = "biothermo_config.json";
/// compound library shipped with the crate
pub const DEFAULT_COMPOUND_LIBRARY: &str = "data/compounds.json";

/// Serializable defaults of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct EstimatorConfig {
    pub pH: f64,
    pub pMg: f64,
    pub ionic_strength_molar: f64,
    pub temperature_kelvin: f64,
    #[serde(default)]
    pub balance: BalancePolicy,
    pub compound_library: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            pH: DEFAULT_PH,
            pMg: DEFAULT_PMG,
            ionic_strength_molar: DEFAULT_IONIC_STRENGTH_M,
            temperature_kelvin: DEFAULT_TEMPERATURE_K,
            balance: BalancePolicy::default(),
            compound_library: DEFAULT_COMPOUND_LIBRARY.to_string(),
            log_level: default_log_level(),
        }
    }
}

/// Settings bound to a config file.
///
/// # Fields
/// * `config` - current values
/// * `config_file` - where `save_config` writes them
#[derive(Debug, Clone)]
pub struct Settings {
    config: EstimatorConfig,
    config_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Reads [`CONFIG_FILE`] from the working directory, or starts from defaults.
    pub fn new() -> Self {
        Self::with_config_file(CONFIG_FILE)
    }

    /// Same as [`Settings::new`] with a custom file location.
    pub fn with_config_file(config_file: &str) -> Self {
        Self::try_with_config_file(config_file).unwrap_or_else(|e| {
            warn!("{}; using default settings", e);
            Self {
                config: EstimatorConfig::default(),
                config_file: config_file.to_string(),
            }
        })
    }

    /// Like [`Settings::new`] but hands back the error of an unreadable file, for callers
    /// that have no logger installed yet.
    pub fn try_new() -> Result<Self, ThermoError> {
        Self::try_with_config_file(CONFIG_FILE)
    }

    pub fn try_with_config_file(config_file: &str) -> Result<Self, ThermoError> {
        Ok(Self {
            config: Self::load_config(config_file)?,
            config_file: config_file.to_string(),
        })
    }

    /// A missing file is not an error; an unreadable one is.
    fn load_config(config_file: &str) -> Result<EstimatorConfig, ThermoError> {
        if !Path::new(config_file).exists() {
            return Ok(EstimatorConfig::default());
        }
        let content = fs::read_to_string(config_file)?;
        let config: EstimatorConfig = serde_json::from_str(&content).map_err(|e| {
            ThermoError::DataLoad(format!("invalid settings file '{}': {}", config_file, e))
        })?;
        info!("settings loaded from '{}'", config_file);
        Ok(config)
    }

    /// Writes the current values to the config file.
    pub fn save_config(&self) -> Result<(), ThermoError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn compound_library_path(&self) -> &str {
        &self.config.compound_library
    }

    /// Switches to another compound library. The file must exist.
    ///
    /// # Returns
    /// * `Ok(())` - path changed and saved
    /// * `Err(ThermoError::DataLoad)` - the file does not exist
    pub fn set_compound_library(&mut self, path: &str) -> Result<(), ThermoError> {
        if !Path::new(path).exists() {
            return Err(ThermoError::DataLoad(format!(
                "File does not exist: {}",
                path
            )));
        }
        self.config.compound_library = path.to_string();
        self.save_config()
    }

    /// Stores the state new estimators start from.
    pub fn set_thermodynamic_state(&mut self, state: &ThermodynamicState) -> Result<(), ThermoError> {
        self.config.pH = state.pH();
        self.config.pMg = state.pMg();
        self.config.ionic_strength_molar = state.ionic_strength_molar();
        self.config.temperature_kelvin = state.temperature_kelvin();
        self.save_config()
    }

    pub fn set_balance_policy(&mut self, policy: BalancePolicy) -> Result<(), ThermoError> {
        self.config.balance = policy;
        self.save_config()
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), ThermoError> {
        self.config.log_level = level.to_string();
        self.save_config()
    }

    /// Restores every default and saves them.
    pub fn reset_to_defaults(&mut self) -> Result<(), ThermoError> {
        self.config = EstimatorConfig::default();
        self.save_config()
    }

    pub fn thermodynamic_state(&self) -> ThermodynamicState {
        ThermodynamicState::new(
            self.config.pH,
            self.config.pMg,
            MolarConcentration::new::<mole_per_liter>(self.config.ionic_strength_molar),
            ThermodynamicTemperature::new::<kelvin>(self.config.temperature_kelvin),
        )
    }

    pub fn balance_policy(&self) -> BalancePolicy {
        self.config.balance
    }

    pub fn log_level(&self) -> LevelFilter {
        level_from_name(&self.config.log_level)
    }

    /// Loads the compound library and builds an estimator with the stored state and policy.
    /// This reads the whole library, so it is the slow call of a session.
    pub fn estimator(&self) -> Result<GibbsEstimator<CompoundTable>, ThermoError> {
        let table = CompoundTable::from_file(&self.config.compound_library)?;
        Ok(GibbsEstimator::new(table, self.thermodynamic_state()).with_policy(self.balance_policy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings::try_with_config_file(path.to_str().unwrap()).unwrap();
        assert_eq!(*settings.config(), EstimatorConfig::default());
        assert_eq!(settings.thermodynamic_state(), ThermodynamicState::default());
        assert_eq!(settings.balance_policy(), BalancePolicy::default());
        assert_eq!(settings.log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let settings = Settings::with_config_file(file.path().to_str().unwrap());
        assert_eq!(*settings.config(), EstimatorConfig::default());
        assert!(matches!(
            Settings::try_with_config_file(file.path().to_str().unwrap()),
            Err(ThermoError::DataLoad(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path = path.to_str().unwrap();
        let mut settings = Settings::with_config_file(path);
        let mut state = ThermodynamicState::default();
        state.set_pH(7.0);
        state.set_ionic_strength(MolarConcentration::new::<mole_per_liter>(0.1));
        settings.set_thermodynamic_state(&state).unwrap();
        settings
            .set_balance_policy(BalancePolicy::new(true, false))
            .unwrap();
        settings.set_log_level("debug").unwrap();

        let reloaded = Settings::with_config_file(path);
        assert_eq!(reloaded.config().pH, 7.0);
        assert_relative_eq!(reloaded.config().ionic_strength_molar, 0.1, epsilon = 1e-12);
        assert_eq!(reloaded.balance_policy(), BalancePolicy::new(true, false));
        assert_eq!(reloaded.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_partial_file_uses_serde_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"pH": 6.0, "pMg": 3.0, "ionic_strength_molar": 0.25,
                 "temperature_kelvin": 310.15, "compound_library": "x.json"}"#,
        )
        .unwrap();
        let settings = Settings::with_config_file(file.path().to_str().unwrap());
        assert_eq!(settings.config().pH, 6.0);
        assert_eq!(settings.balance_policy(), BalancePolicy::default());
        assert_eq!(settings.config().log_level, "info");
        assert_eq!(settings.compound_library_path(), "x.json");
    }

    #[test]
    fn test_set_compound_library_requires_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::with_config_file(path.to_str().unwrap());
        assert!(matches!(
            settings.set_compound_library("no/such/library.json"),
            Err(ThermoError::DataLoad(_))
        ));
        assert_eq!(settings.compound_library_path(), DEFAULT_COMPOUND_LIBRARY);

        let mut library = NamedTempFile::new().unwrap();
        library
            .write_all(
                br#"{"compounds": [{"id": "kegg:C00001", "formula": "H2O",
                     "formation_energy": -237.19, "phase": "Liquid"}]}"#,
            )
            .unwrap();
        let library_path = library.path().to_str().unwrap();
        settings.set_compound_library(library_path).unwrap();
        assert_eq!(settings.compound_library_path(), library_path);
        let estimator = settings.estimator().unwrap();
        assert_eq!(estimator.engine().len(), 1);

        settings.reset_to_defaults().unwrap();
        assert_eq!(settings.compound_library_path(), DEFAULT_COMPOUND_LIBRARY);
    }
}
