//! # Joint uncertainty of a batch of reactions
//!
//! ## Aim
//! ΔG'⁰ of n reactions at once, with their correlated uncertainty in one of four
//! equivalent representations.
//!
//! ## Main logic
//! 1. every reaction is balance-checked; under `skip_unbalanced` the unbalanced ones are
//!    dropped and the `kept` mask of the result tells which input rows survived;
//! 2. with the stoichiometric matrix S (n×m) of the kept reactions over the compounds they
//!    use, the formation energies μ (m) and uncertainty matrix U (m×k) of those compounds:
//!    `mean = S·μ`, `sqrt = S·U` (n×k) so that `cov = sqrt·sqrtᵗ`;
//! 3. the requested representation is derived from `sqrt`:
//!    - `Cov`: sqrt·sqrtᵗ;
//!    - `Precision`: cov⁻¹, `SingularCovariance` when cov has not full rank;
//!    - `Sqrt`: as is;
//!    - `FullRank`: n×r factor U_r·Σ_r from the SVD of sqrt, r its numerical rank;
//! 4. with `minimize_norm` the mean and the matrix are projected onto the range of sqrt.
//!    Directions outside of it carry no uncertainty, and the projected mean is the
//!    minimum norm vector with the same covariance.
use crate::Reactions::reaction_parser::ReactionEquation;
use crate::Thermodynamics::balance::check_balance;
use crate::Thermodynamics::errors::{Imbalance, ThermoError};
use crate::Thermodynamics::gibbs_estimator::GibbsEstimator;
use crate::Thermodynamics::reference_engine::ReferenceEngine;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use prettytable::{Table, row};
use std::fmt;

/// singular values below RANK_RTOL·σmax count as zero
pub const RANK_RTOL: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationKind {
    Cov,
    Precision,
    Sqrt,
    FullRank,
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepresentationKind::Cov => "cov",
            RepresentationKind::Precision => "precision",
            RepresentationKind::Sqrt => "sqrt",
            RepresentationKind::FullRank => "fullrank",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UncertaintyRepresentation {
    /// n×n covariance
    Cov(DMatrix<f64>),
    /// n×n inverse covariance
    Precision(DMatrix<f64>),
    /// n×k factor, one column per uncertainty source
    Sqrt(DMatrix<f64>),
    /// n×r factor, r the rank of the covariance
    FullRank(DMatrix<f64>),
}

impl UncertaintyRepresentation {
    pub fn kind(&self) -> RepresentationKind {
        match self {
            UncertaintyRepresentation::Cov(_) => RepresentationKind::Cov,
            UncertaintyRepresentation::Precision(_) => RepresentationKind::Precision,
            UncertaintyRepresentation::Sqrt(_) => RepresentationKind::Sqrt,
            UncertaintyRepresentation::FullRank(_) => RepresentationKind::FullRank,
        }
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        match self {
            UncertaintyRepresentation::Cov(m)
            | UncertaintyRepresentation::Precision(m)
            | UncertaintyRepresentation::Sqrt(m)
            | UncertaintyRepresentation::FullRank(m) => m,
        }
    }

    /// Covariance implied by any representation
    pub fn covariance(&self) -> Result<DMatrix<f64>, ThermoError> {
        match self {
            UncertaintyRepresentation::Cov(m) => Ok(m.clone()),
            UncertaintyRepresentation::Precision(m) => precision(m),
            UncertaintyRepresentation::Sqrt(m) | UncertaintyRepresentation::FullRank(m) => {
                Ok(covariance(m))
            }
        }
    }

    fn project(self, projector: &DMatrix<f64>) -> Self {
        match self {
            UncertaintyRepresentation::Cov(m) => {
                UncertaintyRepresentation::Cov(projector * m * projector.transpose())
            }
            UncertaintyRepresentation::Precision(m) => {
                UncertaintyRepresentation::Precision(projector * m * projector.transpose())
            }
            UncertaintyRepresentation::Sqrt(m) => UncertaintyRepresentation::Sqrt(projector * m),
            UncertaintyRepresentation::FullRank(m) => {
                UncertaintyRepresentation::FullRank(projector * m)
            }
        }
    }
}

pub fn covariance(sqrt: &DMatrix<f64>) -> DMatrix<f64> {
    sqrt * sqrt.transpose()
}

/// Left singular vectors of `matrix` whose singular values are numerically nonzero,
/// each paired with its singular value. Singular values are not assumed to be sorted.
fn range_basis(matrix: &DMatrix<f64>) -> Result<(DMatrix<f64>, Vec<f64>), ThermoError> {
    let n = matrix.nrows();
    if n == 0 || matrix.ncols() == 0 {
        return Ok((DMatrix::zeros(n, 0), Vec::new()));
    }
    let svd = matrix.clone().svd(true, false);
    let Some(u) = svd.u else {
        return Err(ThermoError::Calculation(
            "singular value decomposition did not return left singular vectors".to_string(),
        ));
    };
    let sigma_max = svd.singular_values.max();
    let tolerance = RANK_RTOL * sigma_max;
    let selected: Vec<usize> = (0..svd.singular_values.len())
        .filter(|&j| sigma_max > 0.0 && svd.singular_values[j] > tolerance)
        .collect();
    let basis = DMatrix::from_fn(n, selected.len(), |i, c| u[(i, selected[c])]);
    let values = selected.iter().map(|&j| svd.singular_values[j]).collect();
    Ok((basis, values))
}

/// numerical rank of `matrix`
pub fn numerical_rank(matrix: &DMatrix<f64>) -> Result<usize, ThermoError> {
    Ok(range_basis(matrix)?.1.len())
}

/// Inverse of a covariance matrix; fails with `SingularCovariance` below full rank.
pub fn precision(cov: &DMatrix<f64>) -> Result<DMatrix<f64>, ThermoError> {
    let size = cov.nrows();
    if size == 0 {
        return Ok(DMatrix::zeros(0, 0));
    }
    let rank = numerical_rank(cov)?;
    if rank < size {
        return Err(ThermoError::SingularCovariance { size, rank });
    }
    cov.clone()
        .try_inverse()
        .ok_or(ThermoError::SingularCovariance { size, rank })
}

/// n×r factor with the same covariance as `sqrt`, r = rank(sqrt) ≤ k
pub fn full_rank(sqrt: &DMatrix<f64>) -> Result<DMatrix<f64>, ThermoError> {
    let (mut basis, values) = range_basis(sqrt)?;
    for (c, sigma) in values.iter().enumerate() {
        basis.column_mut(c).scale_mut(*sigma);
    }
    Ok(basis)
}

/// Orthogonal projector (n×n) onto the column space of `sqrt`
pub fn range_projector(sqrt: &DMatrix<f64>) -> Result<DMatrix<f64>, ThermoError> {
    let (basis, _) = range_basis(sqrt)?;
    Ok(&basis * basis.transpose())
}

/// Stoichiometric matrix: one row per reaction, one column per compound, products positive
pub fn stoichiometric_matrix(reactions: &[&ReactionEquation], compounds: &[String]) -> DMatrix<f64> {
    let mut matrix = DMatrix::zeros(reactions.len(), compounds.len());
    for (i, reaction) in reactions.iter().enumerate() {
        for (identifier, nu) in reaction.net_stoichiometry() {
            if let Some(j) = compounds.iter().position(|c| *c == identifier) {
                matrix[(i, j)] += nu;
            }
        }
    }
    matrix
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiReactionResult {
    /// ΔG'⁰ of the kept reactions, kJ/mol
    pub mean: DVector<f64>,
    /// standard deviation of every kept reaction, kJ/mol
    pub stddev: DVector<f64>,
    pub uncertainty: UncertaintyRepresentation,
    /// one entry per input reaction; rows of `mean` follow the `true` entries
    pub kept: Vec<bool>,
    pub warnings: Vec<Imbalance>,
    labels: Vec<String>,
}

impl MultiReactionResult {
    /// input positions of the result rows
    pub fn kept_indices(&self) -> Vec<usize> {
        self.kept
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| if k { Some(i) } else { None })
            .collect()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["#", "Reaction", "ΔG'° [kJ/mol]", "σ [kJ/mol]"]);
        let mut row_index = 0;
        for (i, label) in self.labels.iter().enumerate() {
            if self.kept[i] {
                table.add_row(row![
                    i,
                    label,
                    format!("{:.2}", self.mean[row_index]),
                    format!("{:.2}", self.stddev[row_index])
                ]);
                row_index += 1;
            } else {
                table.add_row(row![i, label, "skipped", "-"]);
            }
        }
        table
    }
}

impl<E: ReferenceEngine> GibbsEstimator<E> {
    /// ΔG'⁰ of a batch of reactions with their joint uncertainty
    pub fn standard_dg_prime_multi(
        &self,
        reactions: &[ReactionEquation],
        representation: RepresentationKind,
        minimize_norm: bool,
    ) -> Result<MultiReactionResult, ThermoError> {
        let mut kept = Vec::with_capacity(reactions.len());
        let mut warnings = Vec::new();
        for reaction in reactions {
            let verdict = self.policy.apply(check_balance(&self.engine, reaction)?);
            if !verdict.proceed {
                info!("'{}' is not balanced and is left out of the batch", reaction);
            }
            kept.push(verdict.proceed);
            warnings.extend(verdict.warning);
        }
        let batch: Vec<&ReactionEquation> = reactions
            .iter()
            .zip(&kept)
            .filter_map(|(r, &k)| if k { Some(r) } else { None })
            .collect();

        // protons carry no transformed energy, they get no column
        let mut compounds: Vec<String> = Vec::new();
        for reaction in &batch {
            for identifier in reaction.compounds() {
                if compounds.contains(&identifier)
                    || self.engine.composition(&identifier)?.is_proton()
                {
                    continue;
                }
                compounds.push(identifier);
            }
        }
        let (formation, formation_sqrt) = self.formation_terms(&compounds, &self.state)?;
        let stoichiometry = stoichiometric_matrix(&batch, &compounds);
        let mut mean = &stoichiometry * formation;
        let sqrt = &stoichiometry * formation_sqrt;
        debug!(
            "batch of {} reactions over {} compounds, sqrt is {}x{}",
            batch.len(),
            compounds.len(),
            sqrt.nrows(),
            sqrt.ncols()
        );
        let stddev = DVector::from_iterator(sqrt.nrows(), sqrt.row_iter().map(|r| r.norm()));

        let mut uncertainty = match representation {
            RepresentationKind::Cov => UncertaintyRepresentation::Cov(covariance(&sqrt)),
            RepresentationKind::Precision => {
                UncertaintyRepresentation::Precision(precision(&covariance(&sqrt))?)
            }
            RepresentationKind::Sqrt => UncertaintyRepresentation::Sqrt(sqrt.clone()),
            RepresentationKind::FullRank => UncertaintyRepresentation::FullRank(full_rank(&sqrt)?),
        };
        if minimize_norm {
            let projector = range_projector(&sqrt)?;
            mean = &projector * mean;
            uncertainty = uncertainty.project(&projector);
        }
        Ok(MultiReactionResult {
            mean,
            stddev,
            uncertainty,
            kept,
            warnings,
            labels: reactions.iter().map(|r| r.to_string()).collect(),
        })
    }
}
