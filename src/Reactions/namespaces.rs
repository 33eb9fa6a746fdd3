//! Namespace prefixes for compound identifiers.
//!
//! Every identifier in a reaction string is looked up in the reference data by a
//! namespace-qualified key, e.g. `bigg.metabolite:atp` or `kegg:C00002`. The helpers
//! here insert one fixed prefix in front of every identifier of an equation while
//! leaving the stoichiometric coefficients alone. Normalizing an already prefixed
//! string prefixes it again, so do it exactly once.
use crate::Reactions::reaction_parser::{ParseError, SIDE_SEPARATOR, StoichTerm, parse_side};
use std::fmt;

pub const BIGG_PREFIX: &str = "bigg.metabolite:";
pub const KEGG_PREFIX: &str = "kegg:";
pub const CHEBI_PREFIX: &str = "CHEBI:";
pub const METANETX_PREFIX: &str = "metanetx.chemical:";

/// Identifier vocabularies understood by the reference data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Bigg,
    Kegg,
    Chebi,
    MetaNetX,
}

impl Namespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            Namespace::Bigg => BIGG_PREFIX,
            Namespace::Kegg => KEGG_PREFIX,
            Namespace::Chebi => CHEBI_PREFIX,
            Namespace::MetaNetX => METANETX_PREFIX,
        }
    }

    /// Prefixes one bare identifier, e.g. `"atp"` -> `"bigg.metabolite:atp"`.
    /// Used to build concentration keys.
    pub fn identifier(&self, bare: &str) -> String {
        format!("{}{}", self.prefix(), bare.trim())
    }

    /// Removes this namespace's prefix, if present.
    pub fn strip<'a>(&self, qualified: &'a str) -> Option<&'a str> {
        qualified.strip_prefix(self.prefix())
    }

    /// Rewrites a reaction string (or a single side / single identifier) with every
    /// identifier prefixed. Output format: `"<coef> <identifier>"` joined by `" + "`,
    /// sides joined by `" = "`, coefficient omitted when it equals 1.
    pub fn normalize(&self, text: &str) -> Result<String, ParseError> {
        if !text.contains(SIDE_SEPARATOR) {
            return self.normalize_side(text);
        }
        let mut sides = text.split(SIDE_SEPARATOR);
        let left = sides.next().unwrap_or_default();
        let right = sides.next().unwrap_or_default();
        if sides.next().is_some() {
            return Err(ParseError::MultipleSeparators(text.to_string()));
        }
        let normalized = format!(
            "{} = {}",
            self.normalize_side(left)?,
            self.normalize_side(right)?
        );
        Ok(normalized.trim().to_string())
    }

    fn normalize_side(&self, side: &str) -> Result<String, ParseError> {
        let terms = parse_side(side)?
            .into_iter()
            .map(|term| StoichTerm {
                identifier: self.identifier(&term.identifier),
                ..term
            })
            .map(|term| term.to_string())
            .collect::<Vec<_>>();
        Ok(terms.join(" + "))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// `bigg("atp + h2o = adp + pi")` ->
/// `"bigg.metabolite:atp + bigg.metabolite:h2o = bigg.metabolite:adp + bigg.metabolite:pi"`
pub fn bigg(text: &str) -> Result<String, ParseError> {
    Namespace::Bigg.normalize(text)
}

pub fn kegg(text: &str) -> Result<String, ParseError> {
    Namespace::Kegg.normalize(text)
}

pub fn chebi(text: &str) -> Result<String, ParseError> {
    Namespace::Chebi.normalize(text)
}

pub fn metanetx(text: &str) -> Result<String, ParseError> {
    Namespace::MetaNetX.normalize(text)
}

/// Normalizes a whole batch with one namespace
pub fn normalize_all<S: AsRef<str>>(
    namespace: Namespace,
    reactions: &[S],
) -> Result<Vec<String>, ParseError> {
    reactions
        .iter()
        .map(|r| namespace.normalize(r.as_ref()))
        .collect()
}
