//! # Reaction String Parser
//!
//! ## Aim
//! Turns a human-readable equation such as `"atp + h2o = adp + 2 pi"` into a
//! [`ReactionEquation`]: two ordered lists of (coefficient, identifier) terms.
//!
//! ## Grammar
//! ```text
//! <equation> := <side> "=" <side>
//! <side>     := <term> ("+" <term>)*
//! <term>     := [<coefficient> ("*" | whitespace)] <identifier>
//! ```
//! A leading number is a coefficient only when it is followed by whitespace or `*`.
//! `13pgm` is the identifier `13pgm`, while `13 pgm` and `13*pgm` are 13 × `pgm`.
//!
//! ## Usage
//! ```
//! use BioThermo::Reactions::reaction_parser::ReactionEquation;
//! let rxn = ReactionEquation::parse("atp + h2o = adp + 2*pi").unwrap();
//! assert_eq!(rxn.right[1].coefficient, 2.0);
//! assert_eq!(rxn.right[1].identifier, "pi");
//! assert_eq!(rxn.to_string(), "atp + h2o = adp + 2 pi");
//! ```
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// separator between the two sides of an equation
pub const SIDE_SEPARATOR: char = '=';
/// separator between terms of one side
pub const TERM_SEPARATOR: char = '+';

// number glued to the rest of the term by "*" or by whitespace
static COEFFICIENT_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)(?:\s*\*\s*|\s+)(.*)$").expect("valid coefficient regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("reaction '{0}' has no '=' separator")]
    MissingSeparator(String),
    #[error("reaction '{0}' has more than one '=' separator")]
    MultipleSeparators(String),
    #[error("reaction '{reaction}' has an empty {side} side")]
    EmptySide { reaction: String, side: Side },
    #[error("empty term in '{0}'")]
    EmptyTerm(String),
    #[error("malformed term '{0}': identifier must not contain whitespace")]
    MalformedTerm(String),
    #[error("invalid stoichiometric coefficient '{0}'")]
    InvalidCoefficient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// one `<coefficient> <identifier>` entry of a reaction side
#[derive(Debug, Clone, PartialEq)]
pub struct StoichTerm {
    pub coefficient: f64,
    pub identifier: String,
}

impl StoichTerm {
    pub fn new(coefficient: f64, identifier: &str) -> Self {
        Self {
            coefficient,
            identifier: identifier.to_string(),
        }
    }
}

impl fmt::Display for StoichTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient == 1.0 {
            write!(f, "{}", self.identifier)
        } else {
            write!(f, "{} {}", self.coefficient, self.identifier)
        }
    }
}

/// Parses one term. Returns the coefficient (1 when omitted) and the identifier.
pub fn parse_term(term: &str) -> Result<StoichTerm, ParseError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(ParseError::EmptyTerm(term.to_string()));
    }
    let (coefficient, identifier) = match COEFFICIENT_TERM.captures(term) {
        Some(cap) => {
            let number = &cap[1];
            let coefficient: f64 = number
                .parse()
                .map_err(|_| ParseError::InvalidCoefficient(number.to_string()))?;
            if !(coefficient.is_finite() && coefficient > 0.0) {
                return Err(ParseError::InvalidCoefficient(number.to_string()));
            }
            (coefficient, cap.get(2).map_or("", |m| m.as_str()).trim())
        }
        None => (1.0, term),
    };
    if identifier.is_empty() {
        return Err(ParseError::EmptyTerm(term.to_string()));
    }
    if identifier.chars().any(char::is_whitespace) {
        return Err(ParseError::MalformedTerm(term.to_string()));
    }
    Ok(StoichTerm::new(coefficient, identifier))
}

/// Splits a side on `+` and parses every term. A blank side yields an empty vector.
pub fn parse_side(side: &str) -> Result<Vec<StoichTerm>, ParseError> {
    if side.trim().is_empty() {
        return Ok(Vec::new());
    }
    side.split(TERM_SEPARATOR).map(parse_term).collect()
}

fn split_sides(text: &str) -> Result<(&str, &str), ParseError> {
    let mut parts = text.split(SIDE_SEPARATOR);
    let left = parts.next().unwrap_or_default();
    let right = parts
        .next()
        .ok_or_else(|| ParseError::MissingSeparator(text.to_string()))?;
    if parts.next().is_some() {
        return Err(ParseError::MultipleSeparators(text.to_string()));
    }
    Ok((left, right))
}

/// Structured form of a reaction string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReactionEquation {
    pub left: Vec<StoichTerm>,
    pub right: Vec<StoichTerm>,
}

impl ReactionEquation {
    /// Parses a full reaction; both sides must contain at least one term.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let rxn = Self::parse_half_reaction(text)?;
        if rxn.left.is_empty() {
            return Err(ParseError::EmptySide {
                reaction: text.to_string(),
                side: Side::Left,
            });
        }
        if rxn.right.is_empty() {
            return Err(ParseError::EmptySide {
                reaction: text.to_string(),
                side: Side::Right,
            });
        }
        Ok(rxn)
    }

    /// Like [`ReactionEquation::parse`] but tolerates an empty side, e.g. `" = 2 h"`.
    /// Half reactions of a membrane transport step are written this way.
    pub fn parse_half_reaction(text: &str) -> Result<Self, ParseError> {
        let (left, right) = split_sides(text)?;
        Ok(Self {
            left: parse_side(left)?,
            right: parse_side(right)?,
        })
    }

    /// Net stoichiometry: products positive, substrates negative, repeated identifiers
    /// merged, in order of first appearance.
    pub fn net_stoichiometry(&self) -> Vec<(String, f64)> {
        let mut net: Vec<(String, f64)> = Vec::new();
        let signed = self
            .left
            .iter()
            .map(|t| (t, -1.0))
            .chain(self.right.iter().map(|t| (t, 1.0)));
        for (term, sign) in signed {
            match net.iter_mut().find(|(id, _)| *id == term.identifier) {
                Some((_, nu)) => *nu += sign * term.coefficient,
                None => net.push((term.identifier.clone(), sign * term.coefficient)),
            }
        }
        net
    }

    /// Distinct identifiers in order of first appearance.
    pub fn compounds(&self) -> Vec<String> {
        self.net_stoichiometry()
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Concatenates two reactions side by side. Shared species are not merged here;
    /// [`ReactionEquation::net_stoichiometry`] cancels them.
    pub fn combine(&self, other: &ReactionEquation) -> ReactionEquation {
        let mut combined = self.clone();
        combined.left.extend(other.left.iter().cloned());
        combined.right.extend(other.right.iter().cloned());
        combined
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

fn join_side(terms: &[StoichTerm]) -> String {
    terms
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" + ")
}

impl fmt::Display for ReactionEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{} = {}", join_side(&self.left), join_side(&self.right));
        write!(f, "{}", text.trim())
    }
}

impl std::str::FromStr for ReactionEquation {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionEquation::parse(s)
    }
}
