/// Parsing of reaction strings into structured stoichiometric terms.
///
/// # Examples
/// ```
/// use BioThermo::Reactions::reaction_parser::ReactionEquation;
/// let rxn = ReactionEquation::parse("adp + pi + 2 h = h2o + atp").unwrap();
/// let net = rxn.net_stoichiometry();
/// assert_eq!(net[2], ("h".to_string(), -2.0));
/// ```
pub mod reaction_parser;
/// Namespace prefixes (BiGG, KEGG, ChEBI, MetaNetX) inserted in front of identifiers
///
/// # Examples
/// ```
/// use BioThermo::Reactions::namespaces::{bigg, Namespace};
/// let rxn = bigg("atp + h2o = adp + 2*pi").unwrap();
/// assert_eq!(
///     rxn,
///     "bigg.metabolite:atp + bigg.metabolite:h2o = bigg.metabolite:adp + 2 bigg.metabolite:pi"
/// );
/// assert_eq!(Namespace::Kegg.identifier("C00002"), "kegg:C00002");
/// ```
pub mod namespaces;
