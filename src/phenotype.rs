//! Phenotype resolution for a single locus.

use crate::abstract_plants::Allele;
use crate::error::{CrossError, Result};
use crate::plants::two_locus::Locus;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// How the two alleles of one gene are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DominanceMode {
    /// The uppercase allele masks the lowercase one
    #[default]
    Complete,
    /// Both alleles of a heterozygote are expressed
    Codominance,
}

impl fmt::Display for DominanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DominanceMode::Complete => write!(f, "complete"),
            DominanceMode::Codominance => write!(f, "codominance"),
        }
    }
}

impl FromStr for DominanceMode {
    type Err = CrossError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "complete" | "dominance" | "dominance complète" | "dominance complete" => {
                Ok(DominanceMode::Complete)
            }
            "codominance" | "co" => Ok(DominanceMode::Codominance),
            _ => Err(CrossError::InvalidDominance {
                input: s.to_owned(),
            }),
        }
    }
}

/// The expressed phenotype at one locus: a single allele, or `X/Y` for a codominant
/// heterozygote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhenotypeLabel {
    Single(Locus, Allele),
    Both(Locus),
}

impl fmt::Display for PhenotypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhenotypeLabel::Single(locus, allele) => write!(f, "{}", locus.letter(*allele)),
            PhenotypeLabel::Both(locus) => write!(
                f,
                "{}/{}",
                locus.letter(Allele::Upper),
                locus.letter(Allele::Lower)
            ),
        }
    }
}

impl Serialize for PhenotypeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolves the phenotype of `pair` at `locus`. The pair may come in any order.
pub fn resolve(locus: Locus, pair: [Allele; 2], mode: DominanceMode) -> PhenotypeLabel {
    let mut pair = pair;
    pair.sort();
    let [first, second] = pair;
    match mode {
        DominanceMode::Complete => PhenotypeLabel::Single(locus, first),
        DominanceMode::Codominance if first == second => PhenotypeLabel::Single(locus, first),
        DominanceMode::Codominance => PhenotypeLabel::Both(locus),
    }
}

/// Phenotypes at loci A and B, displayed as `[A,B]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhenotypePair(pub PhenotypeLabel, pub PhenotypeLabel);

impl fmt::Display for PhenotypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.0, self.1)
    }
}

impl Serialize for PhenotypePair {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
