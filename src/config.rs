//! Settings of a cross and the inputs of one computation.

use crate::error::Result;
use crate::gametes::{Linkage, RecombinationRate};
use crate::phenotype::DominanceMode;
use crate::plants::two_locus::{validate_genotype, TwoLocusGenotype};
use serde::Serialize;

/// Dominance per gene and transmission mode.
///
/// # Examples
///
/// ```rust
/// use punnett_rs::config::CrossConfig;
/// use punnett_rs::phenotype::DominanceMode;
///
/// let config = CrossConfig::default().with_dominance_b(DominanceMode::Codominance);
/// assert_eq!(config.dominance_a, DominanceMode::Complete);
/// assert!(!config.linkage.is_linked());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CrossConfig {
    pub dominance_a: DominanceMode,
    pub dominance_b: DominanceMode,
    pub linkage: Linkage,
}

impl CrossConfig {
    pub fn with_dominance_a(self, dominance_a: DominanceMode) -> Self {
        Self {
            dominance_a,
            ..self
        }
    }

    pub fn with_dominance_b(self, dominance_b: DominanceMode) -> Self {
        Self {
            dominance_b,
            ..self
        }
    }

    pub fn with_linkage(self, linkage: Linkage) -> Self {
        Self { linkage, ..self }
    }

    /// Linked transmission with the given rate, or independent when `rate` is `None`.
    pub fn with_recombination(self, rate: Option<RecombinationRate>) -> Self {
        self.with_linkage(rate.map_or(Linkage::Independent, Linkage::Linked))
    }
}

/// Raw parent genotypes plus settings, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossInputs {
    pub parent1: String,
    pub parent2: String,
    pub config: CrossConfig,
}

impl CrossInputs {
    pub fn new(parent1: impl Into<String>, parent2: impl Into<String>, config: CrossConfig) -> Self {
        Self {
            parent1: parent1.into(),
            parent2: parent2.into(),
            config,
        }
    }

    /// Validates both genotypes. Either one failing rejects the whole request.
    pub fn parents(&self) -> Result<(TwoLocusGenotype, TwoLocusGenotype)> {
        Ok((
            validate_genotype(&self.parent1)?,
            validate_genotype(&self.parent2)?,
        ))
    }
}

impl Default for CrossInputs {
    fn default() -> Self {
        Self::new("AaBb", "AaBb", CrossConfig::default())
    }
}
