//! The `compute` entry point: validated inputs in, parent summaries and cross outcome out.

use crate::config::{CrossConfig, CrossInputs};
use crate::error::Result;
use crate::gametes::{generate, GameteDistribution, Linkage};
use crate::phenotype::{resolve, PhenotypePair};
use crate::plants::two_locus::{Locus, TwoLocusGenotype};
use crate::punnett::{build, CrossOutcome};
use serde::Serialize;
use tracing::{info, instrument};

/// What is shown about one parent before the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentSummary {
    pub genotype: TwoLocusGenotype,
    /// `A//a B//b` for independent loci, `Aa//Bb` for linked ones
    pub label: String,
    pub phenotype: PhenotypePair,
    pub gametes: GameteDistribution,
}

impl ParentSummary {
    pub fn new(genotype: TwoLocusGenotype, config: &CrossConfig) -> Result<Self> {
        let label = match config.linkage {
            Linkage::Independent => genotype.locus_label(),
            Linkage::Linked(_) => genotype.linked_label(),
        };
        let phenotype = PhenotypePair(
            resolve(Locus::A, genotype.sorted_pair(Locus::A), config.dominance_a),
            resolve(Locus::B, genotype.sorted_pair(Locus::B), config.dominance_b),
        );
        Ok(Self {
            genotype,
            label,
            phenotype,
            gametes: generate(&genotype, &config.linkage)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossReport {
    pub config: CrossConfig,
    pub parent1: ParentSummary,
    pub parent2: ParentSummary,
    pub outcome: CrossOutcome,
}

impl CrossReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs one cross. Nothing is computed unless both genotypes are valid.
#[instrument(skip(inputs), fields(p1 = %inputs.parent1, p2 = %inputs.parent2))]
pub fn compute(inputs: &CrossInputs) -> Result<CrossReport> {
    let (x, y) = inputs.parents()?;
    let config = inputs.config;
    let parent1 = ParentSummary::new(x, &config)?;
    let parent2 = ParentSummary::new(y, &config)?;
    let outcome = build(&parent1.gametes, &parent2.gametes, &config)?;
    info!(
        single = matches!(outcome, CrossOutcome::Single(_)),
        "cross computed"
    );
    Ok(CrossReport {
        config,
        parent1,
        parent2,
        outcome,
    })
}

#[cfg(feature = "python")]
mod python {
    use super::*;
    use crate::extra::text;
    use crate::gametes::RecombinationRate;
    use crate::phenotype::DominanceMode;
    use pyo3::exceptions::PyValueError;
    use pyo3::PyResult;

    pub type PyCrossTable = PyResult<(Vec<String>, Vec<String>, Vec<Vec<(String, String, String)>>, bool)>;

    fn inputs(
        p1: String,
        p2: String,
        dom_a: &str,
        dom_b: &str,
        recombination_rate: Option<f64>,
    ) -> crate::error::Result<CrossInputs> {
        let rate = recombination_rate.map(RecombinationRate::from_f64).transpose()?;
        let config = CrossConfig::default()
            .with_dominance_a(dom_a.parse::<DominanceMode>()?)
            .with_dominance_b(dom_b.parse::<DominanceMode>()?)
            .with_recombination(rate);
        Ok(CrossInputs::new(p1, p2, config))
    }

    /// Computes a cross and returns the text report. Linked loci are selected by passing a
    /// recombination rate.
    #[pyo3::pyfunction]
    #[pyo3(name = "compute_cross")]
    #[pyo3(signature = (p1, p2, dom_a="complete", dom_b="complete", recombination_rate=None))]
    pub fn compute_cross_python(
        p1: String,
        p2: String,
        dom_a: &str,
        dom_b: &str,
        recombination_rate: Option<f64>,
    ) -> PyResult<String> {
        inputs(p1, p2, dom_a, dom_b, recombination_rate)
            .and_then(|i| compute(&i))
            .map(|report| text::render(&report))
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Returns `(row_labels, column_labels, cells, horizontal)` where each cell is
    /// `(genotype, fraction, phenotype)`. A single outcome comes back as a 1x1 table.
    #[pyo3::pyfunction]
    #[pyo3(name = "cross_table")]
    #[pyo3(signature = (p1, p2, dom_a="complete", dom_b="complete", recombination_rate=None))]
    pub fn cross_table_python(
        p1: String,
        p2: String,
        dom_a: &str,
        dom_b: &str,
        recombination_rate: Option<f64>,
    ) -> PyCrossTable {
        let report = inputs(p1, p2, dom_a, dom_b, recombination_rate)
            .and_then(|i| compute(&i))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        match report.outcome {
            CrossOutcome::Single(s) => Ok((
                report.parent1.gametes.formatted(),
                report.parent2.gametes.formatted(),
                vec![vec![(
                    s.genotype,
                    s.probability.to_string(),
                    s.phenotype.to_string(),
                )]],
                false,
            )),
            CrossOutcome::Matrix(m) => Ok((
                m.row_labels(),
                m.column_labels(),
                m.cells
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|c| {
                                (
                                    c.genotype.clone(),
                                    c.fraction.to_string(),
                                    c.phenotype.to_string(),
                                )
                            })
                            .collect()
                    })
                    .collect(),
                m.layout == crate::punnett::Layout::Horizontal,
            )),
        }
    }
}

#[cfg(feature = "python")]
pub use python::{compute_cross_python, cross_table_python};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrossError;
    use crate::extra::instance_generators::{random_config, random_genotype};
    use crate::gametes::RecombinationRate;
    use crate::phenotype::DominanceMode;
    use rand::prelude::*;

    #[test]
    fn parent_summaries() {
        let report = compute(&CrossInputs::default()).unwrap();
        assert_eq!(report.parent1.label, "A//a B//b");
        assert_eq!(report.parent1.phenotype.to_string(), "[A,B]");
        assert_eq!(
            report.parent2.gametes.formatted(),
            vec!["0.25 AB", "0.25 Ab", "0.25 aB", "0.25 ab"]
        );
    }

    #[test]
    fn linked_parent_label_keeps_input_order() {
        let r: RecombinationRate = "0.1".parse().unwrap();
        let config = CrossConfig::default()
            .with_dominance_a(DominanceMode::Codominance)
            .with_recombination(Some(r));
        let report = compute(&CrossInputs::new("aABb", "aabb", config)).unwrap();
        assert_eq!(report.parent1.label, "aA//Bb");
        assert_eq!(report.parent1.phenotype.to_string(), "[A/a,B]");
        assert_eq!(report.parent2.label, "aa//bb");
    }

    #[test]
    fn rejects_invalid_parent_before_computing() {
        let err = compute(&CrossInputs::new("AaBb", "AaB", CrossConfig::default())).unwrap_err();
        assert!(matches!(err, CrossError::InvalidGenotypeFormat { input } if input == "AaB"));
    }

    #[test]
    fn homozygous_cross_is_single() {
        let report = compute(&CrossInputs::new("AABB", "aabb", CrossConfig::default())).unwrap();
        match &report.outcome {
            CrossOutcome::Single(s) => assert_eq!(s.to_string(), "A//a B//b [A,B] 100%"),
            other => panic!("expected a single outcome, got {:?}", other),
        }
    }

    #[test]
    fn json_export() {
        let report = compute(&CrossInputs::new("AABB", "aabb", CrossConfig::default())).unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["outcome"]["kind"], "single");
        assert_eq!(json["outcome"]["genotype"], "A//a B//b");
        assert_eq!(json["outcome"]["probability"], "1");
        assert_eq!(json["parent1"]["gametes"]["AB"], "1");
        assert_eq!(json["config"]["linkage"]["mode"], "independent");
    }

    #[test]
    fn random_crosses_round_trip_through_strings() {
        let mut rng = thread_rng();
        for _ in 0..200 {
            let (x, y) = (random_genotype(&mut rng), random_genotype(&mut rng));
            let config = random_config(&mut rng);
            let report = compute(&CrossInputs::new(x.to_string(), y.to_string(), config)).unwrap();
            assert_eq!(report.parent1.genotype, x);
            assert_eq!(report.parent2.genotype, y);
            assert!(report.parent1.gametes.total().unwrap().is_one());
            let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
            let linked = json["config"]["linkage"]["mode"] == "linked";
            assert_eq!(linked, config.linkage.is_linked());
        }
    }

    #[test]
    fn too_fine_rate_never_reaches_the_table() {
        let err = "0.1234567891".parse::<RecombinationRate>().unwrap_err();
        assert!(matches!(err, CrossError::InvalidRecombinationRate { .. }));
        let r: RecombinationRate = "0.123456789".parse().unwrap();
        let config = CrossConfig::default().with_recombination(Some(r));
        let report = compute(&CrossInputs::new("AaBb", "AaBb", config)).unwrap();
        match report.outcome {
            CrossOutcome::Matrix(m) => {
                assert!(m.total().unwrap().is_one());
                assert!(m.cells().all(|c| !c.fraction.is_zero()));
            }
            other => panic!("expected a matrix, got {:?}", other),
        }
    }
}
