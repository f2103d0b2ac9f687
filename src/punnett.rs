//! Construction of the cross table from two gamete distributions.

use crate::abstract_plants::Genotype;
use crate::config::CrossConfig;
use crate::error::Result;
use crate::fraction::Fraction;
use crate::gametes::{format_gamete, GameteDistribution, Linkage};
use crate::phenotype::{resolve, PhenotypePair};
use crate::plants::two_locus::{Locus, TwoLocusGamete, TwoLocusGenotype};
use serde::Serialize;
use tracing::{debug, trace};

/// Shape in which a matrix is laid out for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Parent 1 on the rows, parent 2 on the columns
    Square,
    /// One gamete against four: a single row holding the four-gamete parent
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parent {
    First,
    Second,
}

/// One offspring class of the cross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossCell {
    pub genotype: String,
    pub fraction: Fraction,
    pub phenotype: PhenotypePair,
}

/// The only offspring class when each parent makes a single gamete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleOutcome {
    pub genotype: String,
    pub phenotype: PhenotypePair,
    pub probability: Fraction,
}

impl std::fmt::Display for SingleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.genotype,
            self.phenotype,
            self.probability.percent()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossMatrix {
    pub layout: Layout,
    /// Parent whose gametes index the rows
    pub row_parent: Parent,
    pub rows: Vec<(TwoLocusGamete, Fraction)>,
    pub columns: Vec<(TwoLocusGamete, Fraction)>,
    pub cells: Vec<Vec<CrossCell>>,
}

impl CrossMatrix {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CrossCell> {
        self.cells.get(row)?.get(col)
    }

    pub fn cells(&self) -> impl Iterator<Item = &CrossCell> {
        self.cells.iter().flatten()
    }

    pub fn total(&self) -> Result<Fraction> {
        Fraction::try_sum(self.cells().map(|c| c.fraction))
    }

    pub fn row_labels(&self) -> Vec<String> {
        axis_labels(&self.rows)
    }

    pub fn column_labels(&self) -> Vec<String> {
        axis_labels(&self.columns)
    }

    /// Distinct phenotypes with their summed probability, in the order they first appear.
    pub fn phenotype_ratio(&self) -> Result<Vec<(PhenotypePair, Fraction)>> {
        let mut ratio: Vec<(PhenotypePair, Fraction)> = Vec::new();
        for c in self.cells() {
            match ratio.iter_mut().find(|(p, _)| *p == c.phenotype) {
                Some((_, f)) => *f = f.try_add(c.fraction)?,
                None => ratio.push((c.phenotype, c.fraction)),
            }
        }
        Ok(ratio)
    }
}

fn axis_labels(axis: &[(TwoLocusGamete, Fraction)]) -> Vec<String> {
    axis.iter()
        .map(|(g, p)| format_gamete(&g.to_string(), *p))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum CrossOutcome {
    Single(SingleOutcome),
    Matrix(CrossMatrix),
}

fn phenotype_of(z: &TwoLocusGenotype, config: &CrossConfig) -> PhenotypePair {
    PhenotypePair(
        resolve(Locus::A, z.pair(Locus::A), config.dominance_a),
        resolve(Locus::B, z.pair(Locus::B), config.dominance_b),
    )
}

/// The offspring of fusing `gx` and `gy`.
///
/// Independent loci are labelled per locus (`A//a B//b`); linked loci keep both haplotypes whole
/// and order them as strings (`AB//ab`). Phenotypes are always resolved locus by locus.
pub fn cross_cell(
    (gx, px): (TwoLocusGamete, Fraction),
    (gy, py): (TwoLocusGamete, Fraction),
    config: &CrossConfig,
) -> Result<CrossCell> {
    let z = TwoLocusGenotype::from_gametes(&gx, &gy);
    let genotype = match config.linkage {
        Linkage::Independent => z.locus_label(),
        Linkage::Linked(_) => format!("{}//{}", gx.min(gy), gx.max(gy)),
    };
    let cell = CrossCell {
        genotype,
        fraction: px.try_mul(py)?,
        phenotype: phenotype_of(&z, config),
    };
    trace!(row = %gx, col = %gy, genotype = %cell.genotype, fraction = %cell.fraction, "cell");
    Ok(cell)
}

/// General cross matrix over every pair of gametes, applying the orientation rule.
pub fn build_matrix(
    dist1: &GameteDistribution,
    dist2: &GameteDistribution,
    config: &CrossConfig,
) -> Result<CrossMatrix> {
    let horizontal = (dist1.len() == 1 && dist2.len() == 4) || (dist2.len() == 1 && dist1.len() == 4);
    let (layout, row_parent, outer, inner) = if horizontal && dist2.len() == 1 {
        (Layout::Horizontal, Parent::Second, dist2, dist1)
    } else if horizontal {
        (Layout::Horizontal, Parent::First, dist1, dist2)
    } else {
        (Layout::Square, Parent::First, dist1, dist2)
    };
    let rows: Vec<_> = outer.iter().copied().collect();
    let columns: Vec<_> = inner.iter().copied().collect();
    let cells = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| cross_cell(*r, *c, config))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CrossMatrix {
        layout,
        row_parent,
        rows,
        columns,
        cells,
    })
}

/// Crosses two parents given their gamete distributions.
///
/// When each parent makes exactly one gamete the result collapses to a single outcome, always
/// labelled per locus; otherwise the full matrix is built.
pub fn build(
    dist1: &GameteDistribution,
    dist2: &GameteDistribution,
    config: &CrossConfig,
) -> Result<CrossOutcome> {
    if let (Some(g1), Some(g2), 1, 1) = (
        dist1.gametes().next(),
        dist2.gametes().next(),
        dist1.len(),
        dist2.len(),
    ) {
        let z = TwoLocusGenotype::from_gametes(&g1, &g2);
        let outcome = SingleOutcome {
            genotype: z.locus_label(),
            phenotype: phenotype_of(&z, config),
            probability: Fraction::one(),
        };
        debug!(outcome = %outcome, "single offspring class");
        return Ok(CrossOutcome::Single(outcome));
    }
    let matrix = build_matrix(dist1, dist2, config)?;
    debug!(shape = ?matrix.shape(), layout = ?matrix.layout, "built cross matrix");
    Ok(CrossOutcome::Matrix(matrix))
}
