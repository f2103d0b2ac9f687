//! Plain-text rendering of a cross report: parents, gametes, then offspring or the cross table.

use itertools::Itertools;

use crate::fraction::Fraction;
use crate::gametes::{format_gamete, GameteDistribution};
use crate::plants::two_locus::TwoLocusGamete;
use crate::punnett::{CrossMatrix, CrossOutcome};
use crate::report::CrossReport;

pub const CORNER: &str = "↓ γ♂   ↑ γ♀ →";

/// Underlines every character with a combining low line, `AB` -> `A̲B̲`.
pub fn underline(text: &str) -> String {
    text.chars().flat_map(|c| [c, '\u{0332}']).collect()
}

fn gametes_line(dist: &GameteDistribution, underlined: bool) -> String {
    dist.iter()
        .map(|(g, p)| {
            let label = g.to_string();
            if underlined {
                format_gamete(&underline(&label), *p)
            } else {
                format_gamete(&label, *p)
            }
        })
        .join(", ")
}

/// Phenotype, genotype and gamete lines describing the two parents.
pub fn summary_lines(report: &CrossReport, underlined: bool) -> Vec<String> {
    let (p1, p2) = (&report.parent1, &report.parent2);
    vec![
        format!("Phenotype: {} × {}", p1.phenotype, p2.phenotype),
        format!("Genotype: {} × {}", p1.label, p2.label),
        format!(
            "Gametes: {}   x   {}",
            gametes_line(&p1.gametes, underlined),
            gametes_line(&p2.gametes, underlined)
        ),
    ]
}

fn axis_labels(axis: &[(TwoLocusGamete, Fraction)]) -> Vec<String> {
    axis.iter()
        .map(|(g, p)| format_gamete(&underline(&g.to_string()), *p))
        .collect()
}

/// Pipe table with the gametes of each parent along the axes.
pub fn render_table(m: &CrossMatrix) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "| {} |\n",
        std::iter::once(CORNER.to_owned())
            .chain(axis_labels(&m.columns))
            .join(" | ")
    ));
    out.push_str(&format!("|{}\n", "---|".repeat(m.columns.len() + 1)));
    for (label, row) in axis_labels(&m.rows).into_iter().zip(&m.cells) {
        let cells = row
            .iter()
            .map(|c| format!("{} ({}) {}", c.genotype, c.fraction, c.phenotype));
        out.push_str(&format!(
            "| {} |\n",
            std::iter::once(label).chain(cells).join(" | ")
        ));
    }
    out
}

/// Full report as markdown-flavoured text.
pub fn render(report: &CrossReport) -> String {
    let mut lines = summary_lines(report, true);
    let gametes = lines.pop().unwrap_or_default();
    let mut out = String::from("# Chromosomal interpretation of the cross\n\n## Parents\n");
    for line in lines {
        out.push_str(&format!("    {}\n", line));
    }
    out.push_str(&format!("\n## {}\n", gametes));
    match &report.outcome {
        CrossOutcome::Single(s) => out.push_str(&format!("\n## Offspring: {}\n", s)),
        CrossOutcome::Matrix(m) => {
            out.push_str("\n## Cross table\n\n");
            out.push_str(&render_table(m));
        }
    }
    out
}
