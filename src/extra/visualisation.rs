use std::io;
use svg::node::element::{Element, Group, Rectangle};
use svg::node::{Node, Text as TextNode};
use svg::Document;

use crate::abstract_plants::*;
use crate::extra::text::{summary_lines, CORNER};
use crate::error::Result;
use crate::punnett::{CrossMatrix, CrossOutcome, SingleOutcome};
use crate::report::CrossReport;

pub const BLOCKSIZE: usize = 10;
pub const CELL_WIDTH: usize = 170;
pub const CELL_HEIGHT: usize = 44;
const LINE_HEIGHT: usize = 16;
/// Three summary lines and a blank one.
const SUMMARY_HEIGHT: usize = 4 * LINE_HEIGHT;

fn allele_colour(allele: Allele) -> String {
    match allele {
        Allele::Upper => "yellow".to_owned(),
        Allele::Lower => "blue".to_owned(),
    }
}

pub fn draw_gam_base<B>(x: &B, offset: (i32, i32)) -> Group
where
    B: Haploid,
{
    let g = Group::new();
    x.alleles()
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Rectangle::new()
                .set("width", BLOCKSIZE as i32)
                .set("height", BLOCKSIZE as i32)
                .set("x", (i * BLOCKSIZE) as i32 + offset.0)
                .set("y", offset.1)
                .set("stroke", "black")
                .set("fill", allele_colour(*a))
        })
        .fold(g, |d, square| d.add(square))
}

fn text(x: usize, y: usize, content: &str) -> Element {
    let mut t = Element::new("text");
    t.assign("x", x as i32);
    t.assign("y", y as i32);
    t.assign("font-family", "monospace");
    t.assign("font-size", 12);
    t.append(TextNode::new(content));
    t
}

fn frame(x: usize, y: usize) -> Rectangle {
    Rectangle::new()
        .set("x", x as i32)
        .set("y", y as i32)
        .set("width", CELL_WIDTH as i32)
        .set("height", CELL_HEIGHT as i32)
        .set("stroke", "black")
        .set("fill", "none")
}

/// A framed cell holding up to two lines of text.
fn boxed(x: usize, y: usize, lines: &[&str]) -> Group {
    lines
        .iter()
        .enumerate()
        .fold(Group::new().add(frame(x, y)), |g, (i, line)| {
            g.add(text(x + 6, y + LINE_HEIGHT * (i + 1), line))
        })
}

pub trait Draw {
    /// Returns (width, height) of the viewBox needed to contain self.
    fn view_box_size(&self) -> Option<(usize, usize)>;

    fn draw(&self) -> Group;

    fn to_document(&self) -> Document {
        match self.view_box_size() {
            None => Document::new().add(self.draw()),
            Some((w, h)) => Document::new()
                .set("viewBox", (0, 0, w as i32, h as i32))
                .add(self.draw()),
        }
    }

    fn draw_to_file(&self, s: &str) -> io::Result<()> {
        svg::save(s, &self.to_document())
    }
}

impl Draw for SingleOutcome {
    fn view_box_size(&self) -> Option<(usize, usize)> {
        Some((CELL_WIDTH * 2 + 1, CELL_HEIGHT + 1))
    }

    fn draw(&self) -> Group {
        Group::new().add(text(6, LINE_HEIGHT, &self.to_string()))
    }
}

impl Draw for CrossMatrix {
    fn view_box_size(&self) -> Option<(usize, usize)> {
        let (rows, cols) = self.shape();
        Some(((cols + 1) * CELL_WIDTH + 1, (rows + 1) * CELL_HEIGHT + 1))
    }

    /// Header row and column show the formatted gametes with their allele blocks; every other
    /// cell shows the genotype on one line and `(fraction) [phenotype]` on the next.
    fn draw(&self) -> Group {
        let mut g = Group::new().add(boxed(0, 0, &[CORNER]));
        for (j, ((gamete, _), label)) in self.columns.iter().zip(self.column_labels()).enumerate() {
            let x = (j + 1) * CELL_WIDTH;
            g = g.add(boxed(x, 0, &[&label])).add(draw_gam_base(
                gamete,
                ((x + 6) as i32, (LINE_HEIGHT + 8) as i32),
            ));
        }
        for (i, ((gamete, _), label)) in self.rows.iter().zip(self.row_labels()).enumerate() {
            let y = (i + 1) * CELL_HEIGHT;
            g = g
                .add(boxed(0, y, &[&label]))
                .add(draw_gam_base(gamete, (6, (y + LINE_HEIGHT + 8) as i32)));
            for (j, cell) in self.cells[i].iter().enumerate() {
                let detail = format!("({}) {}", cell.fraction, cell.phenotype);
                g = g.add(boxed((j + 1) * CELL_WIDTH, y, &[&cell.genotype, &detail]));
            }
        }
        g
    }
}

impl CrossReport {
    fn body(&self) -> (Group, (usize, usize)) {
        match &self.outcome {
            CrossOutcome::Single(s) => (s.draw(), s.view_box_size().unwrap_or((0, 0))),
            CrossOutcome::Matrix(m) => (m.draw(), m.view_box_size().unwrap_or((0, 0))),
        }
    }
}

/// Summary lines above the table followed by the table or the single outcome.
impl Draw for CrossReport {
    fn view_box_size(&self) -> Option<(usize, usize)> {
        let (_, (w, h)) = self.body();
        Some((w.max(CELL_WIDTH * 3), SUMMARY_HEIGHT + h))
    }

    fn draw(&self) -> Group {
        let g = summary_lines(self, false)
            .iter()
            .enumerate()
            .fold(Group::new(), |g, (i, line)| {
                g.add(text(6, LINE_HEIGHT * (i + 1), line))
            });
        let (body, _) = self.body();
        g.add(body.set(
            "transform",
            format!("translate(0,{})", SUMMARY_HEIGHT),
        ))
    }
}

/// Writes the report as an SVG document at `path`.
pub fn save_report(report: &CrossReport, path: &str) -> Result<()> {
    report.draw_to_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrossConfig, CrossInputs};
    use crate::report::compute;

    #[test]
    fn matrix_document_contains_every_cell() {
        let report = compute(&CrossInputs::default()).unwrap();
        let doc = report.to_document().to_string();
        assert!(doc.contains("viewBox"));
        assert!(doc.contains(CORNER));
        assert_eq!(doc.matches("A//a B//b").count(), 4 + 2);
        assert!(doc.contains("(1/16) [a,b]"));
    }

    #[test]
    fn single_outcome_document() {
        let report = compute(&CrossInputs::new("AABB", "aabb", CrossConfig::default())).unwrap();
        let doc = report.to_document().to_string();
        assert!(doc.contains("A//a B//b [A,B] 100%"));
    }

    #[test]
    fn gamete_blocks() {
        let g: crate::plants::two_locus::TwoLocusGamete = "Ab".parse().unwrap();
        let doc = Document::new().add(draw_gam_base(&g, (0, 0))).to_string();
        assert_eq!(doc.matches("<rect").count(), 2);
        assert!(doc.contains("yellow") && doc.contains("blue"));
    }

    #[test]
    fn saves_to_file() {
        let report = compute(&CrossInputs::default()).unwrap();
        let path = std::env::temp_dir().join("punnett_rs_dihybrid.svg");
        let path = path.to_string_lossy().into_owned();
        save_report(&report, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("(1/16) [a,b]"));
        let _ = std::fs::remove_file(&path);
    }
}
