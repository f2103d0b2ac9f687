//! Two-locus genetic cross (Punnett square) library.
//!
//! Components of a cross are separated by module.
//! Typical use is as follows:
//! ```
//! use punnett_rs::config::{CrossConfig, CrossInputs};
//! use punnett_rs::punnett::CrossOutcome;
//! use punnett_rs::report::compute;
//!
//! let inputs = CrossInputs::new("AaBb", "AaBb", CrossConfig::default());
//! let report = compute(&inputs).unwrap();
//!
//! match report.outcome {
//!     CrossOutcome::Matrix(m) => assert_eq!(m.shape(), (4, 4)),
//!     CrossOutcome::Single(_) => unreachable!(),
//! }
//! ```
//#![deny(missing_docs)]

/// Exports the traits shared by genotypes, gametes and crosspoints
pub mod abstract_plants;
/// Exports the settings of a cross
pub mod config;
/// Exports the crate error type
pub mod error;
/// Exports the renderers and instance generators
pub mod extra;
/// Exports exact fractions used for every probability
pub mod fraction;
/// Exports gamete generation under independent or linked transmission
pub mod gametes;
/// Exports dominance modes and phenotype resolution
pub mod phenotype;
/// Exports the two-locus genotype and gamete types
pub mod plants;
/// Exports the cross table builder
pub mod punnett;
/// Exports the `compute` entry point and the report it returns
pub mod report;

pub use error::{CrossError, Result};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "punnett_rs")]
fn punnett_rs_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(report::compute_cross_python, m)?)?;
    m.add_function(wrap_pyfunction!(report::cross_table_python, m)?)?;
    Ok(())
}
