/// Generators for genotypes, rates and settings
pub mod instance_generators;
/// Plain-text report
pub mod text;
/// SVG export of the cross table
pub mod visualisation;
