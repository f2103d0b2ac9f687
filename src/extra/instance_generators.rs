use crate::abstract_plants::Allele;
use crate::config::CrossConfig;
use crate::fraction::Fraction;
use crate::gametes::{Linkage, RecombinationRate};
use crate::phenotype::DominanceMode;
use crate::plants::two_locus::TwoLocusGenotype;
use itertools::iproduct;
use rand::prelude::*;

const ALLELES: [Allele; 2] = [Allele::Upper, Allele::Lower];

/// Every valid genotype string, in the order `AABB, AABb, AAbB, ..., aabb`.
pub fn all_genotypes() -> impl Iterator<Item = TwoLocusGenotype> {
    iproduct!(ALLELES, ALLELES, ALLELES, ALLELES)
        .map(|(a1, a2, b1, b2)| TwoLocusGenotype::new(a1, a2, b1, b2))
}

pub fn random_genotype<R>(rng: &mut R) -> TwoLocusGenotype
where
    R: Rng + ?Sized,
{
    let mut allele = || Allele::from(rng.gen::<bool>());
    TwoLocusGenotype::new(allele(), allele(), allele(), allele())
}

/// A rate on a 0.01 grid, `0..=0.5`.
pub fn random_rate<R>(rng: &mut R) -> RecombinationRate
where
    R: Rng + ?Sized,
{
    let hundredths = rng.gen_range(0..=50);
    Fraction::new(hundredths, 100)
        .and_then(|r| RecombinationRate::new(r).ok())
        .unwrap_or_default()
}

pub fn random_config<R>(rng: &mut R) -> CrossConfig
where
    R: Rng + ?Sized,
{
    let mode = |codominant: bool| match codominant {
        true => DominanceMode::Codominance,
        false => DominanceMode::Complete,
    };
    let linkage = if rng.gen() {
        Linkage::Linked(random_rate(rng))
    } else {
        Linkage::Independent
    };
    CrossConfig::default()
        .with_dominance_a(mode(rng.gen()))
        .with_dominance_b(mode(rng.gen()))
        .with_linkage(linkage)
}
