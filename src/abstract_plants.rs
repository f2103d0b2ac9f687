use serde::Serialize;

pub trait Genotype<B: Gamete<Self>>: Sized + std::fmt::Debug {
    /// The genotype of the zygote formed by fusing `gx` and `gy`.
    fn from_gametes(gx: &B, gy: &B) -> Self;
}

pub trait Gamete<A: Genotype<Self>>: Sized + std::fmt::Debug {}

/// A way of drawing one gamete out of a genotype.
///
/// `Data` parameterises the set of crosspoints; each crosspoint carries its own weight so that
/// the generator can accumulate a probability distribution over gametes.
pub trait Crosspoint<A: Genotype<B>, B: Gamete<A>, Data>: std::fmt::Debug {
    fn cross(&self, x: &A) -> B;

    fn crosspoints(data: &Data) -> Box<dyn std::iter::Iterator<Item = Self>>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Chrom {
    Upper,
    Lower,
}

/// Alleles are told apart by the case of their letter.
///
/// The derived ordering puts `Upper` first, matching `'A' < 'a'` in ASCII so that sorting a pair
/// always leaves the conventionally dominant allele in front.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum Allele {
    Upper,
    Lower,
}

impl From<bool> for Allele {
    fn from(value: bool) -> Self {
        match value {
            true => Allele::Upper,
            false => Allele::Lower,
        }
    }
}

impl From<Allele> for bool {
    fn from(value: Allele) -> Self {
        match value {
            Allele::Upper => true,
            Allele::Lower => false,
        }
    }
}

pub trait Haploid {
    fn alleles(&self) -> Vec<Allele>;
}

pub trait Diploid<B: Haploid> {
    fn upper(&self) -> B;

    fn lower(&self) -> B;
}
