use crate::abstract_plants::*;
use crate::error::{CrossError, Result};
use crate::gametes::Linkage;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The two genes of the model, each with a fixed two-letter alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Locus {
    A,
    B,
}

impl Locus {
    pub const ALL: [Locus; 2] = [Locus::A, Locus::B];

    pub fn letter(&self, allele: Allele) -> char {
        match (self, allele) {
            (Locus::A, Allele::Upper) => 'A',
            (Locus::A, Allele::Lower) => 'a',
            (Locus::B, Allele::Upper) => 'B',
            (Locus::B, Allele::Lower) => 'b',
        }
    }

    /// Reads a character from this locus' alphabet, rejecting everything else.
    pub fn allele(&self, c: char) -> Option<Allele> {
        match (self, c) {
            (Locus::A, 'A') | (Locus::B, 'B') => Some(Allele::Upper),
            (Locus::A, 'a') | (Locus::B, 'b') => Some(Allele::Lower),
            _ => None,
        }
    }

    fn offset(&self) -> usize {
        match self {
            Locus::A => 0,
            Locus::B => 2,
        }
    }
}

/// A haploid product: one allele at each locus.
///
/// The derived ordering agrees with comparing the two-character labels as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TwoLocusGamete {
    alleles: [Allele; 2],
}

impl TwoLocusGamete {
    pub fn new(a: Allele, b: Allele) -> Self {
        Self { alleles: [a, b] }
    }

    pub fn allele(&self, locus: Locus) -> Allele {
        match locus {
            Locus::A => self.alleles[0],
            Locus::B => self.alleles[1],
        }
    }
}

impl fmt::Display for TwoLocusGamete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for locus in Locus::ALL {
            write!(f, "{}", locus.letter(self.allele(locus)))?;
        }
        Ok(())
    }
}

impl Serialize for TwoLocusGamete {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for TwoLocusGamete {
    type Err = CrossError;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        match chars.as_slice() {
            [a, b] => match (Locus::A.allele(*a), Locus::B.allele(*b)) {
                (Some(a), Some(b)) => Ok(Self::new(a, b)),
                _ => Err(CrossError::parse(format!("`{}` is not a gamete", s))),
            },
            _ => Err(CrossError::parse(format!("`{}` is not a gamete", s))),
        }
    }
}

impl Haploid for TwoLocusGamete {
    fn alleles(&self) -> Vec<Allele> {
        self.alleles.to_vec()
    }
}

impl Gamete<TwoLocusGenotype> for TwoLocusGamete {}

/// A validated diploid genotype over loci A and B.
///
/// Stored in input order: `[A1, A2, B1, B2]`. The upper strand is `(A1, B1)` and the lower strand
/// is `(A2, B2)`, which is how linked loci are paired up into parental haplotypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TwoLocusGenotype {
    alleles: [Allele; 4],
}

impl TwoLocusGenotype {
    pub fn new(a1: Allele, a2: Allele, b1: Allele, b2: Allele) -> Self {
        Self {
            alleles: [a1, a2, b1, b2],
        }
    }

    /// The two alleles at `locus` in input order.
    pub fn pair(&self, locus: Locus) -> [Allele; 2] {
        let i = locus.offset();
        [self.alleles[i], self.alleles[i + 1]]
    }

    /// The two alleles at `locus`, uppercase first.
    pub fn sorted_pair(&self, locus: Locus) -> [Allele; 2] {
        let mut pair = self.pair(locus);
        pair.sort();
        pair
    }

    pub fn is_homozygous(&self, locus: Locus) -> bool {
        let [x, y] = self.pair(locus);
        x == y
    }

    /// Number of loci carrying two different alleles.
    pub fn heterozygous_loci(&self) -> usize {
        Locus::ALL.iter().filter(|l| !self.is_homozygous(**l)).count()
    }

    /// Per-locus label with each pair sorted, e.g. `A//a B//b`.
    pub fn locus_label(&self) -> String {
        Locus::ALL
            .iter()
            .map(|locus| {
                let [x, y] = self.sorted_pair(*locus);
                format!("{}//{}", locus.letter(x), locus.letter(y))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Linked display of a parent: the first two characters, `//`, the last two, e.g. `Aa//Bb`.
    pub fn linked_label(&self) -> String {
        let s = self.to_string();
        format!("{}//{}", &s[0..2], &s[2..4])
    }

    pub fn get(&self, chrom: Chrom, locus: Locus) -> Allele {
        let i = locus.offset();
        match chrom {
            Chrom::Upper => self.alleles[i],
            Chrom::Lower => self.alleles[i + 1],
        }
    }
}

impl fmt::Display for TwoLocusGenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for locus in Locus::ALL {
            let [x, y] = self.pair(locus);
            write!(f, "{}{}", locus.letter(x), locus.letter(y))?;
        }
        Ok(())
    }
}

impl Serialize for TwoLocusGenotype {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for TwoLocusGenotype {
    type Err = CrossError;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        let alphabet = [Locus::A, Locus::A, Locus::B, Locus::B];
        if chars.len() != alphabet.len() {
            return Err(CrossError::invalid_genotype(s));
        }
        let mut alleles = [Allele::Upper; 4];
        for (i, (c, locus)) in chars.iter().zip(alphabet).enumerate() {
            alleles[i] = locus
                .allele(*c)
                .ok_or_else(|| CrossError::invalid_genotype(s))?;
        }
        Ok(Self { alleles })
    }
}

/// Checks a parent genotype string and returns it in validated form.
pub fn validate_genotype(s: &str) -> Result<TwoLocusGenotype> {
    s.parse()
}

impl Diploid<TwoLocusGamete> for TwoLocusGenotype {
    fn upper(&self) -> TwoLocusGamete {
        TwoLocusGamete::new(self.get(Chrom::Upper, Locus::A), self.get(Chrom::Upper, Locus::B))
    }

    fn lower(&self) -> TwoLocusGamete {
        TwoLocusGamete::new(self.get(Chrom::Lower, Locus::A), self.get(Chrom::Lower, Locus::B))
    }
}

impl Genotype<TwoLocusGamete> for TwoLocusGenotype {
    fn from_gametes(gx: &TwoLocusGamete, gy: &TwoLocusGamete) -> Self {
        Self::new(
            gx.allele(Locus::A),
            gy.allele(Locus::A),
            gx.allele(Locus::B),
            gy.allele(Locus::B),
        )
    }
}

/// Picks the strand each locus is drawn from.
///
/// When both loci come from the same strand the gamete is parental, otherwise it is a
/// recombinant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrosspointTwoLocus {
    locus_a: Chrom,
    locus_b: Chrom,
}

impl CrosspointTwoLocus {
    pub fn new(locus_a: Chrom, locus_b: Chrom) -> Self {
        Self { locus_a, locus_b }
    }

    pub fn is_recombinant(&self) -> bool {
        self.locus_a != self.locus_b
    }
}

impl Crosspoint<TwoLocusGenotype, TwoLocusGamete, Linkage> for CrosspointTwoLocus {
    fn cross(&self, x: &TwoLocusGenotype) -> TwoLocusGamete {
        TwoLocusGamete::new(x.get(self.locus_a, Locus::A), x.get(self.locus_b, Locus::B))
    }

    /// Independent loci enumerate locus A in the outer loop; linked loci list the two parental
    /// strands before the two recombinants.
    fn crosspoints(linkage: &Linkage) -> Box<dyn std::iter::Iterator<Item = Self>> {
        use Chrom::*;
        let order = match linkage {
            Linkage::Independent => [(Upper, Upper), (Upper, Lower), (Lower, Upper), (Lower, Lower)],
            Linkage::Linked(_) => [(Upper, Upper), (Lower, Lower), (Upper, Lower), (Lower, Upper)],
        };
        Box::new(order.into_iter().map(|(a, b)| CrosspointTwoLocus::new(a, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gametes::RecombinationRate;

    #[test]
    fn validator_accepts_two_locus_alphabet() {
        for s in ["AaBb", "AABB", "aabb", "aaBb", "aAbB", "AAbb"] {
            let x = validate_genotype(s).unwrap();
            assert_eq!(x.to_string(), s);
        }
    }

    #[test]
    fn validator_rejects_everything_else() {
        for s in ["", "AaB", "AaBbb", "BbAa", "AbBa", "AaCc", "aabB ", "ÅaBb", "A a "] {
            match validate_genotype(s) {
                Err(CrossError::InvalidGenotypeFormat { input }) => assert_eq!(input, s),
                other => panic!("{:?} accepted: {:?}", s, other),
            }
        }
    }

    #[test]
    fn labels() {
        let x: TwoLocusGenotype = "aAbB".parse().unwrap();
        assert_eq!(x.locus_label(), "A//a B//b");
        assert_eq!(x.linked_label(), "aA//bB");
        assert_eq!(x.upper().to_string(), "ab");
        assert_eq!(x.lower().to_string(), "AB");
        assert_eq!(x.heterozygous_loci(), 2);
        let y: TwoLocusGenotype = "AAbb".parse().unwrap();
        assert_eq!(y.heterozygous_loci(), 0);
    }

    #[test]
    fn gamete_order_matches_string_order() {
        let mut gs: Vec<TwoLocusGamete> = ["ab", "aB", "Ab", "AB"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        gs.sort();
        let labels: Vec<String> = gs.iter().map(|g| g.to_string()).collect();
        let mut expected = vec!["ab", "aB", "Ab", "AB"];
        expected.sort();
        assert_eq!(labels, expected);
    }

    #[test]
    fn from_gametes_pairs_loci() {
        let gx: TwoLocusGamete = "Ab".parse().unwrap();
        let gy: TwoLocusGamete = "aB".parse().unwrap();
        let z = TwoLocusGenotype::from_gametes(&gx, &gy);
        assert_eq!(z.to_string(), "AabB");
        assert_eq!(z.locus_label(), "A//a B//b");
    }

    #[test]
    fn crosspoints_follow_strands() {
        let x: TwoLocusGenotype = "AaBb".parse().unwrap();
        let independent: Vec<String> = CrosspointTwoLocus::crosspoints(&Linkage::Independent)
            .map(|k| k.cross(&x).to_string())
            .collect();
        assert_eq!(independent, vec!["AB", "Ab", "aB", "ab"]);
        let linked = Linkage::Linked(RecombinationRate::new(crate::fraction::Fraction::zero()).unwrap());
        let ks: Vec<CrosspointTwoLocus> = CrosspointTwoLocus::crosspoints(&linked).collect();
        let gametes: Vec<String> = ks.iter().map(|k| k.cross(&x).to_string()).collect();
        assert_eq!(gametes, vec!["AB", "ab", "Ab", "aB"]);
        let recombinant: Vec<bool> = ks.iter().map(|k| k.is_recombinant()).collect();
        assert_eq!(recombinant, vec![false, false, true, true]);
    }
}
