//! Gamete distributions of a single parent.

use crate::abstract_plants::Crosspoint;
use crate::error::{CrossError, Result};
use crate::fraction::{Fraction, MAX_APPROX_DENOMINATOR};
use crate::plants::two_locus::{CrosspointTwoLocus, TwoLocusGamete, TwoLocusGenotype};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Largest reduced denominator accepted for a recombination rate. A rate `n/d` gives cells over
/// `(2d)^2`, which must stay within `u64`.
pub const MAX_RATE_DENOMINATOR: u64 = 1_000_000_000;

/// Probability that a gamete of a linked parent is recombinant, kept exactly in `[0, 1/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RecombinationRate(Fraction);

impl RecombinationRate {
    pub fn new(rate: Fraction) -> Result<Self> {
        if rate > Fraction::HALF || rate.denom() > MAX_RATE_DENOMINATOR {
            return Err(CrossError::invalid_rate(rate));
        }
        Ok(Self(rate))
    }

    /// Accepts a float from an outer layer, snapping it to the nearest fraction with a
    /// denominator of at most one million.
    pub fn from_f64(rate: f64) -> Result<Self> {
        let exact = Fraction::approximate(rate, MAX_APPROX_DENOMINATOR)
            .ok_or_else(|| CrossError::invalid_rate(rate))?;
        Self::new(exact).map_err(|_| CrossError::invalid_rate(rate))
    }

    pub fn value(&self) -> Fraction {
        self.0
    }

    /// Weight of each of the two parental gametes, `(1 - r) / 2`.
    pub fn parental_share(&self) -> Result<Fraction> {
        Fraction::one()
            .checked_sub(self.0)
            .ok_or_else(|| CrossError::invalid_rate(self.0))?
            .half()
    }

    /// Weight of each of the two recombinant gametes, `r / 2`.
    pub fn recombinant_share(&self) -> Result<Fraction> {
        self.0.half()
    }
}

impl fmt::Display for RecombinationRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecombinationRate {
    type Err = CrossError;

    fn from_str(s: &str) -> Result<Self> {
        let rate: Fraction = s.parse().map_err(|_| CrossError::invalid_rate(s.trim()))?;
        Self::new(rate)
    }
}

impl Serialize for RecombinationRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Whether the two loci assort independently or travel on the same chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "recombination_rate")]
pub enum Linkage {
    #[default]
    Independent,
    Linked(RecombinationRate),
}

impl Linkage {
    pub fn is_linked(&self) -> bool {
        matches!(self, Linkage::Linked(_))
    }

    fn weight(&self, k: &CrosspointTwoLocus) -> Result<Fraction> {
        match self {
            Linkage::Independent => Ok(Fraction::QUARTER),
            Linkage::Linked(r) if k.is_recombinant() => r.recombinant_share(),
            Linkage::Linked(r) => r.parental_share(),
        }
    }
}

/// Gametes of one parent with their exact probabilities, in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameteDistribution {
    entries: Vec<(TwoLocusGamete, Fraction)>,
}

impl GameteDistribution {
    /// Adds `p` to the entry for `gamete`, appending it if it is new. Zero weights still create
    /// an entry.
    fn accumulate(&mut self, gamete: TwoLocusGamete, p: Fraction) -> Result<()> {
        match self.entries.iter_mut().find(|(g, _)| *g == gamete) {
            Some((_, q)) => *q = q.try_add(p)?,
            None => self.entries.push((gamete, p)),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(TwoLocusGamete, Fraction)> {
        self.entries.iter()
    }

    pub fn gametes(&self) -> impl Iterator<Item = TwoLocusGamete> + '_ {
        self.entries.iter().map(|(g, _)| *g)
    }

    pub fn get(&self, gamete: &TwoLocusGamete) -> Option<Fraction> {
        self.entries.iter().find(|(g, _)| g == gamete).map(|(_, p)| *p)
    }

    pub fn total(&self) -> Result<Fraction> {
        Fraction::try_sum(self.entries.iter().map(|(_, p)| *p))
    }

    /// `0.25 AB`-style labels, two decimals as shown next to the table.
    pub fn formatted(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(g, p)| format_gamete(&g.to_string(), *p))
            .collect()
    }
}

pub fn format_gamete(label: &str, p: Fraction) -> String {
    format!("{:.2} {}", p.to_f64(), label)
}

impl<'a> IntoIterator for &'a GameteDistribution {
    type Item = &'a (TwoLocusGamete, Fraction);
    type IntoIter = std::slice::Iter<'a, (TwoLocusGamete, Fraction)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for GameteDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (g, p) in &self.entries {
            map.serialize_entry(&g.to_string(), p)?;
        }
        map.end()
    }
}

/// Enumerates the gametes of `x` under `linkage`.
///
/// Every crosspoint contributes its weight to the gamete it produces; equal gametes are merged,
/// so homozygous loci collapse automatically. A double heterozygote under linkage always yields
/// four entries, even when the recombinants have probability zero.
pub fn generate(x: &TwoLocusGenotype, linkage: &Linkage) -> Result<GameteDistribution> {
    let mut dist = GameteDistribution::default();
    for k in CrosspointTwoLocus::crosspoints(linkage) {
        dist.accumulate(k.cross(x), linkage.weight(&k)?)?;
    }
    debug!(
        genotype = %x,
        linked = linkage.is_linked(),
        gametes = ?dist.formatted(),
        "generated gamete distribution"
    );
    Ok(dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_plants::Diploid;
    use crate::extra::instance_generators::{all_genotypes, random_rate};
    use crate::plants::two_locus::Locus;
    use rand::prelude::*;

    fn frac(n: u64, d: u64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    fn linked(n: u64, d: u64) -> Linkage {
        Linkage::Linked(RecombinationRate::new(frac(n, d)).unwrap())
    }

    fn labels(dist: &GameteDistribution) -> Vec<(String, String)> {
        dist.iter()
            .map(|(g, p)| (g.to_string(), p.to_string()))
            .collect()
    }

    #[test]
    fn rate_bounds() {
        assert!(RecombinationRate::new(frac(1, 2)).is_ok());
        assert!(RecombinationRate::new(Fraction::zero()).is_ok());
        assert!(matches!(
            RecombinationRate::new(frac(51, 100)),
            Err(CrossError::InvalidRecombinationRate { .. })
        ));
        assert!("0.6".parse::<RecombinationRate>().is_err());
        assert!("abc".parse::<RecombinationRate>().is_err());
        assert!(RecombinationRate::from_f64(-0.01).is_err());
        assert!(RecombinationRate::from_f64(f64::NAN).is_err());
        assert_eq!(RecombinationRate::from_f64(0.1).unwrap().value(), frac(1, 10));
        assert_eq!("0.1".parse::<RecombinationRate>().unwrap().value(), frac(1, 10));
        assert_eq!(
            "0.123456789".parse::<RecombinationRate>().unwrap().value(),
            frac(123_456_789, 1_000_000_000)
        );
    }

    #[test]
    fn rejects_rates_too_fine_for_exact_cells() {
        for s in ["0.1234567891", "0.000000000001", "1/1000000007"] {
            assert!(matches!(
                s.parse::<RecombinationRate>(),
                Err(CrossError::InvalidRecombinationRate { .. })
            ));
        }
        // reduces to 1/8 first, so the long decimal is fine
        assert_eq!(
            "0.1250000000".parse::<RecombinationRate>().unwrap().value(),
            frac(1, 8)
        );
    }

    #[test]
    fn finest_rate_still_sums_to_one() {
        let r: RecombinationRate = "0.123456789".parse().unwrap();
        let x: TwoLocusGenotype = "AaBb".parse().unwrap();
        let dist = generate(&x, &Linkage::Linked(r)).unwrap();
        assert!(dist.total().unwrap().is_one());
        assert_eq!(dist.get(&x.upper()), Some(frac(876_543_211, 2_000_000_000)));
    }

    #[test]
    fn independent_double_heterozygote() {
        let x: TwoLocusGenotype = "AaBb".parse().unwrap();
        let dist = generate(&x, &Linkage::Independent).unwrap();
        assert_eq!(
            labels(&dist),
            vec![
                ("AB".to_owned(), "1/4".to_owned()),
                ("Ab".to_owned(), "1/4".to_owned()),
                ("aB".to_owned(), "1/4".to_owned()),
                ("ab".to_owned(), "1/4".to_owned()),
            ]
        );
    }

    #[test]
    fn independent_collapses_homozygous_loci() {
        let x: TwoLocusGenotype = "AABb".parse().unwrap();
        let dist = generate(&x, &Linkage::Independent).unwrap();
        assert_eq!(
            labels(&dist),
            vec![("AB".to_owned(), "1/2".to_owned()), ("Ab".to_owned(), "1/2".to_owned())]
        );
        let y: TwoLocusGenotype = "aabb".parse().unwrap();
        assert_eq!(labels(&generate(&y, &Linkage::Independent).unwrap()), vec![("ab".to_owned(), "1".to_owned())]);
    }

    #[test]
    fn independent_distributions_sum_to_one() {
        for x in all_genotypes() {
            let dist = generate(&x, &Linkage::Independent).unwrap();
            assert!(dist.total().unwrap().is_one());
            assert!((dist.iter().map(|(_, p)| p.to_f64()).sum::<f64>() - 1.0).abs() < 1e-9);
            let expected = match x.heterozygous_loci() {
                0 => 1,
                1 => 2,
                _ => 4,
            };
            assert_eq!(dist.len(), expected, "{}", x);
        }
    }

    #[test]
    fn linked_parental_and_recombinant_shares() {
        let x: TwoLocusGenotype = "AaBb".parse().unwrap();
        let dist = generate(&x, &linked(1, 10)).unwrap();
        assert_eq!(
            labels(&dist),
            vec![
                ("AB".to_owned(), "9/20".to_owned()),
                ("ab".to_owned(), "9/20".to_owned()),
                ("Ab".to_owned(), "1/20".to_owned()),
                ("aB".to_owned(), "1/20".to_owned()),
            ]
        );
    }

    #[test]
    fn linked_keeps_zero_recombinants() {
        let x: TwoLocusGenotype = "AabB".parse().unwrap();
        let dist = generate(&x, &linked(0, 1)).unwrap();
        assert_eq!(dist.len(), 4);
        assert_eq!(dist.get(&x.upper()), Some(frac(1, 2)));
        assert_eq!(dist.get(&x.lower()), Some(frac(1, 2)));
        assert_eq!(dist.iter().filter(|(_, p)| p.is_zero()).count(), 2);
    }

    #[test]
    fn linked_homozygote_has_one_gamete() {
        let x: TwoLocusGenotype = "AAbb".parse().unwrap();
        assert_eq!(labels(&generate(&x, &linked(1, 10)).unwrap()), vec![("Ab".to_owned(), "1".to_owned())]);
    }

    #[test]
    fn linked_single_heterozygous_locus_merges_shares() {
        let x: TwoLocusGenotype = "Aabb".parse().unwrap();
        let dist = generate(&x, &linked(1, 10)).unwrap();
        assert_eq!(
            labels(&dist),
            vec![("Ab".to_owned(), "1/2".to_owned()), ("ab".to_owned(), "1/2".to_owned())]
        );
    }

    #[test]
    fn linked_random_rates() {
        let mut rng = thread_rng();
        let double_het: Vec<TwoLocusGenotype> = all_genotypes()
            .filter(|x| x.heterozygous_loci() == 2)
            .collect();
        assert_eq!(double_het.len(), 4);
        for _ in 0..200 {
            let r = random_rate(&mut rng);
            let linkage = Linkage::Linked(r);
            let x = double_het.choose(&mut rng).unwrap();
            let dist = generate(x, &linkage).unwrap();
            assert_eq!(dist.len(), 4);
            assert!(dist.total().unwrap().is_one());
            let parental = Fraction::one().checked_sub(r.value()).unwrap().half().unwrap();
            assert_eq!(dist.get(&x.upper()), Some(parental));
            assert_eq!(dist.get(&x.lower()), Some(parental));
            for (g, p) in dist.iter() {
                let is_parental = *g == x.upper() || *g == x.lower();
                if !is_parental {
                    assert_eq!(*p, r.value().half().unwrap());
                    let from_upper_a = g.allele(Locus::A) == x.upper().allele(Locus::A);
                    let from_upper_b = g.allele(Locus::B) == x.upper().allele(Locus::B);
                    assert_ne!(from_upper_a, from_upper_b);
                }
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        for x in all_genotypes() {
            assert_eq!(generate(&x, &linked(3, 10)).unwrap(), generate(&x, &linked(3, 10)).unwrap());
        }
    }
}
