/// Diploid genotypes with two loci, A and B, and their gametes
pub mod two_locus;
