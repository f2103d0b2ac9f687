//! # punnett
//!
//! Command-line front end for two-locus crosses.
//!
//! ```bash
//! # Dihybrid cross, independent loci
//! punnett -1 AaBb -2 AaBb
//!
//! # Linked loci, 10% recombination, codominant first gene
//! punnett -1 AaBb -2 aabb --linked -r 0.1 --dom-a codominance
//!
//! # JSON on stdout and an SVG drawing of the table
//! punnett -1 AaBb -2 Aabb --format json --svg cross.svg
//! ```

use clap::{Arg, ArgAction, Command};
use env_logger::Env;
use punnett_rs::config::{CrossConfig, CrossInputs};
use punnett_rs::extra::{text, visualisation};
use punnett_rs::gametes::RecombinationRate;
use punnett_rs::phenotype::DominanceMode;
use punnett_rs::report::compute;
use punnett_rs::{CrossError, Result};
use std::process;
use tracing::info;

fn cli() -> Command {
    Command::new("punnett")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Punnett square for a cross between two diploid genotypes over two loci")
        .arg(
            Arg::new("parent1")
                .short('1')
                .long("parent1")
                .value_name("GENOTYPE")
                .help("First parent, e.g. AaBb")
                .default_value("AaBb"),
        )
        .arg(
            Arg::new("parent2")
                .short('2')
                .long("parent2")
                .value_name("GENOTYPE")
                .help("Second parent, e.g. aabb")
                .default_value("AaBb"),
        )
        .arg(
            Arg::new("dom-a")
                .long("dom-a")
                .value_name("MODE")
                .help("Dominance for gene A: complete or codominance")
                .default_value("complete"),
        )
        .arg(
            Arg::new("dom-b")
                .long("dom-b")
                .value_name("MODE")
                .help("Dominance for gene B: complete or codominance")
                .default_value("complete"),
        )
        .arg(
            Arg::new("linked")
                .long("linked")
                .action(ArgAction::SetTrue)
                .help("Treat the two loci as linked on one chromosome"),
        )
        .arg(
            Arg::new("rate")
                .short('r')
                .long("rate")
                .value_name("RATE")
                .help("Recombination rate between the loci, 0 to 0.5 (only with --linked)")
                .default_value("0.1"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format: text or json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("svg")
                .long("svg")
                .value_name("FILE")
                .help("Also draw the outcome to an SVG file"),
        )
}

fn arg<'a>(matches: &'a clap::ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let rate = if matches.get_flag("linked") {
        Some(arg(matches, "rate").parse::<RecombinationRate>()?)
    } else {
        None
    };
    let config = CrossConfig::default()
        .with_dominance_a(arg(matches, "dom-a").parse::<DominanceMode>()?)
        .with_dominance_b(arg(matches, "dom-b").parse::<DominanceMode>()?)
        .with_recombination(rate);
    let inputs = CrossInputs::new(arg(matches, "parent1"), arg(matches, "parent2"), config);

    let report = compute(&inputs)?;
    match arg(matches, "format") {
        "json" => println!("{}", report.to_json()?),
        "text" => print!("{}", text::render(&report)),
        other => return Err(CrossError::parse(format!("unknown output format: {}", other))),
    }

    if let Some(path) = matches.get_one::<String>("svg") {
        visualisation::save_report(&report, path)?;
        info!(path = %path, "svg written");
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("error")).init();

    let matches = cli().get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_the_dihybrid_cross() {
        let matches = cli().try_get_matches_from(["punnett"]).unwrap();
        assert_eq!(arg(&matches, "parent1"), "AaBb");
        assert_eq!(arg(&matches, "format"), "text");
        assert!(!matches.get_flag("linked"));
        assert!(run(&matches).is_ok());
    }

    #[test]
    fn invalid_genotype_is_an_error() {
        let matches = cli()
            .try_get_matches_from(["punnett", "-1", "AaB"])
            .unwrap();
        assert!(matches!(
            run(&matches),
            Err(CrossError::InvalidGenotypeFormat { .. })
        ));
    }

    #[test]
    fn rate_above_half_is_rejected_when_linked() {
        let matches = cli()
            .try_get_matches_from(["punnett", "--linked", "-r", "0.6"])
            .unwrap();
        assert!(matches!(
            run(&matches),
            Err(CrossError::InvalidRecombinationRate { .. })
        ));
        let too_fine = cli()
            .try_get_matches_from(["punnett", "--linked", "-r", "0.1234567891"])
            .unwrap();
        assert!(matches!(
            run(&too_fine),
            Err(CrossError::InvalidRecombinationRate { .. })
        ));
        let ignored = cli()
            .try_get_matches_from(["punnett", "-r", "0.6"])
            .unwrap();
        assert!(run(&ignored).is_ok());
    }
}
