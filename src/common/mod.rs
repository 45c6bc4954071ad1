//! Common functionality.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::pbs::ReferenceAssembly;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Select the genome release to use.
#[derive(
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    strum::Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum GenomeRelease {
    // GRCh37 / hg19
    #[strum(serialize = "grch37")]
    Grch37,
    /// GRCh38 / hg38
    #[default]
    #[strum(serialize = "grch38")]
    Grch38,
}

impl From<GenomeRelease> for ReferenceAssembly {
    fn from(val: GenomeRelease) -> Self {
        match val {
            GenomeRelease::Grch37 => ReferenceAssembly::Grch37,
            GenomeRelease::Grch38 => ReferenceAssembly::Grch38,
        }
    }
}

/// Return the version of the `varquery` crate and `x.y.z` in tests.
pub fn varquery_version() -> &'static str {
    if cfg!(test) {
        "x.y.z"
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Split a comma-separated list into trimmed, non-empty entries.
pub fn split_csv(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn genome_release_to_assembly() {
        assert_eq!(
            ReferenceAssembly::from(GenomeRelease::Grch37),
            ReferenceAssembly::Grch37
        );
        assert_eq!(GenomeRelease::default().to_string(), "grch38");
    }

    #[test]
    fn split_csv_drops_blanks() {
        assert_eq!(
            split_csv(" a, ,b,,c ").collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(split_csv("").count(), 0);
    }
}
