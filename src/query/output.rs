//! Read-only projections of server responses.

use indexmap::IndexSet;
use serde::Serialize;

use crate::pbs::{self, Chromosome, ReferenceAssembly, WireEnum};

/// One variant as handed to the caller.
///
/// Carrier counts are zeroed on the sex chromosomes and chrMT, where the
/// server's het/hom split would be misleading.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VariantResult {
    pub chromosome: String,
    pub position: u32,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "alt")]
    pub alternative: String,
    pub af: f64,
    pub ac: u32,
    pub an: u32,
    pub het_count: u32,
    pub hom_count: u32,
    pub gnomad_exome_af: Option<f64>,
    pub gnomad_genome_af: Option<f64>,
    pub alpha_missense_score: Option<f64>,
    pub protein_change: Option<String>,
}

impl From<pbs::Variant> for VariantResult {
    fn from(variant: pbs::Variant) -> Self {
        let chromosome = Chromosome::try_from(variant.chromosome).unwrap_or_default();
        let (het_count, hom_count) = if chromosome.is_autosome() {
            (variant.het_count, variant.hom_count)
        } else {
            (0, 0)
        };
        Self {
            chromosome: chromosome.name().to_owned(),
            position: variant.position,
            reference: variant.reference,
            alternative: variant.alternative,
            af: variant.af,
            ac: variant.ac,
            an: variant.an,
            het_count,
            hom_count,
            gnomad_exome_af: variant.gnomad_exome_af,
            gnomad_genome_af: variant.gnomad_genome_af,
            alpha_missense_score: variant.alpha_missense_score,
            protein_change: Some(variant.protein_change).filter(|s| !s.is_empty()),
        }
    }
}

/// All samples of the dataset, partitioned by sex.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    pub males: IndexSet<String>,
    pub females: IndexSet<String>,
}

impl SampleSet {
    /// Whether `sample` is known in either partition.
    pub fn contains(&self, sample: &str) -> bool {
        self.males.contains(sample) || self.females.contains(sample)
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.males.len() + self.females.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summary of the dataset served.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub assembly: String,
    pub name: String,
    pub version: String,
    pub variant_count: u64,
    pub sample_count: usize,
    pub samples: SampleSet,
}

impl From<pbs::DatasetInfoResponse> for SampleSet {
    fn from(response: pbs::DatasetInfoResponse) -> Self {
        Self {
            males: response.male_samples.into_iter().collect(),
            females: response.female_samples.into_iter().collect(),
        }
    }
}

impl From<pbs::DatasetInfoResponse> for DatasetInfo {
    fn from(response: pbs::DatasetInfoResponse) -> Self {
        let assembly = ReferenceAssembly::try_from(response.assembly)
            .unwrap_or_default()
            .as_str_name()
            .to_owned();
        let name = response.name.clone();
        let version = response.version.clone();
        let variant_count = response.variant_count;
        let samples = SampleSet::from(response);
        Self {
            assembly,
            name,
            version,
            variant_count,
            sample_count: samples.len(),
            samples,
        }
    }
}

/// Result of the sample counting queries.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleCount {
    pub count: u64,
    pub samples: Vec<String>,
}

impl From<pbs::SampleCountResponse> for SampleCount {
    fn from(response: pbs::SampleCountResponse) -> Self {
        Self {
            count: response.count,
            samples: response.samples,
        }
    }
}
