//! Compilation of loosely-typed filter arguments into an annotation filter.

use indexmap::IndexSet;
use serde::Deserialize;

use super::tokens::{normalize, Token};
use crate::common::split_csv;
use crate::pbs::{
    self, AlphaMissenseClass, BioType, ClinSignificance, Consequence, FeatureType, Impact,
    VariantType,
};

/// Raw annotation filter arguments as given by the caller.
///
/// Every field is optional; absent values leave the corresponding predicate
/// inactive.
#[derive(clap::Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RawFilters {
    /// Cohort allele frequency less than.
    #[arg(long, allow_negative_numbers = true)]
    pub af_lt: Option<f64>,
    /// Cohort allele frequency greater than.
    #[arg(long, allow_negative_numbers = true)]
    pub af_gt: Option<f64>,
    /// gnomAD genomes allele frequency less than.
    #[arg(long, allow_negative_numbers = true)]
    pub gnomad_genome_af_lt: Option<f64>,
    /// gnomAD genomes allele frequency greater than.
    #[arg(long, allow_negative_numbers = true)]
    pub gnomad_genome_af_gt: Option<f64>,
    /// gnomAD exomes allele frequency less than.
    #[arg(long, allow_negative_numbers = true)]
    pub gnomad_exome_af_lt: Option<f64>,
    /// gnomAD exomes allele frequency greater than.
    #[arg(long, allow_negative_numbers = true)]
    pub gnomad_exome_af_gt: Option<f64>,
    /// AlphaMissense score less than.
    #[arg(long, allow_negative_numbers = true)]
    pub alpha_missense_score_lt: Option<f64>,
    /// AlphaMissense score greater than.
    #[arg(long, allow_negative_numbers = true)]
    pub alpha_missense_score_gt: Option<f64>,

    /// Comma-separated impacts, e.g., "HIGH,MODERATE".
    #[arg(long)]
    pub impact: Option<String>,
    /// Comma-separated biotypes, e.g., "protein_coding".
    #[arg(long)]
    pub bio_type: Option<String>,
    /// Comma-separated feature types.
    #[arg(long)]
    pub feature_type: Option<String>,
    /// Comma-separated variant types, e.g., "SNV,INDEL".
    #[arg(long)]
    pub variant_type: Option<String>,
    /// Comma-separated consequences, e.g., "missense_variant,stop_gained".
    #[arg(long)]
    pub consequence: Option<String>,
    /// Comma-separated ClinVar significances, e.g., "pathogenic".
    #[arg(long)]
    pub clin_significance: Option<String>,
    /// Comma-separated AlphaMissense classes, without "AM_" prefix.
    #[arg(long)]
    pub alpha_missense_class: Option<String>,

    /// Only biallelic sites.
    #[arg(long)]
    pub biallelic_only: Option<bool>,
    /// Only multiallelic sites.
    #[arg(long)]
    pub multiallelic_only: Option<bool>,
    /// Do not count male carriers.
    #[arg(long)]
    pub exclude_males: Option<bool>,
    /// Do not count female carriers.
    #[arg(long)]
    pub exclude_females: Option<bool>,
}

/// Normalized annotation filter.
///
/// Categorical sets compare equal regardless of insertion order; an empty set
/// does not restrict the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationFilter {
    pub af_lt: Option<f64>,
    pub af_gt: Option<f64>,
    pub gnomad_genome_af_lt: Option<f64>,
    pub gnomad_genome_af_gt: Option<f64>,
    pub gnomad_exome_af_lt: Option<f64>,
    pub gnomad_exome_af_gt: Option<f64>,
    pub alpha_missense_score_lt: Option<f64>,
    pub alpha_missense_score_gt: Option<f64>,

    pub impact: IndexSet<Impact>,
    pub bio_type: IndexSet<BioType>,
    pub feature_type: IndexSet<FeatureType>,
    pub variant_type: IndexSet<VariantType>,
    pub consequence: IndexSet<Consequence>,
    pub clin_significance: IndexSet<ClinSignificance>,
    pub alpha_missense_class: IndexSet<AlphaMissenseClass>,

    pub biallelic_only: bool,
    pub multiallelic_only: bool,
    pub exclude_males: bool,
    pub exclude_females: bool,
}

/// Keep only strictly positive thresholds.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|value| *value > 0.0)
}

/// Normalize a comma-separated token list, dropping unknown tokens.
fn token_set<T: Token>(csv: Option<&str>) -> IndexSet<T> {
    let mut result = IndexSet::new();
    for token in split_csv(csv.unwrap_or_default()) {
        match normalize::<T>(token) {
            Some(value) => {
                result.insert(value);
            }
            None => tracing::debug!("dropping unknown filter token {:?}", token),
        }
    }
    result
}

/// Compile raw filter arguments into an `AnnotationFilter`.
///
/// Thresholds are kept only if strictly positive, unknown categorical tokens
/// are dropped and toggles are set only if explicitly `true`.  This never
/// fails.
pub fn compile(raw: &RawFilters) -> AnnotationFilter {
    AnnotationFilter {
        af_lt: positive(raw.af_lt),
        af_gt: positive(raw.af_gt),
        gnomad_genome_af_lt: positive(raw.gnomad_genome_af_lt),
        gnomad_genome_af_gt: positive(raw.gnomad_genome_af_gt),
        gnomad_exome_af_lt: positive(raw.gnomad_exome_af_lt),
        gnomad_exome_af_gt: positive(raw.gnomad_exome_af_gt),
        alpha_missense_score_lt: positive(raw.alpha_missense_score_lt),
        alpha_missense_score_gt: positive(raw.alpha_missense_score_gt),

        impact: token_set(raw.impact.as_deref()),
        bio_type: token_set(raw.bio_type.as_deref()),
        feature_type: token_set(raw.feature_type.as_deref()),
        variant_type: token_set(raw.variant_type.as_deref()),
        consequence: token_set(raw.consequence.as_deref()),
        clin_significance: token_set(raw.clin_significance.as_deref()),
        alpha_missense_class: token_set(raw.alpha_missense_class.as_deref()),

        biallelic_only: raw.biallelic_only == Some(true),
        multiallelic_only: raw.multiallelic_only == Some(true),
        exclude_males: raw.exclude_males == Some(true),
        exclude_females: raw.exclude_females == Some(true),
    }
}

fn wire_values<T: Token>(values: &IndexSet<T>) -> Vec<i32> {
    values.iter().map(|value| (*value).into()).collect()
}

impl From<&AnnotationFilter> for pbs::AnnotationFilter {
    fn from(filter: &AnnotationFilter) -> Self {
        pbs::AnnotationFilter {
            af_lt: filter.af_lt,
            af_gt: filter.af_gt,
            gnomad_genome_af_lt: filter.gnomad_genome_af_lt,
            gnomad_genome_af_gt: filter.gnomad_genome_af_gt,
            gnomad_exome_af_lt: filter.gnomad_exome_af_lt,
            gnomad_exome_af_gt: filter.gnomad_exome_af_gt,
            alpha_missense_score_lt: filter.alpha_missense_score_lt,
            alpha_missense_score_gt: filter.alpha_missense_score_gt,
            impact: wire_values(&filter.impact),
            bio_type: wire_values(&filter.bio_type),
            feature_type: wire_values(&filter.feature_type),
            variant_type: wire_values(&filter.variant_type),
            consequence: wire_values(&filter.consequence),
            clin_significance: wire_values(&filter.clin_significance),
            alpha_missense_class: wire_values(&filter.alpha_missense_class),
            biallelic_only: filter.biallelic_only,
            multiallelic_only: filter.multiallelic_only,
            exclude_males: filter.exclude_males,
            exclude_females: filter.exclude_females,
        }
    }
}
