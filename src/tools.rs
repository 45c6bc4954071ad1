//! Static tool declarations for LLM tool-calling clients.
//!
//! Each query operation is declared once here with a description that lists
//! the accepted categorical tokens, so clients need no further knowledge of
//! the wire enumerations.

use clap::Parser;
use itertools::Itertools;
use serde::Serialize;
use serde_json::json;
use tonic::Code;

use crate::{
    common::varquery_version,
    err::QueryError,
    pbs::{
        AlphaMissenseClass, BioType, ClinSignificance, Consequence, FeatureType, Impact,
        VariantType,
    },
    query::{
        pagination::MAX_RETURNED_ITEMS,
        tokens::{accepted_tokens, Token},
    },
};

/// Declaration of one tool.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Tool name, the snake case form of the `query` sub command.
    pub name: &'static str,
    /// Human-readable description including usage hints.
    pub description: String,
    /// Top-level keys of the JSON result.
    pub result: &'static [&'static str],
}

const REGION_HINT: &str = "Region: chromosome (1..22, X, Y, MT; no 'chr' prefix), \
    1-based start and end with start <= end; optional ref/alt alleles, \
    var_min_length/var_max_length (inverted ranges are ignored) and hom/het \
    genotype selection.";

/// How clients invoke a declared tool.
const INVOCATION: &str = "varquery query --call \
    '{\"tool\": <name>, \"arguments\": {<argument>: <value>, ...}}'";

const VARIANTS: &[&str] = &["variants"];
const COUNT: &[&str] = &["count"];
const SAMPLE_COUNT: &[&str] = &["count", "samples"];

const WORKFLOW_HINT: &str = "Call dataset_info first to learn the assembly and \
    the sample identifiers, then narrow down with the count tools before \
    listing variants.";

fn token_list<T: Token>() -> String {
    accepted_tokens::<T>().into_iter().join(", ")
}

/// Description of the annotation filter arguments.
fn filter_hint() -> String {
    format!(
        "Filters (all optional, unknown tokens are ignored, comma-separate \
         multiple values): af_lt/af_gt, gnomad_genome_af_lt/_gt, \
         gnomad_exome_af_lt/_gt, alpha_missense_score_lt/_gt (values <= 0 are \
         ignored); impact: {}; bio_type: {}; feature_type: {}; variant_type: {}; \
         consequence: {}; clin_significance: {}; alpha_missense_class: {}; \
         biallelic_only, multiallelic_only, exclude_males, exclude_females \
         (true to enable).",
        token_list::<Impact>(),
        token_list::<BioType>(),
        token_list::<FeatureType>(),
        token_list::<VariantType>(),
        token_list::<Consequence>(),
        token_list::<ClinSignificance>(),
        token_list::<AlphaMissenseClass>(),
    )
}

fn page_hint() -> String {
    format!(
        "Pagination: skip (default 0) and limit (1..{max}, default {max}).",
        max = MAX_RETURNED_ITEMS
    )
}

/// All tool declarations.
pub fn catalog() -> Vec<ToolSpec> {
    let filters = filter_hint();
    let page = page_hint();
    let count = |text: &str| format!("{} {} {}", text, REGION_HINT, filters);
    let select = |text: &str| format!("{} {} {} {}", text, REGION_HINT, filters, page);

    vec![
        ToolSpec {
            name: "dataset_info",
            description: format!(
                "Summary of the variant dataset: assembly, variant count and \
                 samples by sex. {}",
                WORKFLOW_HINT
            ),
            result: &[
                "assembly",
                "name",
                "version",
                "variant_count",
                "sample_count",
                "samples",
            ],
        },
        ToolSpec {
            name: "samples",
            description: "List all sample identifiers partitioned into males and females."
                .to_owned(),
            result: &["males", "females"],
        },
        ToolSpec {
            name: "count_variants",
            description: count("Count variants in a region."),
            result: COUNT,
        },
        ToolSpec {
            name: "count_variants_in_sample",
            description: count("Count variants in a region carried by one sample (sample)."),
            result: COUNT,
        },
        ToolSpec {
            name: "count_samples",
            description: count("Count the samples carrying variants in a region."),
            result: SAMPLE_COUNT,
        },
        ToolSpec {
            name: "count_samples_hom_ref",
            description: count("Count the samples homozygous reference in a region."),
            result: SAMPLE_COUNT,
        },
        ToolSpec {
            name: "select_variants",
            description: select("List variants in a region."),
            result: VARIANTS,
        },
        ToolSpec {
            name: "select_variants_in_samples",
            description: select(
                "List variants in a region carried by any of the comma-separated samples \
                 (samples).",
            ),
            result: VARIANTS,
        },
        ToolSpec {
            name: "de_novo",
            description: select(
                "List variants present in the proband but in neither father nor mother \
                 (father, mother, proband).",
            ),
            result: VARIANTS,
        },
        ToolSpec {
            name: "het_dominant",
            description: select(
                "List heterozygous variants shared by the proband and the affected \
                 parent but absent in the unaffected parent (affected, unaffected, proband).",
            ),
            result: VARIANTS,
        },
        ToolSpec {
            name: "hom_recessive",
            description: select(
                "List variants homozygous in the proband and heterozygous in father \
                 and mother (father, mother, proband).",
            ),
            result: VARIANTS,
        },
        ToolSpec {
            name: "kinship",
            description: "Degree of relatedness of two samples (sample1, sample2); both \
                must be known to the dataset."
                .to_owned(),
            result: &["sample1", "sample2", "degree"],
        },
    ]
}

/// Human-readable category of a gRPC status code.
pub fn classify_status(code: Code) -> &'static str {
    match code {
        Code::Unavailable => "variant database unreachable",
        Code::DeadlineExceeded => "variant database timed out",
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            "query rejected by server"
        }
        Code::NotFound => "not found",
        Code::PermissionDenied | Code::Unauthenticated => "access denied",
        Code::ResourceExhausted => "server overloaded",
        Code::Cancelled | Code::Aborted => "query cancelled",
        Code::Unimplemented => "operation not supported by server",
        Code::Internal | Code::DataLoss | Code::Unknown => "internal server error",
        Code::Ok | Code::AlreadyExists => "unexpected server response",
    }
}

/// Render a query error as JSON for tool clients.
pub fn error_json(err: &QueryError) -> serde_json::Value {
    match err {
        QueryError::Transport(status) => json!({
            "error": classify_status(status.code()),
            "message": status.message(),
        }),
        _ => json!({
            "error": "invalid arguments",
            "message": err.to_string(),
        }),
    }
}

/// Command line arguments for `tools` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Print the tool declarations as JSON", long_about = None)]
pub struct Args {
    /// Only print the tool with this name.
    #[arg(long)]
    pub name: Option<String>,
}

/// Main entry point for `tools` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let tools = catalog()
        .into_iter()
        .filter(|tool| args.name.as_deref().map_or(true, |name| tool.name == name))
        .collect::<Vec<_>>();
    if tools.is_empty() {
        anyhow::bail!("no tool named {:?}", args.name.as_deref().unwrap_or_default());
    }
    let value = json!({
        "version": varquery_version(),
        "invocation": INVOCATION,
        "tools": tools,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
