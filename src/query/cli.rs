//! Code implementing the "query" sub commands.

use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::json;

use super::{
    dispatch::{PageArgs, QueryClient, RegionArgs},
    filter::RawFilters,
    pedigree::{AffectedTrio, ParentsTrio},
    service::{GrpcVariantService, VariantService},
};
use crate::{
    common::split_csv,
    conf::{ConnArgs, ServerConf},
    err::QueryError,
    tools,
};

/// Arguments of count queries.
#[derive(Parser, Deserialize, Debug, Clone)]
pub struct CountArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub region: RegionArgs,
    #[command(flatten)]
    #[serde(flatten)]
    pub filters: RawFilters,
}

/// Arguments of list queries.
#[derive(Parser, Deserialize, Debug, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub region: RegionArgs,
    #[command(flatten)]
    #[serde(flatten)]
    pub filters: RawFilters,
    #[command(flatten)]
    #[serde(flatten)]
    pub page: PageArgs,
}

/// Arguments of `query count-variants-in-sample`.
#[derive(Parser, Deserialize, Debug, Clone)]
pub struct CountInSampleArgs {
    /// Sample identifier.
    #[arg(long)]
    pub sample: String,
    #[command(flatten)]
    #[serde(flatten)]
    pub count: CountArgs,
}

/// Arguments of `query select-variants-in-samples`.
#[derive(Parser, Deserialize, Debug, Clone)]
pub struct SelectInSamplesArgs {
    /// Comma-separated sample identifiers.
    #[arg(long)]
    pub samples: String,
    #[command(flatten)]
    #[serde(flatten)]
    pub select: SelectArgs,
}

/// Arguments of trio queries with both parents.
#[derive(Parser, Deserialize, Debug, Clone)]
pub struct ParentsTrioArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub trio: ParentsTrio,
    #[command(flatten)]
    #[serde(flatten)]
    pub select: SelectArgs,
}

/// Arguments of `query het-dominant`.
#[derive(Parser, Deserialize, Debug, Clone)]
pub struct AffectedTrioArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub trio: AffectedTrio,
    #[command(flatten)]
    #[serde(flatten)]
    pub select: SelectArgs,
}

/// Arguments of `query kinship`.
#[derive(Parser, Deserialize, Debug, Clone)]
pub struct KinshipArgs {
    /// First sample identifier.
    #[arg(long)]
    pub sample1: String,
    /// Second sample identifier.
    #[arg(long)]
    pub sample2: String,
}

/// Enum supporting the parsing of "query *" sub commands.
///
/// The same commands are accepted as JSON tool calls of the form
/// `{"tool": "count_variants", "arguments": {...}}`, with the tool names of
/// the `tools` catalog and the snake case argument names.
#[derive(Debug, Subcommand, Deserialize, Clone)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum QueryCommands {
    /// Dataset summary including the sample roster.
    DatasetInfo,
    /// Sample roster partitioned by sex.
    Samples,
    /// Count variants in a region.
    CountVariants(CountArgs),
    /// Count variants in a region carried by one sample.
    CountVariantsInSample(CountInSampleArgs),
    /// Count samples carrying variants in a region.
    CountSamples(CountArgs),
    /// Count samples homozygous reference in a region.
    CountSamplesHomRef(CountArgs),
    /// List variants in a region.
    SelectVariants(SelectArgs),
    /// List variants in a region carried by the given samples.
    SelectVariantsInSamples(SelectInSamplesArgs),
    /// List de novo variants of a trio.
    DeNovo(ParentsTrioArgs),
    /// List heterozygous dominant variants of a trio.
    HetDominant(AffectedTrioArgs),
    /// List homozygous recessive variants of a trio.
    HomRecessive(ParentsTrioArgs),
    /// Degree of relatedness of two samples.
    Kinship(KinshipArgs),
}

/// Command line arguments for `query` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Query the remote variant database", long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Run a JSON tool call instead of a sub command.
    #[arg(long, value_name = "JSON")]
    pub call: Option<String>,
    /// The query to run.
    #[command(subcommand)]
    pub command: Option<QueryCommands>,
}

/// Parse a JSON tool call into the query command it names.
pub fn parse_tool_call(call: &str) -> Result<QueryCommands, QueryError> {
    Ok(serde_json::from_str(call)?)
}

/// Run `command` and render its result as JSON.
pub async fn execute<S: VariantService>(
    client: &QueryClient<S>,
    command: &QueryCommands,
) -> Result<serde_json::Value, QueryError> {
    Ok(match command {
        QueryCommands::DatasetInfo => json!(client.dataset_info().await?),
        QueryCommands::Samples => json!(client.sample_set().await?),
        QueryCommands::CountVariants(args) => json!({
            "count": client.count_variants_in_region(&args.region, &args.filters).await?,
        }),
        QueryCommands::CountVariantsInSample(args) => json!({
            "count": client
                .count_variants_in_region_in_sample(
                    &args.sample,
                    &args.count.region,
                    &args.count.filters,
                )
                .await?,
        }),
        QueryCommands::CountSamples(args) => {
            json!(client.count_samples_in_region(&args.region, &args.filters).await?)
        }
        QueryCommands::CountSamplesHomRef(args) => json!(
            client
                .count_samples_hom_reference(&args.region, &args.filters)
                .await?
        ),
        QueryCommands::SelectVariants(args) => json!({
            "variants": client
                .select_variants_in_region(&args.region, &args.filters, &args.page)
                .await?,
        }),
        QueryCommands::SelectVariantsInSamples(args) => {
            let samples = split_csv(&args.samples)
                .map(str::to_owned)
                .collect::<Vec<_>>();
            let select = &args.select;
            json!({
                "variants": client
                    .select_variants_in_region_in_samples(
                        &samples,
                        &select.region,
                        &select.filters,
                        &select.page,
                    )
                    .await?,
            })
        }
        QueryCommands::DeNovo(args) => {
            let select = &args.select;
            json!({
                "variants": client
                    .de_novo(&args.trio, &select.region, &select.filters, &select.page)
                    .await?,
            })
        }
        QueryCommands::HetDominant(args) => {
            let select = &args.select;
            json!({
                "variants": client
                    .het_dominant(&args.trio, &select.region, &select.filters, &select.page)
                    .await?,
            })
        }
        QueryCommands::HomRecessive(args) => {
            let select = &args.select;
            json!({
                "variants": client
                    .hom_recessive(&args.trio, &select.region, &select.filters, &select.page)
                    .await?,
            })
        }
        QueryCommands::Kinship(args) => {
            let degree = client.kinship(&args.sample1, &args.sample2).await?;
            json!({
                "sample1": args.sample1,
                "sample2": args.sample2,
                "degree": degree.as_str_name(),
            })
        }
    })
}

/// Main entry point for `query` sub command.
pub async fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let command = match (&args.call, &args.command) {
        (Some(call), None) => match parse_tool_call(call) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", serde_json::to_string_pretty(&tools::error_json(&err))?);
                return Err(err.into());
            }
        },
        (None, Some(command)) => command.clone(),
        (Some(_), Some(_)) => anyhow::bail!("--call cannot be combined with a sub command"),
        (None, None) => anyhow::bail!("either --call or a sub command is required"),
    };

    let conf = ServerConf::from_args(&args.conn);
    tracing::info!("connecting to {} for {}", conf.uri(), conf.genome_release);
    let client = QueryClient::new(
        GrpcVariantService::new(conf.channel()?),
        conf.genome_release.into(),
    );

    match execute(&client, &command).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Err(err) => {
            tracing::error!("query failed: {}", &err);
            println!("{}", serde_json::to_string_pretty(&tools::error_json(&err))?);
            return Err(err.into());
        }
    }

    tracing::info!(
        "All of `query` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}
