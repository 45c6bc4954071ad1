//! Region and sample queries against the variant database.

use serde::Deserialize;

use super::{
    filter::{compile, RawFilters},
    output::{DatasetInfo, SampleCount, SampleSet, VariantResult},
    pagination::normalize_pagination,
    region::{normalize_length, validate_region, LengthConvention},
    service::{drain_stream, VariantService, VariantStream},
};
use crate::{
    err::QueryError,
    pbs::{self, ReferenceAssembly},
};

/// Region-scoped arguments shared by all variant queries.
#[derive(clap::Args, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionArgs {
    /// Chromosome name, one of 1..22, X, Y, MT.
    #[arg(long)]
    pub chromosome: String,
    /// 1-based start position.
    #[arg(long, allow_negative_numbers = true)]
    pub start: i64,
    /// 1-based end position, inclusive.
    #[arg(long, allow_negative_numbers = true)]
    pub end: i64,
    /// Reference allele.
    #[arg(long = "ref")]
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    /// Alternative allele.
    #[arg(long = "alt")]
    #[serde(default, rename = "alt")]
    pub alternative: Option<String>,
    /// Minimal variant length.
    #[arg(long, allow_negative_numbers = true)]
    #[serde(default)]
    pub var_min_length: Option<i64>,
    /// Maximal variant length.
    #[arg(long, allow_negative_numbers = true)]
    #[serde(default)]
    pub var_max_length: Option<i64>,
    /// Select homozygous genotype records (default: true).
    #[arg(long)]
    #[serde(default)]
    pub hom: Option<bool>,
    /// Select heterozygous genotype records (default: true).
    #[arg(long)]
    #[serde(default)]
    pub het: Option<bool>,
}

/// Pagination arguments of list queries.
#[derive(clap::Args, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PageArgs {
    /// Number of records to skip.
    #[arg(long, allow_negative_numbers = true)]
    pub skip: Option<i64>,
    /// Maximal number of records to return (at most 50).
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
}

/// Check that a sample argument for `role` is not empty.
pub(crate) fn require_sample<'a>(role: &'static str, value: &'a str) -> Result<&'a str, QueryError> {
    let value = value.trim();
    if value.is_empty() {
        Err(QueryError::EmptySampleIdentifier(role))
    } else {
        Ok(value)
    }
}

/// Query client on top of a `VariantService`.
///
/// Construct once and share by reference; every operation validates and
/// normalizes its arguments before issuing exactly one RPC (two for kinship).
#[derive(Debug, Clone)]
pub struct QueryClient<S> {
    service: S,
    assembly: ReferenceAssembly,
}

impl<S: VariantService> QueryClient<S> {
    pub fn new(service: S, assembly: ReferenceAssembly) -> Self {
        Self { service, assembly }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn assembly(&self) -> ReferenceAssembly {
        self.assembly
    }

    /// Build the wire query from validated region and compiled filters.
    pub(crate) fn build_query(
        &self,
        region: &RegionArgs,
        filters: &RawFilters,
        convention: LengthConvention,
    ) -> Result<pbs::VariantQuery, QueryError> {
        let validated = validate_region(&region.chromosome, region.start, region.end)?;
        let length = normalize_length(region.var_min_length, region.var_max_length, convention);
        let annotation_filter = compile(filters);

        Ok(pbs::VariantQuery {
            assembly: self.assembly.into(),
            chromosome: validated.chromosome.into(),
            start: validated.start,
            end: validated.end,
            reference: region.reference.clone().unwrap_or_default(),
            alternative: region.alternative.clone().unwrap_or_default(),
            min_length: length.min,
            max_length: length.max,
            hom: region.hom.unwrap_or(true),
            het: region.het.unwrap_or(true),
            annotation_filter: Some((&annotation_filter).into()),
        })
    }

    /// Drain a list RPC's stream into projected results.
    pub(crate) async fn collect(
        &self,
        rpc: &'static str,
        stream: VariantStream,
    ) -> Result<Vec<VariantResult>, QueryError> {
        let variants = drain_stream(stream).await?;
        tracing::debug!("{} returned {} variants", rpc, variants.len());
        Ok(variants.into_iter().map(VariantResult::from).collect())
    }

    pub async fn dataset_info(&self) -> Result<DatasetInfo, QueryError> {
        tracing::debug!("calling DatasetInfo");
        let response = self
            .service
            .dataset_info(pbs::DatasetInfoRequest::default())
            .await?;
        Ok(response.into())
    }

    /// Fetch the roster of all samples.
    pub async fn sample_set(&self) -> Result<SampleSet, QueryError> {
        tracing::debug!("calling DatasetInfo for sample roster");
        let response = self
            .service
            .dataset_info(pbs::DatasetInfoRequest::default())
            .await?;
        Ok(response.into())
    }

    pub async fn count_variants_in_region(
        &self,
        region: &RegionArgs,
        filters: &RawFilters,
    ) -> Result<u64, QueryError> {
        let query = self.build_query(region, filters, LengthConvention::Count)?;
        tracing::debug!("calling CountVariantsInRegion with {:?}", &query);
        let response = self
            .service
            .count_variants_in_region(pbs::CountVariantsInRegionRequest { query: Some(query) })
            .await?;
        Ok(response.count)
    }

    pub async fn count_variants_in_region_in_sample(
        &self,
        sample: &str,
        region: &RegionArgs,
        filters: &RawFilters,
    ) -> Result<u64, QueryError> {
        let sample = require_sample("sample", sample)?;
        let query = self.build_query(region, filters, LengthConvention::Count)?;
        tracing::debug!(
            "calling CountVariantsInRegionInSample for {} with {:?}",
            sample,
            &query
        );
        let response = self
            .service
            .count_variants_in_region_in_sample(pbs::CountVariantsInRegionInSampleRequest {
                query: Some(query),
                sample: sample.to_owned(),
            })
            .await?;
        Ok(response.count)
    }

    pub async fn count_samples_in_region(
        &self,
        region: &RegionArgs,
        filters: &RawFilters,
    ) -> Result<SampleCount, QueryError> {
        let query = self.build_query(region, filters, LengthConvention::Count)?;
        tracing::debug!("calling CountSamplesInRegion with {:?}", &query);
        let response = self
            .service
            .count_samples_in_region(pbs::CountSamplesInRegionRequest { query: Some(query) })
            .await?;
        Ok(response.into())
    }

    pub async fn count_samples_hom_reference(
        &self,
        region: &RegionArgs,
        filters: &RawFilters,
    ) -> Result<SampleCount, QueryError> {
        let query = self.build_query(region, filters, LengthConvention::Count)?;
        tracing::debug!("calling CountSamplesHomReference with {:?}", &query);
        let response = self
            .service
            .count_samples_hom_reference(pbs::CountSamplesHomReferenceRequest {
                query: Some(query),
            })
            .await?;
        Ok(response.into())
    }

    pub async fn select_variants_in_region(
        &self,
        region: &RegionArgs,
        filters: &RawFilters,
        page: &PageArgs,
    ) -> Result<Vec<VariantResult>, QueryError> {
        let query = self.build_query(region, filters, LengthConvention::List)?;
        let page = normalize_pagination(page.skip, page.limit);
        tracing::debug!(
            "calling SelectVariantsInRegion with {:?}, {:?}",
            &query,
            &page
        );
        let stream = self
            .service
            .select_variants_in_region(pbs::SelectVariantsInRegionRequest {
                query: Some(query),
                page: Some(page.into()),
            })
            .await?;
        self.collect("SelectVariantsInRegion", stream).await
    }

    /// Select variants in the region carried by any of `samples`.
    ///
    /// Blank entries in `samples` are ignored, but at least one sample must
    /// remain.
    pub async fn select_variants_in_region_in_samples(
        &self,
        samples: &[String],
        region: &RegionArgs,
        filters: &RawFilters,
        page: &PageArgs,
    ) -> Result<Vec<VariantResult>, QueryError> {
        let samples = samples
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();
        if samples.is_empty() {
            return Err(QueryError::EmptySampleIdentifier("samples"));
        }
        let query = self.build_query(region, filters, LengthConvention::List)?;
        let page = normalize_pagination(page.skip, page.limit);
        tracing::debug!(
            "calling SelectVariantsInRegionInSamples for {:?} with {:?}, {:?}",
            &samples,
            &query,
            &page
        );
        let stream = self
            .service
            .select_variants_in_region_in_samples(pbs::SelectVariantsInRegionInSamplesRequest {
                query: Some(query),
                page: Some(page.into()),
                samples,
            })
            .await?;
        self.collect("SelectVariantsInRegionInSamples", stream)
            .await
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{PageArgs, RegionArgs};
    use crate::{
        err::QueryError,
        pbs::{self, Chromosome, Impact, ReferenceAssembly},
        query::{
            filter::RawFilters,
            testing::{Call, MockService},
        },
    };

    fn brca1() -> RegionArgs {
        RegionArgs {
            chromosome: "17".to_owned(),
            start: 43044295,
            end: 43170245,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn select_clamps_limit() -> Result<(), anyhow::Error> {
        let client = MockService::with_variants(Chromosome::Chr17, 80).into_client();
        let variants = client
            .select_variants_in_region(
                &brca1(),
                &RawFilters::default(),
                &PageArgs {
                    skip: None,
                    limit: Some(500),
                },
            )
            .await?;

        assert!(variants.len() <= 50);
        let calls = client.service().calls();
        let Call::SelectVariantsInRegion(request) = &calls[0] else {
            panic!("unexpected call {:?}", &calls[0]);
        };
        assert_eq!(request.page, Some(pbs::Page { skip: 0, limit: 50 }));

        Ok(())
    }

    #[tokio::test]
    async fn select_builds_query() -> Result<(), anyhow::Error> {
        let client = MockService::default().into_client();
        client
            .select_variants_in_region(
                &RegionArgs {
                    reference: Some("G".to_owned()),
                    hom: Some(false),
                    ..brca1()
                },
                &RawFilters {
                    impact: Some("HIGH,INVALID".to_owned()),
                    af_lt: Some(0.0),
                    ..Default::default()
                },
                &PageArgs::default(),
            )
            .await?;

        let calls = client.service().calls();
        let Call::SelectVariantsInRegion(request) = &calls[0] else {
            panic!("unexpected call {:?}", &calls[0]);
        };
        assert_eq!(
            request.query,
            Some(pbs::VariantQuery {
                assembly: ReferenceAssembly::Grch38 as i32,
                chromosome: Chromosome::Chr17 as i32,
                start: 43044295,
                end: 43170245,
                reference: "G".to_owned(),
                alternative: String::new(),
                min_length: 0,
                max_length: i32::MAX as u32,
                hom: false,
                het: true,
                annotation_filter: Some(pbs::AnnotationFilter {
                    impact: vec![Impact::High as i32],
                    ..Default::default()
                }),
            })
        );

        Ok(())
    }

    #[rstest]
    #[case("99", 1000, 2000)]
    #[case("17", 2000, 1000)]
    #[case("99", 2000, 1000)]
    #[case("17", -1, 1000)]
    #[tokio::test]
    async fn invalid_region_issues_no_rpc(
        #[case] chromosome: &str,
        #[case] start: i64,
        #[case] end: i64,
    ) {
        let client = MockService::default().into_client();
        let region = RegionArgs {
            chromosome: chromosome.to_owned(),
            start,
            end,
            ..Default::default()
        };

        let err = client
            .count_variants_in_region(&region, &RawFilters::default())
            .await
            .expect_err("must fail");
        if end < start || start < 0 {
            assert!(matches!(err, QueryError::InvalidRange { .. }), "{:?}", err);
        } else {
            assert!(
                matches!(err, QueryError::UnknownChromosome(ref c) if c == "99"),
                "{:?}",
                err
            );
        }
        assert!(err.is_validation());
        assert!(client.service().calls().is_empty());
    }

    #[tokio::test]
    async fn count_with_negative_lengths_proceeds() -> Result<(), anyhow::Error> {
        let client = MockService {
            count: 42,
            ..Default::default()
        }
        .into_client();
        let count = client
            .count_variants_in_region(
                &RegionArgs {
                    var_min_length: Some(-5),
                    var_max_length: Some(-10),
                    ..brca1()
                },
                &RawFilters::default(),
            )
            .await?;

        assert_eq!(count, 42);
        let calls = client.service().calls();
        let Call::CountVariantsInRegion(request) = &calls[0] else {
            panic!("unexpected call {:?}", &calls[0]);
        };
        let query = request.query.as_ref().expect("query set");
        assert_eq!((query.min_length, query.max_length), (0, 0));

        Ok(())
    }

    #[tokio::test]
    async fn count_in_sample_requires_sample() {
        let client = MockService::default().into_client();
        let err = client
            .count_variants_in_region_in_sample("  ", &brca1(), &RawFilters::default())
            .await
            .expect_err("must fail");

        assert!(matches!(err, QueryError::EmptySampleIdentifier("sample")));
        assert!(client.service().calls().is_empty());
    }

    #[tokio::test]
    async fn count_samples() -> Result<(), anyhow::Error> {
        let client = MockService {
            sample_count: pbs::SampleCountResponse {
                count: 2,
                samples: vec!["S1".into(), "S2".into()],
            },
            ..Default::default()
        }
        .into_client();

        let in_region = client
            .count_samples_in_region(&brca1(), &RawFilters::default())
            .await?;
        let hom_ref = client
            .count_samples_hom_reference(&brca1(), &RawFilters::default())
            .await?;

        assert_eq!(in_region.count, 2);
        assert_eq!(hom_ref.samples, vec!["S1".to_owned(), "S2".to_owned()]);
        assert_eq!(client.service().calls().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn select_in_samples_requires_samples() {
        let client = MockService::default().into_client();
        let err = client
            .select_variants_in_region_in_samples(
                &["".to_owned(), " ".to_owned()],
                &brca1(),
                &RawFilters::default(),
                &PageArgs::default(),
            )
            .await
            .expect_err("must fail");

        assert!(matches!(err, QueryError::EmptySampleIdentifier("samples")));
        assert!(client.service().calls().is_empty());
    }

    #[tokio::test]
    async fn select_in_samples_forwards_samples() -> Result<(), anyhow::Error> {
        let client = MockService::with_variants(Chromosome::ChrX, 3).into_client();
        let variants = client
            .select_variants_in_region_in_samples(
                &["S1".to_owned(), "".to_owned(), " S2".to_owned()],
                &RegionArgs {
                    chromosome: "X".to_owned(),
                    ..brca1()
                },
                &RawFilters::default(),
                &PageArgs {
                    skip: Some(-3),
                    limit: Some(10),
                },
            )
            .await?;

        assert_eq!(variants.len(), 3);
        assert!(variants.iter().all(|v| v.het_count == 0 && v.hom_count == 0));
        let calls = client.service().calls();
        let Call::SelectVariantsInRegionInSamples(request) = &calls[0] else {
            panic!("unexpected call {:?}", &calls[0]);
        };
        assert_eq!(request.samples, vec!["S1".to_owned(), "S2".to_owned()]);
        assert_eq!(request.page, Some(pbs::Page { skip: 0, limit: 10 }));

        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let client = MockService {
            fail_with: Some(tonic::Code::Unavailable),
            ..Default::default()
        }
        .into_client();

        let err = client
            .count_variants_in_region(&brca1(), &RawFilters::default())
            .await
            .expect_err("must fail");
        assert!(
            matches!(&err, QueryError::Transport(status) if status.code() == tonic::Code::Unavailable)
        );

        let err = client
            .select_variants_in_region(&brca1(), &RawFilters::default(), &PageArgs::default())
            .await
            .expect_err("must fail");
        assert!(!err.is_validation());
    }

    #[tokio::test]
    async fn dataset_info() -> Result<(), anyhow::Error> {
        let client = MockService::with_roster(&["M1"], &["F1", "F2"]).into_client();
        let info = client.dataset_info().await?;

        assert_eq!(info.sample_count, 3);
        assert_eq!(client.sample_set().await?.len(), 3);

        Ok(())
    }

    #[test]
    fn region_args_from_json() -> Result<(), anyhow::Error> {
        let region: RegionArgs = serde_json::from_str(
            r#"{"chromosome": "17", "start": 1, "end": 2, "ref": "A", "var_min_length": -5}"#,
        )?;

        assert_eq!(
            region,
            RegionArgs {
                chromosome: "17".to_owned(),
                start: 1,
                end: 2,
                reference: Some("A".to_owned()),
                var_min_length: Some(-5),
                ..Default::default()
            }
        );

        Ok(())
    }
}
