//! Kinship and trio inheritance pattern queries.
//!
//! The inheritance logic itself runs on the server; the client validates the
//! sample roles and forwards the normalized query.

use super::{
    dispatch::{require_sample, PageArgs, QueryClient, RegionArgs},
    filter::RawFilters,
    output::{SampleSet, VariantResult},
    pagination::normalize_pagination,
    region::LengthConvention,
    service::VariantService,
};
use crate::{
    err::QueryError,
    pbs::{self, RelatednessDegree},
};

/// Samples of a trio with two parents and a proband.
#[derive(clap::Args, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentsTrio {
    /// Father's sample identifier.
    #[arg(long)]
    pub father: String,
    /// Mother's sample identifier.
    #[arg(long)]
    pub mother: String,
    /// Proband's sample identifier.
    #[arg(long)]
    pub proband: String,
}

/// Samples of a trio with an affected and an unaffected parent.
#[derive(clap::Args, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedTrio {
    /// Affected parent's sample identifier.
    #[arg(long)]
    pub affected: String,
    /// Unaffected parent's sample identifier.
    #[arg(long)]
    pub unaffected: String,
    /// Proband's sample identifier.
    #[arg(long)]
    pub proband: String,
}

impl ParentsTrio {
    fn validated(&self) -> Result<(String, String, String), QueryError> {
        Ok((
            require_sample("father", &self.father)?.to_owned(),
            require_sample("mother", &self.mother)?.to_owned(),
            require_sample("proband", &self.proband)?.to_owned(),
        ))
    }
}

impl AffectedTrio {
    fn validated(&self) -> Result<(String, String, String), QueryError> {
        Ok((
            require_sample("affected", &self.affected)?.to_owned(),
            require_sample("unaffected", &self.unaffected)?.to_owned(),
            require_sample("proband", &self.proband)?.to_owned(),
        ))
    }
}

impl<S: VariantService> QueryClient<S> {
    /// Degree of relatedness of two samples.
    ///
    /// Fetches the sample roster first and fails with `UnknownSample` if
    /// either sample is missing.
    pub async fn kinship(
        &self,
        sample1: &str,
        sample2: &str,
    ) -> Result<RelatednessDegree, QueryError> {
        require_sample("sample1", sample1)?;
        require_sample("sample2", sample2)?;
        let roster = self.sample_set().await?;
        self.kinship_with_roster(&roster, sample1, sample2).await
    }

    /// Like `kinship()` but with an already fetched roster.
    ///
    /// Only the first relationship record returned is used; no records means
    /// `Unrelated`.
    pub async fn kinship_with_roster(
        &self,
        roster: &SampleSet,
        sample1: &str,
        sample2: &str,
    ) -> Result<RelatednessDegree, QueryError> {
        let sample1 = require_sample("sample1", sample1)?;
        let sample2 = require_sample("sample2", sample2)?;
        for sample in [sample1, sample2] {
            if !roster.contains(sample) {
                return Err(QueryError::UnknownSample(sample.to_owned()));
            }
        }

        tracing::debug!("calling KinshipDuo for {} and {}", sample1, sample2);
        let response = self
            .service()
            .kinship_duo(pbs::KinshipDuoRequest {
                assembly: self.assembly().into(),
                sample1: sample1.to_owned(),
                sample2: sample2.to_owned(),
            })
            .await?;
        if response.relationships.len() > 1 {
            tracing::debug!(
                "using first of {} relationship records",
                response.relationships.len()
            );
        }

        Ok(response
            .relationships
            .first()
            .map(|rel| RelatednessDegree::try_from(rel.degree).unwrap_or_default())
            .unwrap_or(RelatednessDegree::Unrelated))
    }

    /// Variants present in the proband but in neither parent.
    pub async fn de_novo(
        &self,
        trio: &ParentsTrio,
        region: &RegionArgs,
        filters: &RawFilters,
        page: &PageArgs,
    ) -> Result<Vec<VariantResult>, QueryError> {
        let (father, mother, proband) = trio.validated()?;
        let query = self.build_query(region, filters, LengthConvention::List)?;
        let page = normalize_pagination(page.skip, page.limit);
        tracing::debug!("calling SelectDeNovo with {:?}, {:?}", &query, &page);
        let stream = self
            .service()
            .select_de_novo(pbs::SelectDeNovoRequest {
                query: Some(query),
                page: Some(page.into()),
                father,
                mother,
                proband,
            })
            .await?;
        self.collect("SelectDeNovo", stream).await
    }

    /// Heterozygous variants shared by the proband and the affected parent
    /// only.
    pub async fn het_dominant(
        &self,
        trio: &AffectedTrio,
        region: &RegionArgs,
        filters: &RawFilters,
        page: &PageArgs,
    ) -> Result<Vec<VariantResult>, QueryError> {
        let (affected, unaffected, proband) = trio.validated()?;
        let query = self.build_query(region, filters, LengthConvention::List)?;
        let page = normalize_pagination(page.skip, page.limit);
        tracing::debug!("calling SelectHetDominant with {:?}, {:?}", &query, &page);
        let stream = self
            .service()
            .select_het_dominant(pbs::SelectHetDominantRequest {
                query: Some(query),
                page: Some(page.into()),
                affected,
                unaffected,
                proband,
            })
            .await?;
        self.collect("SelectHetDominant", stream).await
    }

    /// Variants homozygous in the proband and heterozygous in both parents.
    pub async fn hom_recessive(
        &self,
        trio: &ParentsTrio,
        region: &RegionArgs,
        filters: &RawFilters,
        page: &PageArgs,
    ) -> Result<Vec<VariantResult>, QueryError> {
        let (father, mother, proband) = trio.validated()?;
        let query = self.build_query(region, filters, LengthConvention::List)?;
        let page = normalize_pagination(page.skip, page.limit);
        tracing::debug!("calling SelectHomRecessive with {:?}, {:?}", &query, &page);
        let stream = self
            .service()
            .select_hom_recessive(pbs::SelectHomRecessiveRequest {
                query: Some(query),
                page: Some(page.into()),
                father,
                mother,
                proband,
            })
            .await?;
        self.collect("SelectHomRecessive", stream).await
    }
}
