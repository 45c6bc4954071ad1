//! The RPC seam between the query layer and the transport.

use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use tonic::transport::Channel;

use crate::pbs::{self, variant_db_client::VariantDbClient};

/// Stream of variant batches as returned by the list RPCs.
pub type VariantStream = BoxStream<'static, Result<pbs::VariantBatch, tonic::Status>>;

/// The RPCs of the `varquery.v1.VariantDb` service.
///
/// Implementations must be usable concurrently from several callers.
#[async_trait::async_trait]
pub trait VariantService: Send + Sync {
    async fn dataset_info(
        &self,
        request: pbs::DatasetInfoRequest,
    ) -> Result<pbs::DatasetInfoResponse, tonic::Status>;

    async fn count_variants_in_region(
        &self,
        request: pbs::CountVariantsInRegionRequest,
    ) -> Result<pbs::CountResponse, tonic::Status>;

    async fn count_variants_in_region_in_sample(
        &self,
        request: pbs::CountVariantsInRegionInSampleRequest,
    ) -> Result<pbs::CountResponse, tonic::Status>;

    async fn count_samples_in_region(
        &self,
        request: pbs::CountSamplesInRegionRequest,
    ) -> Result<pbs::SampleCountResponse, tonic::Status>;

    async fn count_samples_hom_reference(
        &self,
        request: pbs::CountSamplesHomReferenceRequest,
    ) -> Result<pbs::SampleCountResponse, tonic::Status>;

    async fn kinship_duo(
        &self,
        request: pbs::KinshipDuoRequest,
    ) -> Result<pbs::KinshipDuoResponse, tonic::Status>;

    async fn select_variants_in_region(
        &self,
        request: pbs::SelectVariantsInRegionRequest,
    ) -> Result<VariantStream, tonic::Status>;

    async fn select_variants_in_region_in_samples(
        &self,
        request: pbs::SelectVariantsInRegionInSamplesRequest,
    ) -> Result<VariantStream, tonic::Status>;

    async fn select_de_novo(
        &self,
        request: pbs::SelectDeNovoRequest,
    ) -> Result<VariantStream, tonic::Status>;

    async fn select_het_dominant(
        &self,
        request: pbs::SelectHetDominantRequest,
    ) -> Result<VariantStream, tonic::Status>;

    async fn select_hom_recessive(
        &self,
        request: pbs::SelectHomRecessiveRequest,
    ) -> Result<VariantStream, tonic::Status>;
}

/// Concatenate all batches of `stream` in server order.
///
/// No truncation is done here.  The first error aborts the drain and is
/// returned; records received before are discarded.
pub async fn drain_stream(stream: VariantStream) -> Result<Vec<pbs::Variant>, tonic::Status> {
    stream
        .try_fold(Vec::new(), |mut acc, batch| async move {
            acc.extend(batch.variants);
            Ok(acc)
        })
        .await
}

/// `VariantService` talking gRPC over a shared `tonic` channel.
///
/// The channel is cheap to clone and multiplexes concurrent calls, so each
/// call works on its own clone of the client.
#[derive(Debug, Clone)]
pub struct GrpcVariantService {
    client: VariantDbClient<Channel>,
}

impl GrpcVariantService {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: VariantDbClient::new(channel).max_decoding_message_size(usize::MAX),
        }
    }
}

#[async_trait::async_trait]
impl VariantService for GrpcVariantService {
    async fn dataset_info(
        &self,
        request: pbs::DatasetInfoRequest,
    ) -> Result<pbs::DatasetInfoResponse, tonic::Status> {
        let response = self.client.clone().dataset_info(request).await?;
        Ok(response.into_inner())
    }

    async fn count_variants_in_region(
        &self,
        request: pbs::CountVariantsInRegionRequest,
    ) -> Result<pbs::CountResponse, tonic::Status> {
        let response = self.client.clone().count_variants_in_region(request).await?;
        Ok(response.into_inner())
    }

    async fn count_variants_in_region_in_sample(
        &self,
        request: pbs::CountVariantsInRegionInSampleRequest,
    ) -> Result<pbs::CountResponse, tonic::Status> {
        let response = self
            .client
            .clone()
            .count_variants_in_region_in_sample(request)
            .await?;
        Ok(response.into_inner())
    }

    async fn count_samples_in_region(
        &self,
        request: pbs::CountSamplesInRegionRequest,
    ) -> Result<pbs::SampleCountResponse, tonic::Status> {
        let response = self.client.clone().count_samples_in_region(request).await?;
        Ok(response.into_inner())
    }

    async fn count_samples_hom_reference(
        &self,
        request: pbs::CountSamplesHomReferenceRequest,
    ) -> Result<pbs::SampleCountResponse, tonic::Status> {
        let response = self
            .client
            .clone()
            .count_samples_hom_reference(request)
            .await?;
        Ok(response.into_inner())
    }

    async fn kinship_duo(
        &self,
        request: pbs::KinshipDuoRequest,
    ) -> Result<pbs::KinshipDuoResponse, tonic::Status> {
        let response = self.client.clone().kinship_duo(request).await?;
        Ok(response.into_inner())
    }

    async fn select_variants_in_region(
        &self,
        request: pbs::SelectVariantsInRegionRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let response = self
            .client
            .clone()
            .select_variants_in_region(request)
            .await?;
        Ok(response.into_inner().boxed())
    }

    async fn select_variants_in_region_in_samples(
        &self,
        request: pbs::SelectVariantsInRegionInSamplesRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let response = self
            .client
            .clone()
            .select_variants_in_region_in_samples(request)
            .await?;
        Ok(response.into_inner().boxed())
    }

    async fn select_de_novo(
        &self,
        request: pbs::SelectDeNovoRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let response = self.client.clone().select_de_novo(request).await?;
        Ok(response.into_inner().boxed())
    }

    async fn select_het_dominant(
        &self,
        request: pbs::SelectHetDominantRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let response = self.client.clone().select_het_dominant(request).await?;
        Ok(response.into_inner().boxed())
    }

    async fn select_hom_recessive(
        &self,
        request: pbs::SelectHomRecessiveRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let response = self.client.clone().select_hom_recessive(request).await?;
        Ok(response.into_inner().boxed())
    }
}
