//! In-memory `VariantService` for tests, optionally served over gRPC.

use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use tonic::transport::{Channel, Server};

use super::{
    dispatch::QueryClient,
    service::{VariantService, VariantStream},
};
use crate::{
    conf::ServerConf,
    pbs::{
        self,
        variant_db_server::{VariantDb, VariantDbServer},
        Chromosome, ReferenceAssembly,
    },
};

/// Record of an issued RPC.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DatasetInfo,
    CountVariantsInRegion(pbs::CountVariantsInRegionRequest),
    CountVariantsInRegionInSample(pbs::CountVariantsInRegionInSampleRequest),
    CountSamplesInRegion(pbs::CountSamplesInRegionRequest),
    CountSamplesHomReference(pbs::CountSamplesHomReferenceRequest),
    KinshipDuo(pbs::KinshipDuoRequest),
    SelectVariantsInRegion(pbs::SelectVariantsInRegionRequest),
    SelectVariantsInRegionInSamples(pbs::SelectVariantsInRegionInSamplesRequest),
    SelectDeNovo(pbs::SelectDeNovoRequest),
    SelectHetDominant(pbs::SelectHetDominantRequest),
    SelectHomRecessive(pbs::SelectHomRecessiveRequest),
}

/// Canned responses plus a log of the calls made.
///
/// List RPCs honor the requested page like the server does and emit the
/// result in batches of 10.
#[derive(Debug, Default)]
pub struct MockService {
    pub dataset: pbs::DatasetInfoResponse,
    pub count: u64,
    pub sample_count: pbs::SampleCountResponse,
    pub relationships: Vec<pbs::Relationship>,
    pub variants: Vec<pbs::Variant>,
    pub fail_with: Option<tonic::Code>,
    pub calls: Mutex<Vec<Call>>,
}

impl MockService {
    pub fn with_variants(chromosome: Chromosome, n: u32) -> Self {
        Self {
            variants: (0..n)
                .map(|i| pbs::Variant {
                    chromosome: chromosome as i32,
                    position: 1000 + i,
                    reference: "A".into(),
                    alternative: "G".into(),
                    het_count: 1,
                    hom_count: 1,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_roster(males: &[&str], females: &[&str]) -> Self {
        Self {
            dataset: pbs::DatasetInfoResponse {
                assembly: ReferenceAssembly::Grch38 as i32,
                male_samples: males.iter().map(|s| s.to_string()).collect(),
                female_samples: females.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn into_client(self) -> QueryClient<Self> {
        QueryClient::new(self, ReferenceAssembly::Grch38)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("poisoned").clone()
    }

    fn record(&self, call: Call) -> Result<(), tonic::Status> {
        self.calls.lock().expect("poisoned").push(call);
        match self.fail_with {
            Some(code) => Err(tonic::Status::new(code, "mock failure")),
            None => Ok(()),
        }
    }

    fn page(&self, page: Option<&pbs::Page>) -> VariantStream {
        let page = page.cloned().unwrap_or_default();
        let variants = self
            .variants
            .iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect::<Vec<_>>();
        let batches = variants
            .chunks(10)
            .map(|chunk| {
                Ok(pbs::VariantBatch {
                    variants: chunk.to_vec(),
                })
            })
            .collect::<Vec<_>>();
        stream::iter(batches).boxed()
    }
}

#[async_trait::async_trait]
impl VariantService for MockService {
    async fn dataset_info(
        &self,
        _request: pbs::DatasetInfoRequest,
    ) -> Result<pbs::DatasetInfoResponse, tonic::Status> {
        self.record(Call::DatasetInfo)?;
        Ok(self.dataset.clone())
    }

    async fn count_variants_in_region(
        &self,
        request: pbs::CountVariantsInRegionRequest,
    ) -> Result<pbs::CountResponse, tonic::Status> {
        self.record(Call::CountVariantsInRegion(request))?;
        Ok(pbs::CountResponse { count: self.count })
    }

    async fn count_variants_in_region_in_sample(
        &self,
        request: pbs::CountVariantsInRegionInSampleRequest,
    ) -> Result<pbs::CountResponse, tonic::Status> {
        self.record(Call::CountVariantsInRegionInSample(request))?;
        Ok(pbs::CountResponse { count: self.count })
    }

    async fn count_samples_in_region(
        &self,
        request: pbs::CountSamplesInRegionRequest,
    ) -> Result<pbs::SampleCountResponse, tonic::Status> {
        self.record(Call::CountSamplesInRegion(request))?;
        Ok(self.sample_count.clone())
    }

    async fn count_samples_hom_reference(
        &self,
        request: pbs::CountSamplesHomReferenceRequest,
    ) -> Result<pbs::SampleCountResponse, tonic::Status> {
        self.record(Call::CountSamplesHomReference(request))?;
        Ok(self.sample_count.clone())
    }

    async fn kinship_duo(
        &self,
        request: pbs::KinshipDuoRequest,
    ) -> Result<pbs::KinshipDuoResponse, tonic::Status> {
        self.record(Call::KinshipDuo(request))?;
        Ok(pbs::KinshipDuoResponse {
            relationships: self.relationships.clone(),
        })
    }

    async fn select_variants_in_region(
        &self,
        request: pbs::SelectVariantsInRegionRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let stream = self.page(request.page.as_ref());
        self.record(Call::SelectVariantsInRegion(request))?;
        Ok(stream)
    }

    async fn select_variants_in_region_in_samples(
        &self,
        request: pbs::SelectVariantsInRegionInSamplesRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let stream = self.page(request.page.as_ref());
        self.record(Call::SelectVariantsInRegionInSamples(request))?;
        Ok(stream)
    }

    async fn select_de_novo(
        &self,
        request: pbs::SelectDeNovoRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let stream = self.page(request.page.as_ref());
        self.record(Call::SelectDeNovo(request))?;
        Ok(stream)
    }

    async fn select_het_dominant(
        &self,
        request: pbs::SelectHetDominantRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let stream = self.page(request.page.as_ref());
        self.record(Call::SelectHetDominant(request))?;
        Ok(stream)
    }

    async fn select_hom_recessive(
        &self,
        request: pbs::SelectHomRecessiveRequest,
    ) -> Result<VariantStream, tonic::Status> {
        let stream = self.page(request.page.as_ref());
        self.record(Call::SelectHomRecessive(request))?;
        Ok(stream)
    }
}

/// Serves a `VariantService` through the generated gRPC server stub.
pub struct MockServer(pub Arc<MockService>);

impl MockServer {
    /// Serve `service` on an ephemeral local port and return a channel to it.
    pub async fn spawn(service: Arc<MockService>) -> Result<Channel, anyhow::Error> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let incoming = Box::pin(stream::unfold(listener, |listener| async move {
            let conn = listener.accept().await.map(|(stream, _)| stream);
            Some((conn, listener))
        }));
        tokio::spawn(
            Server::builder()
                .add_service(VariantDbServer::new(MockServer(service)))
                .serve_with_incoming(incoming),
        );

        let conf = ServerConf {
            host: "127.0.0.1".to_owned(),
            port,
            ..Default::default()
        };
        Ok(conf.channel()?)
    }
}

#[tonic::async_trait]
impl VariantDb for MockServer {
    async fn dataset_info(
        &self,
        request: tonic::Request<pbs::DatasetInfoRequest>,
    ) -> Result<tonic::Response<pbs::DatasetInfoResponse>, tonic::Status> {
        let response = self.0.dataset_info(request.into_inner()).await?;
        Ok(tonic::Response::new(response))
    }

    async fn count_variants_in_region(
        &self,
        request: tonic::Request<pbs::CountVariantsInRegionRequest>,
    ) -> Result<tonic::Response<pbs::CountResponse>, tonic::Status> {
        let response = self.0.count_variants_in_region(request.into_inner()).await?;
        Ok(tonic::Response::new(response))
    }

    async fn count_variants_in_region_in_sample(
        &self,
        request: tonic::Request<pbs::CountVariantsInRegionInSampleRequest>,
    ) -> Result<tonic::Response<pbs::CountResponse>, tonic::Status> {
        let response = self
            .0
            .count_variants_in_region_in_sample(request.into_inner())
            .await?;
        Ok(tonic::Response::new(response))
    }

    async fn count_samples_in_region(
        &self,
        request: tonic::Request<pbs::CountSamplesInRegionRequest>,
    ) -> Result<tonic::Response<pbs::SampleCountResponse>, tonic::Status> {
        let response = self.0.count_samples_in_region(request.into_inner()).await?;
        Ok(tonic::Response::new(response))
    }

    async fn count_samples_hom_reference(
        &self,
        request: tonic::Request<pbs::CountSamplesHomReferenceRequest>,
    ) -> Result<tonic::Response<pbs::SampleCountResponse>, tonic::Status> {
        let response = self
            .0
            .count_samples_hom_reference(request.into_inner())
            .await?;
        Ok(tonic::Response::new(response))
    }

    async fn kinship_duo(
        &self,
        request: tonic::Request<pbs::KinshipDuoRequest>,
    ) -> Result<tonic::Response<pbs::KinshipDuoResponse>, tonic::Status> {
        let response = self.0.kinship_duo(request.into_inner()).await?;
        Ok(tonic::Response::new(response))
    }

    type SelectVariantsInRegionStream = VariantStream;

    async fn select_variants_in_region(
        &self,
        request: tonic::Request<pbs::SelectVariantsInRegionRequest>,
    ) -> Result<tonic::Response<Self::SelectVariantsInRegionStream>, tonic::Status> {
        let stream = self
            .0
            .select_variants_in_region(request.into_inner())
            .await?;
        Ok(tonic::Response::new(stream))
    }

    type SelectVariantsInRegionInSamplesStream = VariantStream;

    async fn select_variants_in_region_in_samples(
        &self,
        request: tonic::Request<pbs::SelectVariantsInRegionInSamplesRequest>,
    ) -> Result<tonic::Response<Self::SelectVariantsInRegionInSamplesStream>, tonic::Status> {
        let stream = self
            .0
            .select_variants_in_region_in_samples(request.into_inner())
            .await?;
        Ok(tonic::Response::new(stream))
    }

    type SelectDeNovoStream = VariantStream;

    async fn select_de_novo(
        &self,
        request: tonic::Request<pbs::SelectDeNovoRequest>,
    ) -> Result<tonic::Response<Self::SelectDeNovoStream>, tonic::Status> {
        let stream = self.0.select_de_novo(request.into_inner()).await?;
        Ok(tonic::Response::new(stream))
    }

    type SelectHetDominantStream = VariantStream;

    async fn select_het_dominant(
        &self,
        request: tonic::Request<pbs::SelectHetDominantRequest>,
    ) -> Result<tonic::Response<Self::SelectHetDominantStream>, tonic::Status> {
        let stream = self.0.select_het_dominant(request.into_inner()).await?;
        Ok(tonic::Response::new(stream))
    }

    type SelectHomRecessiveStream = VariantStream;

    async fn select_hom_recessive(
        &self,
        request: tonic::Request<pbs::SelectHomRecessiveRequest>,
    ) -> Result<tonic::Response<Self::SelectHomRecessiveStream>, tonic::Status> {
        let stream = self.0.select_hom_recessive(request.into_inner()).await?;
        Ok(tonic::Response::new(stream))
    }
}
