use std::sync::Arc;

use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::annotate::Annotator;
use crate::config::Config;
use crate::detection::{Detector, YoloDetector};
use crate::error::Result;
use crate::event::{ObjectRef, S3Event};
use crate::grouping::filename_from_key;
use crate::models::PipelineResult;
use crate::pipeline::PipelineOrchestrator;
use crate::provision::ModelProvisioner;
use crate::storage::{ObjectStore, decode_image, encode_image};

/// Serves one invocation per storage event: fetch, annotate, upload.
pub struct Handler<S: ObjectStore> {
    store: S,
    orchestrator: PipelineOrchestrator,
    output_bucket: String,
}

impl<S: ObjectStore> Handler<S> {
    pub fn new(store: S, orchestrator: PipelineOrchestrator, output_bucket: impl Into<String>) -> Self {
        Self {
            store,
            orchestrator,
            output_bucket: output_bucket.into(),
        }
    }

    /// One-time setup: provision weights, load both detectors and the label font
    pub async fn cold_start(store: S, config: &Config) -> Result<Self> {
        let provisioner = ModelProvisioner::new(&store, &config.model_bucket, &config.models_dir);
        let product_path = provisioner.ensure(&config.product_model).await?;
        let price_tag_path = provisioner.ensure(&config.price_tag_model).await?;

        let product: Arc<dyn Detector> = Arc::new(YoloDetector::load("Product", &product_path)?);
        let price_tag: Arc<dyn Detector> = Arc::new(YoloDetector::load("PriceTag", &price_tag_path)?);

        let annotator = Annotator::from_optional_font(config.font.as_deref())?;

        let orchestrator = PipelineOrchestrator::new(product, price_tag, annotator);
        Ok(Self::new(store, orchestrator, &config.output_bucket))
    }

    pub fn output_bucket(&self) -> &str {
        &self.output_bucket
    }

    /// Handle a storage notification; only the first record is processed
    pub async fn handle_event(&self, event: &S3Event) -> Result<PipelineResult> {
        let object = event.first_object()?;
        self.handle_object(&object).await
    }

    pub async fn handle_object(&self, object: &ObjectRef) -> Result<PipelineResult> {
        let span = info_span!(
            "invocation",
            id = %Uuid::new_v4(),
            bucket = %object.bucket,
            key = %object.key
        );

        let result = self.run(object).instrument(span.clone()).await;
        if let Err(e) = &result {
            span.in_scope(|| error!(error = %e, "invocation failed"));
        }
        result
    }

    async fn run(&self, object: &ObjectRef) -> Result<PipelineResult> {
        let filename = filename_from_key(&object.key);

        let bytes = self.store.get(&object.bucket, &object.key).await?;
        let source = decode_image(&object.key, &bytes)?;

        let annotated = self.orchestrator.process(&source, filename)?;
        let encoded = encode_image(&annotated.image, filename)?;

        self.store
            .put(&self.output_bucket, &annotated.output_key, encoded)
            .await?;

        info!(
            output_bucket = %self.output_bucket,
            output_key = %annotated.output_key,
            products = annotated.product_count,
            price_tags = annotated.price_tag_count,
            "annotated frame uploaded"
        );

        Ok(PipelineResult::saved(&self.output_bucket, &annotated.output_key))
    }
}
