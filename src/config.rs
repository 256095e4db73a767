use std::path::PathBuf;

use clap::Args;

pub const DEFAULT_OUTPUT_BUCKET: &str = "bbox-frames-1";
pub const DEFAULT_MODEL_BUCKET: &str = "model-bucket-22";
pub const DEFAULT_MODELS_DIR: &str = "/var/task/models";
pub const DEFAULT_PRODUCT_MODEL: &str = "product_best.rten";
pub const DEFAULT_PRICE_TAG_MODEL: &str = "pricetag_best.rten";

/// Runtime configuration, read from flags or `SHELFSCAN_*` environment variables
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Root directory of the object store (one subdirectory per bucket)
    #[arg(long, env = "SHELFSCAN_STORE_ROOT", default_value = ".")]
    pub store_root: PathBuf,

    /// Bucket annotated frames are written to
    #[arg(long, env = "SHELFSCAN_OUTPUT_BUCKET", default_value = DEFAULT_OUTPUT_BUCKET)]
    pub output_bucket: String,

    /// Bucket holding model weights
    #[arg(long, env = "SHELFSCAN_MODEL_BUCKET", default_value = DEFAULT_MODEL_BUCKET)]
    pub model_bucket: String,

    /// Local directory weights are provisioned into
    #[arg(long, env = "SHELFSCAN_MODELS_DIR", default_value = DEFAULT_MODELS_DIR)]
    pub models_dir: PathBuf,

    /// Product detector artifact name
    #[arg(long, env = "SHELFSCAN_PRODUCT_MODEL", default_value = DEFAULT_PRODUCT_MODEL)]
    pub product_model: String,

    /// PriceTag detector artifact name
    #[arg(long, env = "SHELFSCAN_PRICE_TAG_MODEL", default_value = DEFAULT_PRICE_TAG_MODEL)]
    pub price_tag_model: String,

    /// Font used for box labels; the built-in font when unset
    #[arg(long, env = "SHELFSCAN_FONT")]
    pub font: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from("."),
            output_bucket: DEFAULT_OUTPUT_BUCKET.to_string(),
            model_bucket: DEFAULT_MODEL_BUCKET.to_string(),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            product_model: DEFAULT_PRODUCT_MODEL.to_string(),
            price_tag_model: DEFAULT_PRICE_TAG_MODEL.to_string(),
            font: None,
        }
    }
}
