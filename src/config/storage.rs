use crate::error::{BadEnvVarSnafu, S3CredsSnafu, S3Snafu, ShowcaseResult};
use dotenvy::var;
use s3::{Bucket, Region, creds::Credentials};
use snafu::ResultExt;
use std::sync::Arc;

pub const DEFAULT_BUCKET_NAME: &str = "student-images";

#[derive(Debug)]
pub struct StorageConfig {
    bucket: Arc<Bucket>,
    public_base: String,
}

impl StorageConfig {
    pub fn new() -> ShowcaseResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        let bucket_name = var("S3_BUCKET_NAME").unwrap_or_else(|_| DEFAULT_BUCKET_NAME.to_string());
        let region = Region::Custom {
            region: get_env_var("S3_REGION")?,
            endpoint: get_env_var("S3_ENDPOINT")?,
        };
        let credentials = Credentials::new(
            Some(&get_env_var("S3_ACCESS_KEY_ID")?),
            Some(&get_env_var("S3_SECRET_ACCESS_KEY")?),
            None,
            None,
            None,
        )
        .context(S3CredsSnafu)?;

        let bucket = Bucket::new(&bucket_name, region, credentials)
            .context(S3Snafu)?
            .with_path_style();

        //eg. a CDN in front of the bucket
        let public_base = var("S3_PUBLIC_URL").unwrap_or_else(|_| bucket.url());

        info!(%bucket_name, %public_base, "Configured photo storage");

        Ok(Self::from_parts(bucket, &public_base))
    }

    pub fn from_parts(bucket: Box<Bucket>, public_base: &str) -> Self {
        Self {
            bucket: Arc::from(bucket),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn bucket(&self) -> Arc<Bucket> {
        self.bucket.clone()
    }

    pub fn public_base(&self) -> &str {
        &self.public_base
    }
}
