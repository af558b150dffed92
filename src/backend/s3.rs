use super::BlobBackend;
use crate::stream::ByteStream;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream as S3Body;
use aws_sdk_s3::{config::Region, Client as S3Client};
use futures_util::StreamExt;

/// S3-compatible object store (R2, Spaces, MinIO) holding card images.
pub struct S3BlobClient {
    client: S3Client,
    bucket: String,
}

impl S3BlobClient {
    pub async fn new(
        access_key_id: String,
        secret_access_key: String,
        endpoint: Option<String>,
        region: String,
        bucket: String,
    ) -> Result<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "trading-card-blob-store",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        // R2 and MinIO expect bucket-in-path addressing.
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: S3Client::from_conf(config),
            bucket,
        })
    }
}

fn body_stream(body: S3Body) -> ByteStream {
    futures_util::stream::unfold(body, |mut body| async move {
        body.next().await.map(|chunk| {
            (
                chunk.map_err(|e| Error::StreamRead(format!("Failed to read object body: {}", e))),
                body,
            )
        })
    })
    .boxed()
}

#[async_trait]
impl BlobBackend for S3BlobClient {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        tracing::debug!("Uploading {} bytes to s3://{}/{}", data.len(), self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(S3Body::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                Error::Backend(format!("Failed to upload object: {}", DisplayErrorContext(&e)))
            })?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<ByteStream>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match response {
            Ok(output) => Ok(Some(body_stream(output.body))),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                tracing::debug!("Object s3://{}/{} not found", self.bucket, key);
                Ok(None)
            }
            Err(err) => Err(Error::Backend(format!(
                "Failed to read object: {}",
                DisplayErrorContext(&err)
            ))),
        }
    }
}
