//! S3驱动核心实现
//!
//! 设计原则：
//! - save: 整文件读入内存后单次PUT，不重试（可接受的大小受内存限制）
//! - open: 先HEAD取对象元数据，再以流的方式转发对象内容
//! - 构造时校验配置并创建客户端，之后所有请求复用同一个客户端

use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use chrono::Utc;
use futures::StreamExt;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::serde_types::HeadObjectResult;
use s3::Region;

use crate::error::StoreError;
use crate::storage::{naming, ImageStore, ImageUpload, StoredObject};
use super::config::S3Config;

/// Uploaded images are world-readable by contract: the platform links to
/// them directly from rendered posts.
const UPLOAD_ACL: &str = "public-read";

/// Cache-Control stored on every uploaded object. The value is the
/// historical `1000*365*24*60*60` literal; it must stay in step with the
/// metadata already written on existing objects in the bucket.
const UPLOAD_CACHE_CONTROL: &str = "max-age=31536000000";

/// S3驱动
pub struct S3ImageStore {
    config: S3Config,
    /// Plain client for HEAD/GET / 读取客户端
    bucket: Box<Bucket>,
    /// Upload client carrying the fixed ACL and cache headers / 上传客户端
    upload_bucket: Box<Bucket>,
}

impl S3ImageStore {
    /// 创建新的S3存储实例（配置不完整立即失败，不发起任何I/O）
    pub fn new(config: S3Config) -> Result<Self, StoreError> {
        config.validate()?;
        let bucket = Self::create_bucket(&config)?;

        let mut upload_bucket = bucket.clone();
        upload_bucket.add_header("x-amz-acl", UPLOAD_ACL);
        upload_bucket.add_header("cache-control", UPLOAD_CACHE_CONTROL);

        Ok(Self {
            config,
            bucket,
            upload_bucket,
        })
    }

    /// 创建S3 Bucket客户端
    fn create_bucket(config: &S3Config) -> Result<Box<Bucket>, StoreError> {
        let credentials = Credentials::new(
            Some(&config.access_key_id),
            Some(&config.secret_access_key),
            None,
            None,
            None,
        )?;

        let region = if config.endpoint.is_empty() {
            Region::Custom {
                region: config.region.clone(),
                endpoint: format!("https://s3.{}.amazonaws.com", config.region),
            }
        } else {
            Region::Custom {
                region: config.region.clone(),
                endpoint: config.endpoint.clone(),
            }
        };

        let bucket = Bucket::new(&config.bucket, region, credentials)?;
        let bucket = if config.force_path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(bucket)
    }

    /// Public URL of a stored object / 已存对象的外链
    ///
    /// 格式与既有外链保持逐字节一致，已发布文章中的引用依赖它。
    pub fn public_url(&self, key: &str) -> String {
        format!("https://s3.amazonaws.com/{}/{}", self.config.bucket, key)
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    fn name(&self) -> &str {
        "S3"
    }

    async fn save(&self, upload: &ImageUpload) -> Result<String, StoreError> {
        let key = naming::target_key(&upload.name, Utc::now());

        // Whole file buffered before transfer; acceptable upload size is
        // bounded by available memory.
        let body = tokio::fs::read(&upload.path)
            .await
            .map_err(|e| StoreError::File {
                path: upload.path.clone(),
                source: e,
            })?;

        match self
            .upload_bucket
            .put_object_with_content_type(&key, &body, &upload.content_type)
            .await
        {
            Ok(_) => {
                let url = self.public_url(&key);
                tracing::info!(
                    "uploaded {} ({} bytes) to {}",
                    upload.path.display(),
                    body.len(),
                    url
                );
                Ok(url)
            }
            Err(e) => {
                tracing::error!("S3 put failed for {}: {}", key, e);
                Err(StoreError::Backend(e))
            }
        }
    }

    async fn open(&self, key: &str) -> Result<StoredObject, StoreError> {
        // Stage one: object metadata, or a typed error before any body
        // bytes move.
        let (head, code) = self.bucket.head_object(key).await?;
        if code != 200 {
            return Err(StoreError::NotFound {
                key: key.to_string(),
            });
        }

        // Stage two: the body as a stream, errors mapped into ours.
        let stream = self.bucket.get_object_stream(key).await?;
        let body = stream
            .bytes
            .map(|chunk| chunk.map_err(StoreError::from))
            .boxed();

        Ok(StoredObject {
            headers: object_headers(&head),
            body,
        })
    }
}

/// Rebuild the HTTP headers an object was stored with / 重建对象响应头
fn object_headers(head: &HeadObjectResult) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let text_headers: [(HeaderName, &Option<String>); 9] = [
        (header::CONTENT_TYPE, &head.content_type),
        (header::CACHE_CONTROL, &head.cache_control),
        (header::CONTENT_ENCODING, &head.content_encoding),
        (header::CONTENT_DISPOSITION, &head.content_disposition),
        (header::CONTENT_LANGUAGE, &head.content_language),
        (header::ETAG, &head.e_tag),
        (header::LAST_MODIFIED, &head.last_modified),
        (header::EXPIRES, &head.expires),
        (header::ACCEPT_RANGES, &head.accept_ranges),
    ];
    for (name, value) in text_headers {
        if let Some(value) = value {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
    }

    if let Some(len) = head.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    // User metadata travels as x-amz-meta-* request headers and comes
    // back the same way on a plain GET.
    if let Some(metadata) = &head.metadata {
        for (key, value) in metadata {
            let name = format!("x-amz-meta-{}", key.to_ascii_lowercase());
            if let (Ok(name), Ok(value)) =
                (HeaderName::try_from(name), HeaderValue::from_str(value))
            {
                headers.insert(name, value);
            }
        }
    }

    headers
}
