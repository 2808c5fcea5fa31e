use std::path::PathBuf;

use async_trait::async_trait;
use axum::http::HeaderMap;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub mod manager;
pub mod naming;

pub use manager::{SharedStore, StoreFactory, StoreRegistry};

/// An image handed to the store for upload / 待上传的图片
///
/// The caller owns the temporary file at `path` and is responsible for
/// cleaning it up; the store only reads it. `name` is the filename the
/// author gave the image and is used solely to derive the target key's
/// stem and extension.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub path: PathBuf,
    pub name: String,
    pub content_type: String,
}

/// Byte stream of a stored object's body / 对象内容字节流
pub type ObjectStream = BoxStream<'static, Result<Bytes, StoreError>>;

/// A stored object ready to be served / 可直接回应的已存对象
///
/// `headers` are reconstructed from the backend's object metadata
/// (content type, length, cache headers, etag...). `body` streams the
/// object bytes as they arrive from the backend; dropping the value
/// releases the backend stream on every exit path.
pub struct StoredObject {
    pub headers: HeaderMap,
    pub body: ObjectStream,
}

/// Image store interface (provides only the two platform primitives) / 图片存储接口
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store name / 存储名称
    fn name(&self) -> &str;

    /// Upload one image and return its public URL / 上传图片并返回外链
    ///
    /// Single-attempt semantics: one PUT, no retry, no backoff. On
    /// success exactly one object exists in the bucket; on failure none.
    async fn save(&self, upload: &ImageUpload) -> Result<String, StoreError>;

    /// Open a previously stored object for serving / 打开已存对象
    ///
    /// Two stages: first acquire the object's stored metadata (or fail
    /// with a typed error, before any body bytes move), then expose the
    /// body as a stream.
    async fn open(&self, key: &str) -> Result<StoredObject, StoreError>;
}

/// Configuration item definition / 配置项定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigItem {
    pub name: String,
    /// Display title (friendly name) / 显示标题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl ConfigItem {
    pub fn new(name: &str, item_type: &str) -> Self {
        Self {
            name: name.to_string(),
            title: None,
            item_type: item_type.to_string(),
            default: None,
            required: false,
            help: None,
        }
    }

    pub fn title(mut self, val: &str) -> Self {
        self.title = Some(val.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, val: &str) -> Self {
        self.default = Some(val.to_string());
        self
    }

    pub fn help(mut self, val: &str) -> Self {
        self.help = Some(val.to_string());
        self
    }
}

/// Store driver information exposed to the platform / 驱动信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    pub driver_type: String,
    pub display_name: String,
    pub description: String,
    pub items: Vec<ConfigItem>,
}
