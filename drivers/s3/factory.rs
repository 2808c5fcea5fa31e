//! S3驱动工厂

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::Arc;

use crate::storage::{ConfigItem, SharedStore, StoreFactory};
use super::config::S3Config;
use super::driver::S3ImageStore;

/// S3驱动工厂
pub struct S3StoreFactory;

impl StoreFactory for S3StoreFactory {
    fn driver_type(&self) -> &'static str {
        "s3"
    }

    fn display_name(&self) -> &'static str {
        "S3 Storage"
    }

    fn description(&self) -> &'static str {
        "Uploads post images to an S3 bucket and serves them back"
    }

    fn config_items(&self) -> Vec<ConfigItem> {
        vec![
            ConfigItem::new("access_key_id", "string")
                .title("Access Key ID")
                .required(),
            ConfigItem::new("secret_access_key", "password")
                .title("Secret Access Key")
                .required(),
            ConfigItem::new("bucket", "string")
                .title("存储桶名称")
                .help("S3存储桶名称")
                .required(),
            ConfigItem::new("region", "string")
                .title("区域")
                .help("S3区域，如 us-east-1")
                .required(),
            ConfigItem::new("endpoint", "string")
                .title("端点地址")
                .help("S3端点URL，留空使用AWS区域端点（MinIO: http://localhost:9000）"),
            ConfigItem::new("force_path_style", "bool")
                .title("强制路径风格")
                .help("MinIO等需要开启此选项")
                .default("false"),
        ]
    }

    fn create_store(&self, config: Value) -> Result<SharedStore> {
        let config: S3Config = serde_json::from_value(config)
            .map_err(|e| anyhow!("配置解析失败: {}", e))?;
        Ok(Arc::new(S3ImageStore::new(config)?))
    }
}
