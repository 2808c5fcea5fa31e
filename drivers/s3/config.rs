//! S3驱动配置

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// S3配置
///
/// The four credential/bucket fields are all required; validation runs
/// once, when the store is constructed, so an instance with an
/// incomplete configuration never exists and no operation has to
/// re-check at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Access Key ID
    pub access_key_id: String,
    /// Secret Access Key
    pub secret_access_key: String,
    /// 存储桶名称
    pub bucket: String,
    /// 区域，如 us-east-1
    pub region: String,
    /// S3端点地址，留空时使用 https://s3.{region}.amazonaws.com
    /// MinIO: http://localhost:9000
    #[serde(default)]
    pub endpoint: String,
    /// 强制使用路径风格（而非虚拟主机风格）
    /// MinIO等需要设置为true
    #[serde(default)]
    pub force_path_style: bool,
}

impl S3Config {
    /// Reject any configuration with an empty required field / 校验必填项
    pub fn validate(&self) -> Result<(), StoreError> {
        let required = [
            ("access_key_id", &self.access_key_id),
            ("secret_access_key", &self.secret_access_key),
            ("bucket", &self.bucket),
            ("region", &self.region),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(StoreError::Config { field });
            }
        }
        Ok(())
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket: String::new(),
            region: String::new(),
            endpoint: String::new(),
            force_path_style: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> S3Config {
        S3Config {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            bucket: "blog-images".to_string(),
            region: "us-east-1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_config_is_valid() {
        assert!(full().validate().is_ok());
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        let blank = |f: fn(&mut S3Config)| {
            let mut config = full();
            f(&mut config);
            config
        };
        let cases = [
            (blank(|c| c.access_key_id.clear()), "access_key_id"),
            (blank(|c| c.secret_access_key.clear()), "secret_access_key"),
            (blank(|c| c.bucket.clear()), "bucket"),
            (blank(|c| c.region = "   ".to_string()), "region"),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(StoreError::Config { field }) => assert_eq!(field, expected),
                other => panic!("expected Config error for {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_endpoint_defaults_from_json() {
        let config: S3Config = serde_json::from_str(
            r#"{"access_key_id":"a","secret_access_key":"s","bucket":"b","region":"us-east-1"}"#,
        )
        .unwrap();
        assert!(config.endpoint.is_empty());
        assert!(!config.force_path_style);
        assert!(config.validate().is_ok());
    }
}
