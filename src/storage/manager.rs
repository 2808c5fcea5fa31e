use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::Value;
use tokio::sync::RwLock;

use super::{ImageStore, StoreInfo};

pub type SharedStore = Arc<dyn ImageStore>;

/// Store factory trait / 存储工厂 trait
pub trait StoreFactory: Send + Sync {
    /// Driver type name / 驱动类型名称
    fn driver_type(&self) -> &'static str;

    /// Friendly name shown in the platform's storage settings / 显示名称
    fn display_name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    /// Driver specific config items / 驱动配置项
    fn config_items(&self) -> Vec<super::ConfigItem>;

    /// Generate complete driver info / 生成完整的驱动信息
    fn store_info(&self) -> StoreInfo {
        StoreInfo {
            driver_type: self.driver_type().to_string(),
            display_name: self.display_name().to_string(),
            description: self.description().to_string(),
            items: self.config_items(),
        }
    }

    /// 创建存储实例（构造时即校验配置，失败不产生实例）
    fn create_store(&self, config: Value) -> Result<SharedStore>;
}

/// Store registry (manages all factories) / 存储注册表
///
/// The blogging platform registers the built-in factories at startup and
/// then constructs one store instance per configured backend. Instances
/// themselves are owned by the platform; re-configuring a backend means
/// creating a new instance, never mutating a live one.
#[derive(Clone)]
pub struct StoreRegistry {
    factories: Arc<RwLock<HashMap<String, Arc<Box<dyn StoreFactory>>>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register store factory / 注册存储工厂
    pub async fn register_factory(&self, factory: Box<dyn StoreFactory>) -> Result<()> {
        let driver_type = factory.driver_type().to_string();
        let mut factories = self.factories.write().await;
        factories.insert(driver_type.clone(), Arc::new(factory));

        tracing::info!("Store factory registered: {}", driver_type);
        Ok(())
    }

    /// Create a store instance from JSON config / 从JSON配置创建存储实例
    pub async fn create_store(&self, driver_type: &str, config: Value) -> Result<SharedStore> {
        let factories = self.factories.read().await;
        let factory = factories
            .get(driver_type)
            .ok_or_else(|| anyhow!("Store type not found: {}", driver_type))?;

        match factory.create_store(config) {
            Ok(store) => {
                tracing::info!("Store created: {}", driver_type);
                Ok(store)
            }
            Err(e) => {
                tracing::error!("Store creation failed: {} - {}", driver_type, e);
                Err(e)
            }
        }
    }

    /// List info of all registered drivers / 列出所有已注册驱动信息
    pub async fn store_infos(&self) -> Vec<StoreInfo> {
        let factories = self.factories.read().await;
        let mut infos: Vec<StoreInfo> = factories.values().map(|f| f.store_info()).collect();
        infos.sort_by(|a, b| a.driver_type.cmp(&b.driver_type));
        infos
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_all_and_create() {
        let registry = StoreRegistry::new();
        crate::drivers::register_all(&registry).await.unwrap();

        let infos = registry.store_infos().await;
        assert!(infos.iter().any(|i| i.driver_type == "s3"));

        let store = registry
            .create_store(
                "s3",
                json!({
                    "access_key_id": "AKIAEXAMPLE",
                    "secret_access_key": "secret",
                    "bucket": "blog-images",
                    "region": "us-east-1",
                }),
            )
            .await
            .unwrap();
        assert_eq!(store.name(), "S3");
    }

    #[tokio::test]
    async fn test_unknown_driver_type() {
        let registry = StoreRegistry::new();
        let err = registry.create_store("tape", json!({})).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_invalid_config_does_not_produce_a_store() {
        let registry = StoreRegistry::new();
        crate::drivers::register_all(&registry).await.unwrap();
        assert!(registry.create_store("s3", json!({})).await.is_err());
    }
}
