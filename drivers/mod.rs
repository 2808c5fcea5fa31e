// Driver package / 驱动包
pub mod s3;

use crate::storage::StoreRegistry;

/// Register all drivers to StoreRegistry / 注册所有驱动
pub async fn register_all(registry: &StoreRegistry) -> anyhow::Result<()> {
    // Register S3 driver / 注册S3对象存储驱动
    registry.register_factory(Box::new(s3::S3StoreFactory)).await?;
    Ok(())
}
