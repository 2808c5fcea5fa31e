pub mod error;
pub mod serve;
pub mod storage;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use error::StoreError;
pub use serve::serve_stored;
pub use storage::{ImageStore, ImageUpload, SharedStore, StoreRegistry, StoredObject};

// Register all image store drivers (call unified registration function from drivers module) / 注册所有图片存储驱动
pub async fn register_image_stores(registry: &storage::StoreRegistry) -> anyhow::Result<()> {
    drivers::register_all(registry).await
}
