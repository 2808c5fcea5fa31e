//! S3图片存储驱动
//!
//! 将博客平台上传的图片写入S3存储桶，并把已存对象回源到HTTP响应。

pub mod config;
pub mod driver;
pub mod factory;

pub use config::S3Config;
pub use driver::S3ImageStore;
pub use factory::S3StoreFactory;
