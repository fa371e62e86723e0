// ==========================================
// 库存目录导入引擎 - 配置层
// ==========================================
// 职责: 导入相关配置读取, 支持环境变量覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ImportConfigReader, StaticImportConfig};
