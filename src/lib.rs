// ==========================================
// 库存目录导入引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 表格数据 → 位置树 / 标签 / 物品 的批量对账导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格解析与对账
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 服务层 - 调用方入口
pub mod service;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AssetId, GroupId, ImportRow, ImportSummary, Item, ItemCreate, ItemId, ItemUpdate, Label,
    LabelId, Location, LocationId, LocationTreeNode, RowViolation,
};

// 仓储
pub use repository::{CatalogRepository, CatalogRepositoryImpl, RepositoryError};

// 导入
pub use importer::{CancellationToken, ImportError, ItemImporter, ItemImporterImpl};

// 配置
pub use config::{ConfigManager, ImportConfigReader};

// 服务
pub use service::{ItemService, ServiceError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存目录导入引擎";
