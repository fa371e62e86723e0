// ==========================================
// 库存目录导入引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、标识类型、导入行模型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod catalog;
pub mod import;
pub mod item;
pub mod types;

// 重导出核心类型
pub use catalog::{assemble_forest, Label, LabelCreate, Location, LocationCreate, LocationTreeNode};
pub use import::{ImportRow, ImportSummary, RowField, RowViolation};
pub use item::{Item, ItemCreate, ItemField, ItemUpdate};
pub use types::{AssetId, GroupId, ItemId, LabelId, LocationId};
