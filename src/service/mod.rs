// ==========================================
// 库存目录导入引擎 - 服务层
// ==========================================
// 职责: 面向调用方的物品操作入口（导入 / 编号维护）
// ==========================================

pub mod error;
pub mod item_service;

pub use error::{ServiceError, ServiceResult};
pub use item_service::ItemService;
