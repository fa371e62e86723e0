// ==========================================
// 库存目录导入引擎 - 服务层错误类型
// ==========================================
// 职责: 合并仓储错误与导入错误, 供调用方统一处理
// ==========================================

use crate::domain::AssetId;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("数据访问失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("资产编号已达上限, 无法继续分配 (当前高水位: {0})")]
    AssetIdExhausted(AssetId),

    #[error("内部一致性错误: {0}")]
    InternalConsistency(String),
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;
