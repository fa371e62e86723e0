// ==========================================
// 库存目录导入引擎 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::sync::Arc;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）, StaticImportConfig（固定值）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 是否为未设置资产编号的物品自动分配编号
    ///
    /// # 默认值
    /// - true
    async fn auto_increment_asset_id(&self) -> ImportResult<bool>;
}

/// 固定值配置（测试与嵌入场景）
#[derive(Debug, Clone, Copy)]
pub struct StaticImportConfig {
    pub auto_increment_asset_id: bool,
}

impl Default for StaticImportConfig {
    fn default() -> Self {
        Self {
            auto_increment_asset_id: true,
        }
    }
}

#[async_trait]
impl ImportConfigReader for StaticImportConfig {
    async fn auto_increment_asset_id(&self) -> ImportResult<bool> {
        Ok(self.auto_increment_asset_id)
    }
}

#[async_trait]
impl<T> ImportConfigReader for Arc<T>
where
    T: ImportConfigReader + ?Sized,
{
    async fn auto_increment_asset_id(&self) -> ImportResult<bool> {
        (**self).auto_increment_asset_id().await
    }
}
