// ==========================================
// 库存目录导入引擎 - 物品服务
// ==========================================
// 职责:
// - 单个物品创建（自增资产编号）
// - 存量物品补齐资产编号 / 导入引用
// - 文件导入入口
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{GroupId, ImportSummary, Item, ItemCreate};
use crate::importer::{CancellationToken, ItemImporter, ItemImporterImpl};
use crate::repository::CatalogRepository;
use crate::service::error::{ServiceError, ServiceResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// 导入引用长度（v4 UUID 前缀）
const IMPORT_REF_LEN: usize = 8;

// ==========================================
// ItemService
// ==========================================
pub struct ItemService<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    repo: Arc<R>,
    config: Arc<C>,
    importer: ItemImporterImpl<R, Arc<C>>,
}

impl<R, C> ItemService<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    pub fn new(repo: Arc<R>, config: Arc<C>) -> Self {
        let importer = ItemImporterImpl::new(Arc::clone(&repo), Arc::clone(&config));
        Self {
            repo,
            config,
            importer,
        }
    }

    /// 创建物品
    ///
    /// 自增开启时忽略传入编号, 使用 高水位 + 1。
    #[instrument(skip(self, create), fields(group_id = %group_id))]
    pub async fn create_item(&self, group_id: GroupId, mut create: ItemCreate) -> ServiceResult<Item> {
        if self.config.auto_increment_asset_id().await? {
            let highest = self.repo.get_highest_asset_id(group_id).await?;
            create.asset_id = highest
                .next()
                .ok_or(ServiceError::AssetIdExhausted(highest))?;
        }

        let item = self.repo.create_item(group_id, create).await?;
        if item.id.is_nil() {
            return Err(ServiceError::InternalConsistency(
                "创建后物品 ID 为空".to_string(),
            ));
        }

        info!(item_id = %item.id, asset_id = %item.asset_id, "物品已创建");
        Ok(item)
    }

    /// 为所有未设置资产编号的物品依次分配编号
    ///
    /// # 返回
    /// - 被分配编号的物品数
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn ensure_asset_ids(&self, group_id: GroupId) -> ServiceResult<usize> {
        let items = self.repo.get_items_with_unset_asset_id(group_id).await?;
        let mut highest = self.repo.get_highest_asset_id(group_id).await?;

        let mut finished = 0;
        for item in items {
            highest = highest
                .next()
                .ok_or(ServiceError::AssetIdExhausted(highest))?;
            self.repo.set_asset_id(group_id, item.id, highest).await?;
            finished += 1;
        }

        info!(finished, high_water_mark = %highest, "资产编号补齐完成");
        Ok(finished)
    }

    /// 为所有缺少导入引用的物品生成引用
    ///
    /// # 返回
    /// - 被设置引用的物品数
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn ensure_import_refs(&self, group_id: GroupId) -> ServiceResult<usize> {
        let ids = self.repo.get_item_ids_without_import_ref(group_id).await?;

        let mut finished = 0;
        for item_id in ids {
            let reference = new_import_ref();
            self.repo.set_import_ref(group_id, item_id, &reference).await?;
            finished += 1;
        }

        info!(finished, "导入引用补齐完成");
        Ok(finished)
    }

    /// 从文件导入物品
    pub async fn import_file(
        &self,
        group_id: GroupId,
        file_path: &Path,
        cancel: &CancellationToken,
    ) -> ServiceResult<ImportSummary> {
        Ok(self
            .importer
            .import_from_file(group_id, file_path, cancel)
            .await?)
    }

    /// 底层导入器（已映射行的导入入口）
    pub fn importer(&self) -> &ItemImporterImpl<R, Arc<C>> {
        &self.importer
    }
}

fn new_import_ref() -> String {
    let mut reference = Uuid::new_v4().to_string();
    reference.truncate(IMPORT_REF_LEN);
    reference
}
