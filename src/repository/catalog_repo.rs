// ==========================================
// 库存目录导入引擎 - 目录 Repository Trait
// ==========================================
// 职责: 定义位置/标签/物品的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD 与查询
// ==========================================

use crate::domain::{
    AssetId, GroupId, Item, ItemCreate, ItemId, ItemUpdate, Label, LabelCreate, Location,
    LocationCreate, LocationTreeNode,
};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CatalogRepository Trait
// ==========================================
// 用途: 导入引擎与物品服务的数据访问
// 实现者: CatalogRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // ===== 标签 =====

    /// 查询作用域内全部标签
    async fn get_all_labels(&self, group_id: GroupId) -> RepositoryResult<Vec<Label>>;

    /// 创建标签
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 同名标签已存在
    async fn create_label(&self, group_id: GroupId, label: LabelCreate) -> RepositoryResult<Label>;

    /// 统计标签数
    async fn count_labels(&self, group_id: GroupId) -> RepositoryResult<usize>;

    // ===== 位置 =====

    /// 查询作用域内完整位置树（森林，按名称排序）
    async fn get_location_tree(&self, group_id: GroupId) -> RepositoryResult<Vec<LocationTreeNode>>;

    /// 创建位置
    ///
    /// # 返回
    /// - Err(ForeignKeyViolation): parent_id 不存在
    async fn create_location(
        &self,
        group_id: GroupId,
        location: LocationCreate,
    ) -> RepositoryResult<Location>;

    /// 统计位置数
    async fn count_locations(&self, group_id: GroupId) -> RepositoryResult<usize>;

    // ===== 物品：导入引用 =====

    /// 检查导入引用是否已存在
    async fn item_exists_by_reference(
        &self,
        group_id: GroupId,
        import_ref: &str,
    ) -> RepositoryResult<bool>;

    /// 按导入引用查询物品
    ///
    /// # 返回
    /// - Err(NotFound): 引用不存在
    async fn get_item_by_reference(&self, group_id: GroupId, import_ref: &str)
        -> RepositoryResult<Item>;

    /// 查询没有导入引用的物品 ID
    async fn get_item_ids_without_import_ref(&self, group_id: GroupId)
        -> RepositoryResult<Vec<ItemId>>;

    /// 设置导入引用
    async fn set_import_ref(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        import_ref: &str,
    ) -> RepositoryResult<()>;

    // ===== 物品：资产编号 =====

    /// 作用域内最大资产编号（无物品时为 0）
    async fn get_highest_asset_id(&self, group_id: GroupId) -> RepositoryResult<AssetId>;

    /// 资产编号未设置的物品（按创建时间排序）
    async fn get_items_with_unset_asset_id(&self, group_id: GroupId) -> RepositoryResult<Vec<Item>>;

    /// 设置资产编号
    async fn set_asset_id(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        asset_id: AssetId,
    ) -> RepositoryResult<()>;

    // ===== 物品：CRUD =====

    /// 按 ID 查询物品
    async fn get_item(&self, group_id: GroupId, item_id: ItemId) -> RepositoryResult<Item>;

    /// 创建物品（仅最小字段）
    async fn create_item(&self, group_id: GroupId, item: ItemCreate) -> RepositoryResult<Item>;

    /// 全字段覆写物品（含标签关联与自定义字段）
    async fn update_item(&self, group_id: GroupId, item: ItemUpdate) -> RepositoryResult<Item>;

    /// 统计物品数
    async fn count_items(&self, group_id: GroupId) -> RepositoryResult<usize>;
}
