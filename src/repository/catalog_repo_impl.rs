// ==========================================
// 库存目录导入引擎 - 目录 Repository 实现
// ==========================================
// 职责: 实现 CatalogRepository（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

mod core;
mod items;

#[cfg(test)]
mod tests;

pub use self::core::CatalogRepositoryImpl;

use crate::domain::{
    AssetId, GroupId, Item, ItemCreate, ItemId, ItemUpdate, Label, LabelCreate, Location,
    LocationCreate, LocationTreeNode,
};
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    async fn get_all_labels(&self, group_id: GroupId) -> RepositoryResult<Vec<Label>> {
        self.list_labels(group_id)
    }

    async fn create_label(&self, group_id: GroupId, label: LabelCreate) -> RepositoryResult<Label> {
        self.insert_label(group_id, label)
    }

    async fn count_labels(&self, group_id: GroupId) -> RepositoryResult<usize> {
        self.count_in_group("labels", group_id)
    }

    async fn get_location_tree(&self, group_id: GroupId) -> RepositoryResult<Vec<LocationTreeNode>> {
        self.load_location_tree(group_id)
    }

    async fn create_location(
        &self,
        group_id: GroupId,
        location: LocationCreate,
    ) -> RepositoryResult<Location> {
        self.insert_location(group_id, location)
    }

    async fn count_locations(&self, group_id: GroupId) -> RepositoryResult<usize> {
        self.count_in_group("locations", group_id)
    }

    async fn item_exists_by_reference(
        &self,
        group_id: GroupId,
        import_ref: &str,
    ) -> RepositoryResult<bool> {
        self.reference_exists(group_id, import_ref)
    }

    async fn get_item_by_reference(
        &self,
        group_id: GroupId,
        import_ref: &str,
    ) -> RepositoryResult<Item> {
        self.find_item_by_reference(group_id, import_ref)
    }

    async fn get_item_ids_without_import_ref(
        &self,
        group_id: GroupId,
    ) -> RepositoryResult<Vec<ItemId>> {
        self.find_ids_without_import_ref(group_id)
    }

    async fn set_import_ref(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        import_ref: &str,
    ) -> RepositoryResult<()> {
        self.write_import_ref(group_id, item_id, import_ref)
    }

    async fn get_highest_asset_id(&self, group_id: GroupId) -> RepositoryResult<AssetId> {
        self.highest_asset_id(group_id)
    }

    async fn get_items_with_unset_asset_id(&self, group_id: GroupId) -> RepositoryResult<Vec<Item>> {
        self.find_items_with_unset_asset_id(group_id)
    }

    async fn set_asset_id(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        asset_id: AssetId,
    ) -> RepositoryResult<()> {
        self.write_asset_id(group_id, item_id, asset_id)
    }

    async fn get_item(&self, group_id: GroupId, item_id: ItemId) -> RepositoryResult<Item> {
        self.find_item(group_id, item_id)
    }

    async fn create_item(&self, group_id: GroupId, item: ItemCreate) -> RepositoryResult<Item> {
        self.insert_item(group_id, item)
    }

    async fn update_item(&self, group_id: GroupId, item: ItemUpdate) -> RepositoryResult<Item> {
        self.overwrite_item(group_id, item)
    }

    async fn count_items(&self, group_id: GroupId) -> RepositoryResult<usize> {
        self.count_in_group("items", group_id)
    }
}
