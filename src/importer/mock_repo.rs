// ==========================================
// 测试用内存目录仓储
// ==========================================
// 用途: 导入组件单元测试（统计创建次数 / 注入故障）
// ==========================================

use crate::domain::{
    assemble_forest, AssetId, GroupId, Item, ItemCreate, ItemId, ItemUpdate, Label, LabelCreate,
    LabelId, Location, LocationCreate, LocationId, LocationTreeNode,
};
use crate::repository::{CatalogRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    labels: Vec<(GroupId, Label)>,
    locations: Vec<(GroupId, Location)>,
    items: Vec<(GroupId, Item)>,

    // 调用记录
    created_labels: Vec<String>,
    created_locations: Vec<LocationCreate>,
    created_items: usize,
    updated_items: Vec<ItemUpdate>,

    // 故障注入
    fail_lookups: bool,
    fail_location_create: bool,
    fail_item_create: bool,
    nil_item_ids: bool,
}

#[derive(Default)]
pub struct MockCatalogRepository {
    state: Mutex<MockState>,
}

impl MockCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== 预置数据（不计入创建次数）=====

    pub async fn seed_label(&self, group_id: GroupId, label: LabelCreate) -> LabelId {
        let mut state = self.state.lock().unwrap();
        let id = LabelId::new();
        state.labels.push((
            group_id,
            Label {
                id,
                name: label.name,
                created_at: Utc::now(),
            },
        ));
        id
    }

    pub async fn seed_location(&self, group_id: GroupId, location: LocationCreate) -> LocationId {
        let mut state = self.state.lock().unwrap();
        let id = LocationId::new();
        state.locations.push((
            group_id,
            Location {
                id,
                name: location.name,
                parent_id: location.parent_id,
                created_at: Utc::now(),
            },
        ));
        id
    }

    pub async fn seed_item(&self, group_id: GroupId, create: ItemCreate) -> Item {
        let mut state = self.state.lock().unwrap();
        let item = new_item(create);
        state.items.push((group_id, item.clone()));
        item
    }

    // ===== 故障注入 =====

    pub fn fail_lookups(&self) {
        self.state.lock().unwrap().fail_lookups = true;
    }

    pub fn fail_location_create(&self) {
        self.state.lock().unwrap().fail_location_create = true;
    }

    pub fn fail_item_create(&self) {
        self.state.lock().unwrap().fail_item_create = true;
    }

    pub fn return_nil_item_ids(&self) {
        self.state.lock().unwrap().nil_item_ids = true;
    }

    // ===== 调用记录 =====

    pub fn created_labels(&self) -> Vec<String> {
        self.state.lock().unwrap().created_labels.clone()
    }

    pub fn created_locations(&self) -> Vec<LocationCreate> {
        self.state.lock().unwrap().created_locations.clone()
    }

    pub fn created_item_count(&self) -> usize {
        self.state.lock().unwrap().created_items
    }

    pub fn updates(&self) -> Vec<ItemUpdate> {
        self.state.lock().unwrap().updated_items.clone()
    }

    pub fn items(&self, group_id: GroupId) -> Vec<Item> {
        self.state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|(g, _)| *g == group_id)
            .map(|(_, item)| item.clone())
            .collect()
    }

    /// 由位置 ID 反推完整路径
    pub fn location_path(&self, id: LocationId) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let by_id: HashMap<LocationId, &Location> =
            state.locations.iter().map(|(_, l)| (l.id, l)).collect();

        let mut path = Vec::new();
        let mut cursor = by_id.get(&id).copied();
        while let Some(loc) = cursor {
            path.push(loc.name.clone());
            cursor = loc.parent_id.and_then(|p| by_id.get(&p).copied());
        }
        path.reverse();
        path
    }
}

fn new_item(create: ItemCreate) -> Item {
    let now = Utc::now();
    Item {
        id: ItemId::new(),
        asset_id: create.asset_id,
        import_ref: create.import_ref,
        name: create.name,
        description: create.description,
        quantity: 1,
        insured: false,
        archived: false,
        location_id: Some(create.location_id),
        label_ids: create.label_ids,
        purchase_price: 0.0,
        purchase_from: String::new(),
        purchase_time: None,
        manufacturer: String::new(),
        model_number: String::new(),
        serial_number: String::new(),
        lifetime_warranty: false,
        warranty_expires: None,
        warranty_details: String::new(),
        sold_to: String::new(),
        sold_price: 0.0,
        sold_time: None,
        sold_notes: String::new(),
        notes: String::new(),
        fields: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn lookup_failure() -> RepositoryError {
    RepositoryError::DatabaseConnectionError("mock lookup failure".to_string())
}

#[async_trait]
impl CatalogRepository for MockCatalogRepository {
    async fn get_all_labels(&self, group_id: GroupId) -> RepositoryResult<Vec<Label>> {
        let state = self.state.lock().unwrap();
        if state.fail_lookups {
            return Err(lookup_failure());
        }
        Ok(state
            .labels
            .iter()
            .filter(|(g, _)| *g == group_id)
            .map(|(_, l)| l.clone())
            .collect())
    }

    async fn create_label(&self, group_id: GroupId, label: LabelCreate) -> RepositoryResult<Label> {
        let mut state = self.state.lock().unwrap();
        let created = Label {
            id: LabelId::new(),
            name: label.name.clone(),
            created_at: Utc::now(),
        };
        state.created_labels.push(label.name);
        state.labels.push((group_id, created.clone()));
        Ok(created)
    }

    async fn count_labels(&self, group_id: GroupId) -> RepositoryResult<usize> {
        Ok(self.get_all_labels(group_id).await?.len())
    }

    async fn get_location_tree(&self, group_id: GroupId) -> RepositoryResult<Vec<LocationTreeNode>> {
        let state = self.state.lock().unwrap();
        if state.fail_lookups {
            return Err(lookup_failure());
        }

        let flat = state
            .locations
            .iter()
            .filter(|(g, _)| *g == group_id)
            .map(|(_, l)| LocationTreeNode::leaf(l.id, l.name.clone(), l.parent_id))
            .collect();

        Ok(assemble_forest(flat))
    }

    async fn create_location(
        &self,
        group_id: GroupId,
        location: LocationCreate,
    ) -> RepositoryResult<Location> {
        let mut state = self.state.lock().unwrap();
        if state.fail_location_create {
            return Err(RepositoryError::ForeignKeyViolation("mock".to_string()));
        }
        let created = Location {
            id: LocationId::new(),
            name: location.name.clone(),
            parent_id: location.parent_id,
            created_at: Utc::now(),
        };
        state.created_locations.push(location);
        state.locations.push((group_id, created.clone()));
        Ok(created)
    }

    async fn count_locations(&self, group_id: GroupId) -> RepositoryResult<usize> {
        let state = self.state.lock().unwrap();
        Ok(state.locations.iter().filter(|(g, _)| *g == group_id).count())
    }

    async fn item_exists_by_reference(
        &self,
        group_id: GroupId,
        import_ref: &str,
    ) -> RepositoryResult<bool> {
        let state = self.state.lock().unwrap();
        if state.fail_lookups {
            return Err(lookup_failure());
        }
        Ok(state
            .items
            .iter()
            .any(|(g, i)| *g == group_id && i.import_ref.as_deref() == Some(import_ref)))
    }

    async fn get_item_by_reference(
        &self,
        group_id: GroupId,
        import_ref: &str,
    ) -> RepositoryResult<Item> {
        let state = self.state.lock().unwrap();
        let mut item = state
            .items
            .iter()
            .find(|(g, i)| *g == group_id && i.import_ref.as_deref() == Some(import_ref))
            .map(|(_, i)| i.clone())
            .ok_or_else(|| RepositoryError::not_found("Item", "import_ref", import_ref))?;
        if state.nil_item_ids {
            item.id = ItemId::nil();
        }
        Ok(item)
    }

    async fn get_item_ids_without_import_ref(
        &self,
        group_id: GroupId,
    ) -> RepositoryResult<Vec<ItemId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .filter(|(g, i)| *g == group_id && i.import_ref.as_deref().unwrap_or("").is_empty())
            .map(|(_, i)| i.id)
            .collect())
    }

    async fn set_import_ref(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        import_ref: &str,
    ) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        let (_, item) = state
            .items
            .iter_mut()
            .find(|(g, i)| *g == group_id && i.id == item_id)
            .ok_or_else(|| RepositoryError::not_found("Item", "id", item_id))?;
        item.import_ref = Some(import_ref.to_string());
        Ok(())
    }

    async fn get_highest_asset_id(&self, group_id: GroupId) -> RepositoryResult<AssetId> {
        let state = self.state.lock().unwrap();
        if state.fail_lookups {
            return Err(lookup_failure());
        }
        Ok(state
            .items
            .iter()
            .filter(|(g, _)| *g == group_id)
            .map(|(_, i)| i.asset_id)
            .max()
            .unwrap_or(AssetId::UNSET))
    }

    async fn get_items_with_unset_asset_id(&self, group_id: GroupId) -> RepositoryResult<Vec<Item>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .filter(|(g, i)| *g == group_id && i.asset_id.is_unset())
            .map(|(_, i)| i.clone())
            .collect())
    }

    async fn set_asset_id(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        asset_id: AssetId,
    ) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        let (_, item) = state
            .items
            .iter_mut()
            .find(|(g, i)| *g == group_id && i.id == item_id)
            .ok_or_else(|| RepositoryError::not_found("Item", "id", item_id))?;
        item.asset_id = asset_id;
        Ok(())
    }

    async fn get_item(&self, group_id: GroupId, item_id: ItemId) -> RepositoryResult<Item> {
        let state = self.state.lock().unwrap();
        state
            .items
            .iter()
            .find(|(g, i)| *g == group_id && i.id == item_id)
            .map(|(_, i)| i.clone())
            .ok_or_else(|| RepositoryError::not_found("Item", "id", item_id))
    }

    async fn create_item(&self, group_id: GroupId, create: ItemCreate) -> RepositoryResult<Item> {
        let mut state = self.state.lock().unwrap();
        if state.fail_item_create {
            return Err(RepositoryError::DatabaseQueryError("mock create failure".to_string()));
        }
        let mut item = new_item(create);
        state.created_items += 1;
        state.items.push((group_id, item.clone()));
        if state.nil_item_ids {
            item.id = ItemId::nil();
        }
        Ok(item)
    }

    async fn update_item(&self, group_id: GroupId, update: ItemUpdate) -> RepositoryResult<Item> {
        let mut state = self.state.lock().unwrap();
        state.updated_items.push(update.clone());

        let (_, item) = state
            .items
            .iter_mut()
            .find(|(g, i)| *g == group_id && i.id == update.id)
            .ok_or_else(|| RepositoryError::not_found("Item", "id", update.id))?;

        item.name = update.name;
        item.description = update.description;
        item.asset_id = update.asset_id;
        item.quantity = update.quantity;
        item.insured = update.insured;
        item.archived = update.archived;
        item.location_id = Some(update.location_id);
        item.label_ids = update.label_ids;
        item.purchase_price = update.purchase_price;
        item.sold_price = update.sold_price;
        item.notes = update.notes;
        item.fields = update.fields;
        item.updated_at = Utc::now();

        Ok(item.clone())
    }

    async fn count_items(&self, group_id: GroupId) -> RepositoryResult<usize> {
        Ok(self.items(group_id).len())
    }
}
