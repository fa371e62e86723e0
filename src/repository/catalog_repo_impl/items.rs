use super::core::{read_id, read_optional_id, CatalogRepositoryImpl};
use crate::domain::{
    AssetId, GroupId, Item, ItemCreate, ItemField, ItemId, ItemUpdate, LabelId,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use uuid::Uuid;

const ITEM_COLUMNS: &str = r#"
    id, asset_id, import_ref, name, description, quantity, insured, archived,
    location_id, purchase_price, purchase_from, purchase_time,
    manufacturer, model_number, serial_number,
    lifetime_warranty, warranty_expires, warranty_details,
    sold_to, sold_price, sold_time, sold_notes, notes,
    created_at, updated_at
"#;

// ==========================================
// 物品读写（同步实现，由 trait 层调用）
// ==========================================
impl CatalogRepositoryImpl {
    pub(super) fn find_item(&self, group_id: GroupId, item_id: ItemId) -> RepositoryResult<Item> {
        let conn = self.get_conn()?;
        load_item(&conn, group_id, item_id)
    }

    pub(super) fn reference_exists(
        &self,
        group_id: GroupId,
        import_ref: &str,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE group_id = ?1 AND import_ref = ?2)",
            params![group_id.to_string(), import_ref],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub(super) fn find_item_by_reference(
        &self,
        group_id: GroupId,
        import_ref: &str,
    ) -> RepositoryResult<Item> {
        let conn = self.get_conn()?;
        let item_id: Option<ItemId> = conn
            .query_row(
                "SELECT id FROM items WHERE group_id = ?1 AND import_ref = ?2 ORDER BY created_at LIMIT 1",
                params![group_id.to_string(), import_ref],
                |row| read_id(row, 0),
            )
            .optional()?;

        match item_id {
            Some(id) => load_item(&conn, group_id, id),
            None => Err(RepositoryError::not_found("Item", "import_ref", import_ref)),
        }
    }

    pub(super) fn find_ids_without_import_ref(
        &self,
        group_id: GroupId,
    ) -> RepositoryResult<Vec<ItemId>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id FROM items
            WHERE group_id = ?1 AND (import_ref IS NULL OR import_ref = '')
            ORDER BY created_at, rowid
            "#,
        )?;
        let ids = stmt
            .query_map(params![group_id.to_string()], |row| read_id(row, 0))?
            .collect::<Result<Vec<ItemId>, _>>()?;
        Ok(ids)
    }

    pub(super) fn write_import_ref(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        import_ref: &str,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE items SET import_ref = ?1, updated_at = ?2 WHERE id = ?3 AND group_id = ?4",
            params![import_ref, Utc::now(), item_id.to_string(), group_id.to_string()],
        )?;
        ensure_touched(rows, item_id)
    }

    pub(super) fn highest_asset_id(&self, group_id: GroupId) -> RepositoryResult<AssetId> {
        let conn = self.get_conn()?;
        let highest: i64 = conn.query_row(
            "SELECT COALESCE(MAX(asset_id), 0) FROM items WHERE group_id = ?1",
            params![group_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(AssetId(highest))
    }

    pub(super) fn find_items_with_unset_asset_id(
        &self,
        group_id: GroupId,
    ) -> RepositoryResult<Vec<Item>> {
        let conn = self.get_conn()?;
        let ids = {
            let mut stmt = conn.prepare(
                "SELECT id FROM items WHERE group_id = ?1 AND asset_id = 0 ORDER BY created_at, rowid",
            )?;
            let ids = stmt
                .query_map(params![group_id.to_string()], |row| read_id(row, 0))?
                .collect::<Result<Vec<ItemId>, _>>()?;
            ids
        };

        ids.into_iter()
            .map(|id| load_item(&conn, group_id, id))
            .collect()
    }

    pub(super) fn write_asset_id(
        &self,
        group_id: GroupId,
        item_id: ItemId,
        asset_id: AssetId,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE items SET asset_id = ?1, updated_at = ?2 WHERE id = ?3 AND group_id = ?4",
            params![asset_id.0, Utc::now(), item_id.to_string(), group_id.to_string()],
        )?;
        ensure_touched(rows, item_id)
    }

    /// 创建物品（事务化：items + item_labels）
    pub(super) fn insert_item(&self, group_id: GroupId, item: ItemCreate) -> RepositoryResult<Item> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let item_id = ItemId::new();
        let now = Utc::now();
        tx.execute(
            r#"
            INSERT INTO items (
                id, group_id, import_ref, asset_id, name, description,
                location_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                item_id.to_string(),
                group_id.to_string(),
                item.import_ref.as_deref().filter(|r| !r.trim().is_empty()),
                item.asset_id.0,
                item.name,
                item.description,
                item.location_id.to_string(),
                now,
                now,
            ],
        )?;
        replace_labels_tx(&tx, item_id, &item.label_ids)?;

        tx.commit()?;
        load_item(&conn, group_id, item_id)
    }

    /// 全字段覆写（事务化：items + item_labels + item_fields）
    pub(super) fn overwrite_item(
        &self,
        group_id: GroupId,
        item: ItemUpdate,
    ) -> RepositoryResult<Item> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE items SET
                name = ?1, description = ?2, asset_id = ?3, quantity = ?4,
                insured = ?5, archived = ?6, location_id = ?7,
                purchase_price = ?8, purchase_from = ?9, purchase_time = ?10,
                manufacturer = ?11, model_number = ?12, serial_number = ?13,
                lifetime_warranty = ?14, warranty_expires = ?15, warranty_details = ?16,
                sold_to = ?17, sold_price = ?18, sold_time = ?19, sold_notes = ?20,
                notes = ?21, updated_at = ?22
            WHERE id = ?23 AND group_id = ?24
            "#,
            params![
                item.name,
                item.description,
                item.asset_id.0,
                item.quantity,
                item.insured,
                item.archived,
                item.location_id.to_string(),
                item.purchase_price,
                item.purchase_from,
                item.purchase_time,
                item.manufacturer,
                item.model_number,
                item.serial_number,
                item.lifetime_warranty,
                item.warranty_expires,
                item.warranty_details,
                item.sold_to,
                item.sold_price,
                item.sold_time,
                item.sold_notes,
                item.notes,
                Utc::now(),
                item.id.to_string(),
                group_id.to_string(),
            ],
        )?;
        ensure_touched(rows, item.id)?;

        replace_labels_tx(&tx, item.id, &item.label_ids)?;
        replace_fields_tx(&tx, item.id, &item.fields)?;

        tx.commit()?;
        load_item(&conn, group_id, item.id)
    }
}

// ==========================================
// 事务内辅助
// ==========================================

/// 重建标签关联（重复 label_id 由 INSERT OR IGNORE 去重）
fn replace_labels_tx(tx: &Transaction, item_id: ItemId, label_ids: &[LabelId]) -> RepositoryResult<()> {
    tx.execute(
        "DELETE FROM item_labels WHERE item_id = ?1",
        params![item_id.to_string()],
    )?;

    let mut stmt =
        tx.prepare("INSERT OR IGNORE INTO item_labels (item_id, label_id) VALUES (?1, ?2)")?;
    for label_id in label_ids {
        stmt.execute(params![item_id.to_string(), label_id.to_string()])?;
    }
    Ok(())
}

/// 重建自定义字段（保持输入顺序）
fn replace_fields_tx(tx: &Transaction, item_id: ItemId, fields: &[ItemField]) -> RepositoryResult<()> {
    tx.execute(
        "DELETE FROM item_fields WHERE item_id = ?1",
        params![item_id.to_string()],
    )?;

    let mut stmt = tx.prepare(
        r#"
        INSERT INTO item_fields (id, item_id, position, name, field_type, text_value)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )?;
    for (position, field) in fields.iter().enumerate() {
        stmt.execute(params![
            Uuid::new_v4().to_string(),
            item_id.to_string(),
            position as i64,
            field.name,
            field.field_type,
            field.text_value,
        ])?;
    }
    Ok(())
}

fn ensure_touched(rows: usize, item_id: ItemId) -> RepositoryResult<()> {
    if rows == 0 {
        return Err(RepositoryError::not_found("Item", "id", item_id));
    }
    Ok(())
}

// ==========================================
// 读取辅助
// ==========================================

fn load_item(conn: &Connection, group_id: GroupId, item_id: ItemId) -> RepositoryResult<Item> {
    let sql = format!(
        "SELECT {} FROM items WHERE id = ?1 AND group_id = ?2",
        ITEM_COLUMNS
    );
    let mut item = conn
        .query_row(
            &sql,
            params![item_id.to_string(), group_id.to_string()],
            map_item_row,
        )
        .optional()?
        .ok_or_else(|| RepositoryError::not_found("Item", "id", item_id))?;

    let mut label_stmt = conn.prepare(
        r#"
        SELECT il.label_id FROM item_labels il
        JOIN labels l ON l.id = il.label_id
        WHERE il.item_id = ?1
        ORDER BY l.name
        "#,
    )?;
    item.label_ids = label_stmt
        .query_map(params![item_id.to_string()], |row| read_id(row, 0))?
        .collect::<Result<Vec<LabelId>, _>>()?;

    let mut field_stmt = conn.prepare(
        "SELECT name, field_type, text_value FROM item_fields WHERE item_id = ?1 ORDER BY position",
    )?;
    item.fields = field_stmt
        .query_map(params![item_id.to_string()], |row| {
            Ok(ItemField {
                name: row.get(0)?,
                field_type: row.get(1)?,
                text_value: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(item)
}

fn map_item_row(row: &Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: read_id(row, 0)?,
        asset_id: AssetId(row.get(1)?),
        import_ref: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        quantity: row.get(5)?,
        insured: row.get(6)?,
        archived: row.get(7)?,
        location_id: read_optional_id(row, 8)?,
        label_ids: Vec::new(),
        purchase_price: row.get(9)?,
        purchase_from: row.get(10)?,
        purchase_time: row.get(11)?,
        manufacturer: row.get(12)?,
        model_number: row.get(13)?,
        serial_number: row.get(14)?,
        lifetime_warranty: row.get(15)?,
        warranty_expires: row.get(16)?,
        warranty_details: row.get(17)?,
        sold_to: row.get(18)?,
        sold_price: row.get(19)?,
        sold_time: row.get(20)?,
        sold_notes: row.get(21)?,
        notes: row.get(22)?,
        fields: Vec::new(),
        created_at: row.get(23)?,
        updated_at: row.get(24)?,
    })
}
