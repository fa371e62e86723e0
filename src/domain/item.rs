// ==========================================
// 库存目录导入引擎 - 物品领域模型
// ==========================================
// 红线: 物品 ID 在创建/查询后不得为 nil
// 用途: ItemCreate 只带最小字段, ItemUpdate 覆写全部字段
// ==========================================

use crate::domain::types::{AssetId, ItemId, LabelId, LocationId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// 自定义字段类型（导入只产生 text 类型）
pub const FIELD_TYPE_TEXT: &str = "text";

// ==========================================
// ItemField - 自定义字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemField {
    pub name: String,
    pub field_type: String,
    pub text_value: String,
}

impl ItemField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FIELD_TYPE_TEXT.to_string(),
            text_value: value.into(),
        }
    }
}

// ==========================================
// Item - 物品
// ==========================================
// 对齐: items 表 + item_labels + item_fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    // ===== 标识 =====
    pub id: ItemId,
    pub asset_id: AssetId,             // 对外展示编号（0 = 未设置）
    pub import_ref: Option<String>,    // 导入幂等键

    // ===== 基础信息 =====
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub insured: bool,
    pub archived: bool,

    // ===== 归属 =====
    pub location_id: Option<LocationId>,
    pub label_ids: Vec<LabelId>,

    // ===== 采购 =====
    pub purchase_price: f64,
    pub purchase_from: String,
    pub purchase_time: Option<NaiveDate>,

    // ===== 规格 =====
    pub manufacturer: String,
    pub model_number: String,
    pub serial_number: String,

    // ===== 保修 =====
    pub lifetime_warranty: bool,
    pub warranty_expires: Option<NaiveDate>,
    pub warranty_details: String,

    // ===== 出售 =====
    pub sold_to: String,
    pub sold_price: f64,
    pub sold_time: Option<NaiveDate>,
    pub sold_notes: String,

    pub notes: String,
    pub fields: Vec<ItemField>,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// ItemCreate - 创建请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCreate {
    pub import_ref: Option<String>,
    pub name: String,
    pub description: String,
    pub asset_id: AssetId,
    pub location_id: LocationId,
    pub label_ids: Vec<LabelId>,
}

// ==========================================
// ItemUpdate - 全字段覆写请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub id: ItemId,
    pub label_ids: Vec<LabelId>,
    pub location_id: LocationId,

    pub name: String,
    pub description: String,
    pub asset_id: AssetId,
    pub insured: bool,
    pub quantity: i32,
    pub archived: bool,

    pub purchase_price: f64,
    pub purchase_from: String,
    pub purchase_time: Option<NaiveDate>,

    pub manufacturer: String,
    pub model_number: String,
    pub serial_number: String,

    pub lifetime_warranty: bool,
    pub warranty_expires: Option<NaiveDate>,
    pub warranty_details: String,

    pub sold_to: String,
    pub sold_price: f64,
    pub sold_time: Option<NaiveDate>,
    pub sold_notes: String,

    pub notes: String,
    pub fields: Vec<ItemField>,
}
