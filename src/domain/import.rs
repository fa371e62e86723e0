// ==========================================
// 库存目录导入引擎 - 导入领域模型
// ==========================================
// ImportRow: 单次导入调用内的临时行记录
// RowViolation: 行级校验违规（不中断批次, 结束时汇总）
// ImportSummary: 导入成功时返回给调用方的统计
// ==========================================

use crate::domain::item::{ItemField, ItemUpdate};
use crate::domain::types::{AssetId, ItemId, LabelId, LocationId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RowField - 行内自定义字段 (HB.field.<name>)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowField {
    pub name: String,
    pub value: String,
}

// ==========================================
// ImportRow - 导入行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub row_number: usize, // 数据行号（从 1 开始）

    // ===== 目录引用 =====
    pub location: Vec<String>, // 位置路径段（根 → 叶）
    pub labels: Vec<String>,   // 标签名（保持输入顺序）

    // ===== 标识 =====
    pub import_ref: Option<String>,
    pub asset_id: AssetId,

    // ===== 基础信息 =====
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub insured: bool,
    pub archived: bool,

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
    pub fields: Vec<RowField>,
}

impl ImportRow {
    /// 非空导入引用（空白视为无引用）
    pub fn reference(&self) -> Option<&str> {
        self.import_ref
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// 构造全字段覆写请求
    pub fn to_item_update(
        &self,
        id: ItemId,
        asset_id: AssetId,
        location_id: LocationId,
        label_ids: Vec<LabelId>,
    ) -> ItemUpdate {
        ItemUpdate {
            id,
            label_ids,
            location_id,
            name: self.name.clone(),
            description: self.description.clone(),
            asset_id,
            insured: self.insured,
            quantity: self.quantity,
            archived: self.archived,
            purchase_price: self.purchase_price,
            purchase_from: self.purchase_from.clone(),
            purchase_time: self.purchase_time,
            manufacturer: self.manufacturer.clone(),
            model_number: self.model_number.clone(),
            serial_number: self.serial_number.clone(),
            lifetime_warranty: self.lifetime_warranty,
            warranty_expires: self.warranty_expires,
            warranty_details: self.warranty_details.clone(),
            sold_to: self.sold_to.clone(),
            sold_price: self.sold_price,
            sold_time: self.sold_time,
            sold_notes: self.sold_notes.clone(),
            notes: self.notes.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| ItemField::text(f.name.clone(), f.value.clone()))
                .collect(),
        }
    }
}

// ==========================================
// RowViolation - 行级校验违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowViolation {
    pub row_number: usize,
    pub field: String,
    pub message: String,
}

impl fmt::Display for RowViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第 {} 行: {}", self.row_number, self.message)
    }
}

// ==========================================
// ImportSummary - 导入结果统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub total_rows: usize,
    pub completed: usize, // 成功写入的行数
    pub created: usize,   // 其中新建物品数
    pub updated: usize,   // 其中按导入引用更新的物品数
    pub elapsed_ms: u64,
}
