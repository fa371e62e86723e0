// ==========================================
// 库存目录导入引擎 - 字段映射器实现
// ==========================================
// 职责: HB.* 列 → ImportRow 映射 + 类型转换
// 规则:
// - HB.location 按 '/' 拆分为路径段
// - HB.labels 按 ';' 拆分为标签名
// - HB.field.<名称> 列映射为自定义字段（按表头顺序）
// ==========================================

use crate::domain::{AssetId, ImportRow, RowField};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::item_importer_trait::RowMapper;
use crate::importer::path_resolver::PATH_SEPARATOR;
use chrono::{DateTime, Duration, NaiveDate};
use std::collections::{HashMap, HashSet};

/// 导入格式支持的全部固定列
pub const EXPECTED_HEADERS: &[&str] = &[
    "HB.import_ref",
    "HB.location",
    "HB.labels",
    "HB.asset_id",
    "HB.archived",
    "HB.name",
    "HB.quantity",
    "HB.description",
    "HB.insured",
    "HB.notes",
    "HB.purchase_price",
    "HB.purchase_from",
    "HB.purchase_time",
    "HB.manufacturer",
    "HB.model_number",
    "HB.serial_number",
    "HB.lifetime_warranty",
    "HB.warranty_expires",
    "HB.warranty_details",
    "HB.sold_to",
    "HB.sold_price",
    "HB.sold_time",
    "HB.sold_notes",
];

/// 自定义字段列前缀
pub const FIELD_PREFIX: &str = "HB.field.";

/// 标签分隔符
pub const LABEL_SEPARATOR: char = ';';

/// 校验表头
///
/// 非空表头必须属于固定列或带自定义字段前缀, 且不得重复。
pub fn validate_headers(headers: &[String]) -> ImportResult<()> {
    let mut seen = HashSet::new();
    let mut unknown = Vec::new();
    let mut duplicated: Vec<String> = Vec::new();

    for header in headers.iter().map(|h| h.trim()).filter(|h| !h.is_empty()) {
        if !EXPECTED_HEADERS.contains(&header) && !is_custom_field(header) {
            unknown.push(header.to_string());
        }
        if !seen.insert(header) && !duplicated.iter().any(|d| d == header) {
            duplicated.push(header.to_string());
        }
    }

    if unknown.is_empty() && duplicated.is_empty() {
        Ok(())
    } else {
        Err(ImportError::HeaderMismatch {
            unknown,
            duplicated,
        })
    }
}

fn is_custom_field(header: &str) -> bool {
    header
        .strip_prefix(FIELD_PREFIX)
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false)
}

// ==========================================
// HbRowMapper 实现
// ==========================================
pub struct HbRowMapper;

impl RowMapper for HbRowMapper {
    fn map_row(
        &self,
        row: &HashMap<String, String>,
        headers: &[String],
        row_number: usize,
    ) -> ImportResult<ImportRow> {
        Ok(ImportRow {
            row_number,

            location: split_location(&self.get_text(row, "HB.location")),
            labels: split_labels(&self.get_text(row, "HB.labels")),

            import_ref: self.get_string(row, "HB.import_ref"),
            asset_id: self.parse_asset_id(row, "HB.asset_id", row_number)?,

            name: self.get_text(row, "HB.name"),
            description: self.get_text(row, "HB.description"),
            quantity: self.parse_i32(row, "HB.quantity", row_number)?,
            insured: self.parse_bool(row, "HB.insured"),
            archived: self.parse_bool(row, "HB.archived"),

            purchase_price: self.parse_f64(row, "HB.purchase_price", row_number)?,
            purchase_from: self.get_text(row, "HB.purchase_from"),
            purchase_time: self.parse_date(row, "HB.purchase_time", row_number)?,

            manufacturer: self.get_text(row, "HB.manufacturer"),
            model_number: self.get_text(row, "HB.model_number"),
            serial_number: self.get_text(row, "HB.serial_number"),

            lifetime_warranty: self.parse_bool(row, "HB.lifetime_warranty"),
            warranty_expires: self.parse_date(row, "HB.warranty_expires", row_number)?,
            warranty_details: self.get_text(row, "HB.warranty_details"),

            sold_to: self.get_text(row, "HB.sold_to"),
            sold_price: self.parse_f64(row, "HB.sold_price", row_number)?,
            sold_time: self.parse_date(row, "HB.sold_time", row_number)?,
            sold_notes: self.get_text(row, "HB.sold_notes"),

            notes: self.get_text(row, "HB.notes"),
            fields: self.custom_fields(row, headers),
        })
    }
}

impl HbRowMapper {
    /// 提取字符串字段（空白返回 None）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        row.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// 提取文本字段（缺失为空串）
    fn get_text(&self, row: &HashMap<String, String>, key: &str) -> String {
        self.get_string(row, key).unwrap_or_default()
    }

    fn conversion_error(row_number: usize, key: &str, value: &str) -> ImportError {
        ImportError::TypeConversionError {
            row: row_number,
            field: key.to_string(),
            value: value.to_string(),
        }
    }

    fn parse_bool(&self, row: &HashMap<String, String>, key: &str) -> bool {
        match self.get_string(row, key) {
            None => false,
            Some(value) => matches!(
                value.to_lowercase().as_str(),
                "true" | "yes" | "y" | "1" | "x"
            ),
        }
    }

    fn parse_i32(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<i32> {
        match self.get_string(row, key) {
            None => Ok(0),
            Some(value) => value
                .parse::<i32>()
                .or_else(|_| {
                    // Excel 整数单元格可能带小数形式（如 "3.0"）
                    value
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                        .map(|f| f as i32)
                        .ok_or(())
                })
                .map_err(|_| Self::conversion_error(row_number, key, &value)),
        }
    }

    fn parse_f64(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<f64> {
        match self.get_string(row, key) {
            None => Ok(0.0),
            Some(value) => value
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| Self::conversion_error(row_number, key, &value)),
        }
    }

    fn parse_asset_id(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<AssetId> {
        match self.get_string(row, key) {
            None => Ok(AssetId::UNSET),
            Some(value) => {
                AssetId::parse(&value).ok_or_else(|| Self::conversion_error(row_number, key, &value))
            }
        }
    }

    /// 解析日期
    ///
    /// 支持 YYYY-MM-DD / YYYY/MM/DD / MM/DD/YYYY / RFC 3339 / Excel 日期序列号
    fn parse_date(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        let value = match self.get_string(row, key) {
            None => return Ok(None),
            Some(v) => v,
        };

        for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&value, format) {
                return Ok(Some(date));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
            return Ok(Some(dt.date_naive()));
        }

        if let Some(date) = excel_serial_to_date(&value) {
            return Ok(Some(date));
        }

        Err(Self::conversion_error(row_number, key, &value))
    }

    /// HB.field.<名称> 列 → 自定义字段（按表头顺序, 跳过空值）
    fn custom_fields(&self, row: &HashMap<String, String>, headers: &[String]) -> Vec<RowField> {
        headers
            .iter()
            .filter_map(|header| {
                let name = header.trim().strip_prefix(FIELD_PREFIX)?.trim();
                if name.is_empty() {
                    return None;
                }
                let value = self.get_string(row, header)?;
                Some(RowField {
                    name: name.to_string(),
                    value,
                })
            })
            .collect()
    }
}

/// 位置单元格 → 路径段
fn split_location(value: &str) -> Vec<String> {
    value
        .split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 标签单元格 → 标签名
fn split_labels(value: &str) -> Vec<String> {
    value
        .split(LABEL_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Excel 日期序列号（1900 日期系统）
fn excel_serial_to_date(value: &str) -> Option<NaiveDate> {
    let serial = value.parse::<f64>().ok()?;
    // 1 = 1900-01-01, 2958465 = 9999-12-31
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
