// ==========================================
// 库存目录导入引擎 - 行校验器
// ==========================================
// 职责: 拦截结构上不安全的数值（负数量/负价格）
// 规则: 每个违规字段一条消息, 行被跳过但批次继续
// ==========================================

use crate::domain::{ImportRow, RowViolation};
use crate::importer::item_importer_trait::RowValidator;

/// 非负校验: 数量、采购价格、出售价格
#[derive(Debug, Clone, Copy, Default)]
pub struct NonNegativeValidator;

impl NonNegativeValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RowValidator for NonNegativeValidator {
    fn validate(&self, row: &ImportRow, row_number: usize) -> Vec<RowViolation> {
        let mut violations = Vec::new();

        if row.quantity < 0 {
            violations.push(RowViolation {
                row_number,
                field: "quantity".to_string(),
                message: format!("数量为负数: {}", row.quantity),
            });
        }

        if row.purchase_price < 0.0 {
            violations.push(RowViolation {
                row_number,
                field: "purchase_price".to_string(),
                message: format!("采购价格为负数: {}", row.purchase_price),
            });
        }

        if row.sold_price < 0.0 {
            violations.push(RowViolation {
                row_number,
                field: "sold_price".to_string(),
                message: format!("出售价格为负数: {}", row.sold_price),
            });
        }

        violations
    }
}
