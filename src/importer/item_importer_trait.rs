// ==========================================
// 库存目录导入引擎 - 物品导入 Trait
// ==========================================
// 职责: 定义物品导入接口及其组件接口（不包含实现）
// ==========================================

use crate::domain::{GroupId, ImportRow, ImportSummary, RowViolation};
use crate::importer::cancel::CancellationToken;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawSheet;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// ItemImporter Trait
// ==========================================
// 用途: 物品导入主接口
// 实现者: ItemImporterImpl
#[async_trait]
pub trait ItemImporter: Send + Sync {
    /// 导入已映射的行
    ///
    /// # 参数
    /// - group_id: 作用域
    /// - headers: 原始表头（写入前校验）
    /// - rows: 导入行（按顺序逐行处理）
    /// - cancel: 取消令牌（每行之前检查）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 全部行成功
    /// - Err(ImportError::RowValidation): 存在行校验失败（其余行已提交）
    /// - Err: 表头不匹配、查询/物化/持久化失败、取消
    ///
    /// # 流程
    /// 1. 表头校验
    /// 2. 构建目录索引（一次）
    /// 3. 读取资产编号高水位（自增开启时）
    /// 4. 逐行: 校验 → 物化标签/位置 → 判定身份 → 创建或查找 → 全字段覆写
    async fn import_rows(
        &self,
        group_id: GroupId,
        headers: &[String],
        rows: Vec<ImportRow>,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportSummary>;

    /// 从文件导入（解析 + 映射 + import_rows）
    async fn import_from_file(
        &self,
        group_id: GroupId,
        file_path: &Path,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportSummary>;
}

// ==========================================
// SheetParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, TsvParser, ExcelParser, UniversalFileParser
pub trait SheetParser: Send + Sync {
    /// 解析文件为表头 + 原始行记录（HashMap<列名, 值>）
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet>;
}

// ==========================================
// RowMapper Trait
// ==========================================
// 用途: 字段映射接口
// 实现者: HbRowMapper
pub trait RowMapper: Send + Sync {
    /// 将原始行记录映射为 ImportRow
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - headers: 表头（决定自定义字段顺序）
    /// - row_number: 数据行号（从 1 开始）
    ///
    /// # 返回
    /// - Err(ImportError::TypeConversionError): 类型转换失败
    fn map_row(
        &self,
        row: &HashMap<String, String>,
        headers: &[String],
        row_number: usize,
    ) -> ImportResult<ImportRow>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 行级校验接口
// 实现者: NonNegativeValidator
pub trait RowValidator: Send + Sync {
    /// 校验单行, 空列表表示通过
    fn validate(&self, row: &ImportRow, row_number: usize) -> Vec<RowViolation>;
}
