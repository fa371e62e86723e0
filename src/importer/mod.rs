// ==========================================
// 库存目录导入引擎 - 导入层
// ==========================================
// 职责: 表格数据 → 位置树 / 标签 / 物品的对账导入
// 支持: CSV, TSV, Excel
// ==========================================

// 模块声明
pub mod cancel;
pub mod catalog_index;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod identity_resolver;
pub mod item_importer_impl;
pub mod item_importer_trait;
pub mod materializer;
pub mod path_resolver;
pub mod row_validator;

#[cfg(test)]
pub(crate) mod mock_repo;

// 重导出核心类型
pub use cancel::CancellationToken;
pub use catalog_index::{build_indexes, flatten_location_tree, LabelIndex, PathIndex};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{validate_headers, HbRowMapper, EXPECTED_HEADERS, FIELD_PREFIX};
pub use file_parser::{CsvParser, ExcelParser, RawSheet, TsvParser, UniversalFileParser};
pub use identity_resolver::{allocate_asset_id, resolve_identity};
pub use item_importer_impl::ItemImporterImpl;
pub use materializer::{ensure_labels, ensure_location_path};
pub use row_validator::NonNegativeValidator;

// 重导出 Trait 接口
pub use item_importer_trait::{ItemImporter, RowMapper, RowValidator, SheetParser};
