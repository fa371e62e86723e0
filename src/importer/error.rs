// ==========================================
// 库存目录导入引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// - 输入形状错误: 任何写入之前失败
// - 行校验错误: 批次继续, 结束时汇总为一次失败
// - 查询/物化/持久化错误: 立即中止批次（已提交行保留）
// - 内部一致性错误: 不变量被破坏, 立即中止
// ==========================================

use crate::domain::{AssetId, RowViolation};
use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.tsv/.txt/.xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 输入形状错误 =====
    #[error("表头与导入格式不匹配, 未知列: [{}], 重复列: [{}]", unknown.join(", "), duplicated.join(", "))]
    HeaderMismatch {
        unknown: Vec<String>,
        duplicated: Vec<String>,
    },

    #[error("类型转换失败 (行 {row}, 字段 {field}): 无法解析 {value:?}")]
    TypeConversionError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== 行校验错误（批次结束时汇总）=====
    #[error("导入数据存在错误（已完成 {completed} 行）:\n{}", format_violations(violations))]
    RowValidation {
        violations: Vec<RowViolation>,
        completed: usize,
    },

    // ===== 仓储错误 =====
    #[error("目录快照读取失败: {context}")]
    Lookup {
        context: String,
        #[source]
        source: RepositoryError,
    },

    #[error("目录结构物化失败: {context}")]
    Materialization {
        context: String,
        #[source]
        source: Option<RepositoryError>,
    },

    #[error("物品持久化失败 (行 {row}): {context}")]
    Persistence {
        row: usize,
        context: String,
        #[source]
        source: RepositoryError,
    },

    // ===== 资产编号 =====
    #[error("资产编号已达上限, 无法继续分配 (当前高水位: {0})")]
    AssetIdExhausted(AssetId),

    // ===== 不变量 =====
    #[error("内部一致性错误: {0}")]
    InternalConsistency(String),

    // ===== 取消 =====
    #[error("导入已取消（已完成 {completed} 行）")]
    Cancelled { completed: usize },

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 查询类错误（目录快照/引用检查）
    pub fn lookup(context: impl Into<String>, source: RepositoryError) -> Self {
        ImportError::Lookup {
            context: context.into(),
            source,
        }
    }

    pub fn persistence(row: usize, context: impl Into<String>, source: RepositoryError) -> Self {
        ImportError::Persistence {
            row,
            context: context.into(),
            source,
        }
    }

    /// 是否属于"写入之前"的输入形状错误
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
                | ImportError::HeaderMismatch { .. }
                | ImportError::TypeConversionError { .. }
        )
    }
}

fn format_violations(violations: &[RowViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
