// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、临时导入文件
// ==========================================

#![allow(dead_code)]

use inventory_import::repository::CatalogRepositoryImpl;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = Builder::new().suffix(".db").tempfile()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    // 建表由仓储构造完成
    CatalogRepositoryImpl::new(&db_path)?;

    Ok((temp_file, db_path))
}

/// 在临时数据库上创建仓储
pub fn create_test_repo() -> Result<(NamedTempFile, Arc<CatalogRepositoryImpl>), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let repo = CatalogRepositoryImpl::new(&db_path)?;
    Ok((temp_file, Arc::new(repo)))
}

/// 写入临时导入文件
pub fn write_sheet(suffix: &str, lines: &[&str]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = Builder::new().suffix(suffix).tempfile()?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(file)
}
