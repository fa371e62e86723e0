// ==========================================
// 库存目录导入引擎 - 文件解析器实现
// ==========================================
// 职责: 读取表格文件 → 表头 + 按表头键入的字符串行
// 支持: CSV (.csv) / TSV (.tsv/.txt) / Excel (.xlsx/.xls)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::item_importer_trait::SheetParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

// ==========================================
// RawSheet - 原始表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,                  // 表头（保持列顺序）
    pub records: Vec<HashMap<String, String>>, // 数据行（已跳过空白行）
}

fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = extension_of(path);
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }

    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 按表头组装一行, 完全空白的行返回 None
fn build_record<I, S>(headers: &[String], cells: I) -> Option<HashMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row_map = HashMap::new();
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if header.is_empty() {
                continue;
            }
            row_map.insert(header.clone(), value.as_ref().trim().to_string());
        }
    }

    if row_map.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row_map)
    }
}

// ==========================================
// 分隔符文本解析（CSV / TSV 共用）
// ==========================================
fn parse_delimited(path: &Path, delimiter: u8) -> ImportResult<RawSheet> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if let Some(row_map) = build_record(&headers, record.iter()) {
            records.push(row_map);
        }
    }

    debug!(path = %path.display(), rows = records.len(), "文本表格解析完成");
    Ok(RawSheet { headers, records })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl SheetParser for CsvParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        check_file(file_path, &["csv"])?;
        parse_delimited(file_path, b',')
    }
}

// ==========================================
// TSV Parser 实现
// ==========================================
pub struct TsvParser;

impl SheetParser for TsvParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        check_file(file_path, &["tsv", "txt"])?;
        parse_delimited(file_path, b'\t')
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl SheetParser for ExcelParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let cells = data_row.iter().map(|cell| cell.to_string());
            if let Some(row_map) = build_record(&headers, cells) {
                records.push(row_map);
            }
        }

        debug!(path = %file_path.display(), sheet = %sheet_name, rows = records.len(), "Excel 解析完成");
        Ok(RawSheet { headers, records })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl SheetParser for UniversalFileParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_raw_sheet(file_path),
            "tsv" | "txt" => TsvParser.parse_to_raw_sheet(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_sheet(file_path),
            other => {
                if !file_path.exists() {
                    return Err(ImportError::FileNotFound(file_path.display().to_string()));
                }
                Err(ImportError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}
