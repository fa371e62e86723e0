// ==========================================
// 库存目录导入引擎 - 物品导入器实现
// ==========================================
// 职责: 整合导入流程，从表格行到目录仓储
// 流程: 表头校验 → 目录索引 → 逐行(校验 → 物化 → 身份 → 创建/查找 → 覆写)
// 约束:
// - 行严格顺序处理, 共享索引与高水位经 ImportContext 显式传递
// - 行校验失败跳过该行, 批次结束后汇总报错（已提交行不回滚）
// - 查询/物化/持久化失败立即中止批次
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{AssetId, GroupId, ImportRow, ImportSummary, ItemCreate, RowViolation};
use crate::importer::cancel::CancellationToken;
use crate::importer::catalog_index::{build_indexes, LabelIndex, PathIndex};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{validate_headers, HbRowMapper};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::identity_resolver::{allocate_asset_id, resolve_identity};
use crate::importer::item_importer_trait::{ItemImporter, RowMapper, RowValidator, SheetParser};
use crate::importer::materializer::{ensure_labels, ensure_location_path};
use crate::importer::row_validator::NonNegativeValidator;
use crate::repository::CatalogRepository;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportContext - 单次导入调用的可变状态
// ==========================================
struct ImportContext {
    group_id: GroupId,
    paths: PathIndex,
    labels: LabelIndex,
    auto_increment: bool,
    high_water_mark: AssetId,

    completed: usize,
    created: usize,
    updated: usize,
    violations: Vec<RowViolation>,
}

/// 单行写入结果
enum RowOutcome {
    Created,
    Updated,
}

// ==========================================
// ItemImporterImpl - 物品导入器实现
// ==========================================
pub struct ItemImporterImpl<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    repo: Arc<R>,

    // 配置读取器
    config: C,

    // 导入组件
    sheet_parser: Box<dyn SheetParser>,
    row_mapper: Box<dyn RowMapper>,
    row_validator: Box<dyn RowValidator>,
}

impl<R, C> ItemImporterImpl<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    /// 使用默认组件创建导入器
    ///
    /// 默认组件: UniversalFileParser + HbRowMapper + NonNegativeValidator
    pub fn new(repo: Arc<R>, config: C) -> Self {
        Self::with_components(
            repo,
            config,
            Box::new(UniversalFileParser),
            Box::new(HbRowMapper),
            Box::new(NonNegativeValidator::new()),
        )
    }

    /// 使用自定义组件创建导入器
    pub fn with_components(
        repo: Arc<R>,
        config: C,
        sheet_parser: Box<dyn SheetParser>,
        row_mapper: Box<dyn RowMapper>,
        row_validator: Box<dyn RowValidator>,
    ) -> Self {
        Self {
            repo,
            config,
            sheet_parser,
            row_mapper,
            row_validator,
        }
    }

    /// 处理单个已通过校验的行
    async fn import_row(
        &self,
        ctx: &mut ImportContext,
        row: &ImportRow,
        row_number: usize,
    ) -> ImportResult<RowOutcome> {
        let repo = self.repo.as_ref();
        let group_id = ctx.group_id;

        // === 资产编号（先于任何写入）===
        let (asset_id, high_water_mark) =
            allocate_asset_id(row.asset_id, ctx.high_water_mark, ctx.auto_increment)?;

        // === 物化标签与位置 ===
        let label_ids = ensure_labels(repo, group_id, &row.labels, &mut ctx.labels).await?;
        let location_id =
            ensure_location_path(repo, group_id, &row.location, &mut ctx.paths).await?;

        // === 身份判定 ===
        let exists = resolve_identity(repo, group_id, row).await?;
        ctx.high_water_mark = high_water_mark;

        // === 创建或查找 ===
        let existing_ref = if exists { row.reference() } else { None };
        let (item, outcome) = match existing_ref {
            Some(reference) => {
                let item = repo
                    .get_item_by_reference(group_id, reference)
                    .await
                    .map_err(|e| {
                        ImportError::persistence(row_number, format!("按导入引用读取物品失败: {}", reference), e)
                    })?;
                (item, RowOutcome::Updated)
            }
            None => {
                let create = ItemCreate {
                    import_ref: row.reference().map(str::to_string),
                    name: row.name.clone(),
                    description: row.description.clone(),
                    asset_id,
                    location_id,
                    label_ids: label_ids.clone(),
                };
                let item = repo
                    .create_item(group_id, create)
                    .await
                    .map_err(|e| ImportError::persistence(row_number, "创建物品失败", e))?;
                (item, RowOutcome::Created)
            }
        };

        if item.id.is_nil() {
            error!(row_number, "物品 ID 为空");
            return Err(ImportError::InternalConsistency(format!(
                "第 {} 行: 创建或查找后物品 ID 为空",
                row_number
            )));
        }

        // === 全字段覆写 ===
        let update = row.to_item_update(item.id, asset_id, location_id, label_ids);
        repo.update_item(group_id, update)
            .await
            .map_err(|e| ImportError::persistence(row_number, "更新物品失败", e))?;

        debug!(row_number, item_id = %item.id, asset_id = %asset_id, "行导入完成");
        Ok(outcome)
    }
}

#[async_trait]
impl<R, C> ItemImporter for ItemImporterImpl<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    #[instrument(skip(self, headers, rows, cancel), fields(group_id = %group_id, total_rows = rows.len()))]
    async fn import_rows(
        &self,
        group_id: GroupId,
        headers: &[String],
        rows: Vec<ImportRow>,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let total_rows = rows.len();
        info!(batch_id = %batch_id, "开始导入物品数据");

        // === 步骤 1: 表头校验 ===
        validate_headers(headers)?;

        // === 步骤 2: 目录索引 ===
        let (paths, labels) = build_indexes(self.repo.as_ref(), group_id).await?;

        // === 步骤 3: 资产编号高水位 ===
        let auto_increment = self.config.auto_increment_asset_id().await?;
        let high_water_mark = if auto_increment {
            self.repo
                .get_highest_asset_id(group_id)
                .await
                .map_err(|e| ImportError::lookup("读取资产编号高水位失败", e))?
        } else {
            AssetId::UNSET
        };
        debug!(auto_increment, high_water_mark = high_water_mark.0, "资产编号配置");

        let mut ctx = ImportContext {
            group_id,
            paths,
            labels,
            auto_increment,
            high_water_mark,
            completed: 0,
            created: 0,
            updated: 0,
            violations: Vec::new(),
        };

        // === 步骤 4: 逐行处理 ===
        for (idx, row) in rows.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(completed = ctx.completed, "导入已取消");
                return Err(ImportError::Cancelled {
                    completed: ctx.completed,
                });
            }

            let row_number = if row.row_number > 0 { row.row_number } else { idx + 1 };

            let violations = self.row_validator.validate(row, row_number);
            if !violations.is_empty() {
                warn!(row_number, violations = violations.len(), "行校验失败, 跳过");
                ctx.violations.extend(violations);
                continue;
            }

            match self.import_row(&mut ctx, row, row_number).await {
                Ok(RowOutcome::Created) => ctx.created += 1,
                Ok(RowOutcome::Updated) => ctx.updated += 1,
                Err(e) => {
                    error!(row_number, completed = ctx.completed, error = %e, "导入中止");
                    return Err(e);
                }
            }
            ctx.completed += 1;
        }

        // === 步骤 5: 汇总行校验错误 ===
        if !ctx.violations.is_empty() {
            warn!(
                violations = ctx.violations.len(),
                completed = ctx.completed,
                "导入存在行校验错误"
            );
            return Err(ImportError::RowValidation {
                violations: ctx.violations,
                completed: ctx.completed,
            });
        }

        let summary = ImportSummary {
            batch_id,
            total_rows,
            completed: ctx.completed,
            created: ctx.created,
            updated: ctx.updated,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            batch_id = %summary.batch_id,
            completed = summary.completed,
            created = summary.created,
            updated = summary.updated,
            elapsed_ms = summary.elapsed_ms,
            "导入完成"
        );

        Ok(summary)
    }

    #[instrument(skip(self, cancel), fields(group_id = %group_id))]
    async fn import_from_file(
        &self,
        group_id: GroupId,
        file_path: &Path,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportSummary> {
        info!(file_path = %file_path.display(), "开始解析导入文件");

        // === 解析文件 ===
        let sheet = self.sheet_parser.parse_to_raw_sheet(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        // 表头不匹配时不做字段映射
        validate_headers(&sheet.headers)?;

        // === 字段映射（任一行失败即中止, 尚未写入）===
        let mut rows = Vec::with_capacity(sheet.records.len());
        for (idx, record) in sheet.records.iter().enumerate() {
            rows.push(self.row_mapper.map_row(record, &sheet.headers, idx + 1)?);
        }
        info!(total_rows = rows.len(), "字段映射完成");

        self.import_rows(group_id, &sheet.headers, rows, cancel).await
    }
}
