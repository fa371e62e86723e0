// ==========================================
// 库存目录导入引擎 - 标签/位置物化器
// ==========================================
// 职责: 确保行内引用的标签与位置路径都已存在
// 规则:
// - 标签: 索引命中直接复用, 未命中创建并登记
// - 位置: 整路径命中走快速路径; 否则自根向叶逐级补齐缺失祖先
// 约束: 每次创建立即写回共享索引, 后续行可见
// ==========================================

use crate::domain::{GroupId, LabelCreate, LabelId, LocationCreate, LocationId};
use crate::importer::catalog_index::{LabelIndex, PathIndex};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::path_resolver::serialize;
use crate::repository::CatalogRepository;
use tracing::debug;

/// 确保标签全部存在, 按输入顺序返回标签 ID
///
/// 同一行内重复的标签名返回重复 ID（由仓储在存储时去重）。
pub async fn ensure_labels<R>(
    repo: &R,
    group_id: GroupId,
    names: &[String],
    index: &mut LabelIndex,
) -> ImportResult<Vec<LabelId>>
where
    R: CatalogRepository + ?Sized,
{
    let mut ids = Vec::with_capacity(names.len());

    for name in names {
        if let Some(id) = index.get(name) {
            ids.push(id);
            continue;
        }

        let label = repo
            .create_label(group_id, LabelCreate { name: name.clone() })
            .await
            .map_err(|e| ImportError::Materialization {
                context: format!("创建标签失败: {}", name),
                source: Some(e),
            })?;

        debug!(label = %name, id = %label.id, "新建标签");
        index.insert(name.clone(), label.id);
        ids.push(label.id);
    }

    Ok(ids)
}

/// 确保位置路径存在, 返回叶子位置 ID
///
/// # 返回
/// - Err(ImportError::Materialization): 路径为空或仓储拒绝创建
/// - Err(ImportError::InternalConsistency): 逐级补齐后整路径仍不在索引中
pub async fn ensure_location_path<R>(
    repo: &R,
    group_id: GroupId,
    segments: &[String],
    index: &mut PathIndex,
) -> ImportResult<LocationId>
where
    R: CatalogRepository + ?Sized,
{
    if segments.is_empty() {
        return Err(ImportError::Materialization {
            context: "位置路径为空".to_string(),
            source: None,
        });
    }

    let full_key = serialize(segments);

    // 快速路径
    if let Some(id) = index.get(&full_key) {
        return Ok(id);
    }

    let mut parent_id: Option<LocationId> = None;
    for depth in 0..segments.len() {
        let prefix_key = serialize(&segments[..=depth]);

        if let Some(id) = index.get(&prefix_key) {
            parent_id = Some(id);
            continue;
        }

        let location = repo
            .create_location(
                group_id,
                LocationCreate {
                    name: segments[depth].clone(),
                    parent_id,
                },
            )
            .await
            .map_err(|e| ImportError::Materialization {
                context: format!("创建位置失败: {}", prefix_key),
                source: Some(e),
            })?;

        debug!(path = %prefix_key, id = %location.id, "新建位置");
        index.insert(prefix_key, location.id);
        parent_id = Some(location.id);
    }

    index.get(&full_key).ok_or_else(|| {
        ImportError::InternalConsistency(format!("位置路径物化后仍未登记: {}", full_key))
    })
}
