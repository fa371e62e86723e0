// ==========================================
// 库存目录导入引擎 - 身份判定与资产编号分配
// ==========================================
// 职责:
// - 按导入引用判定行是"更新已有物品"还是"新建"
// - 自增模式下为未设置编号的行分配 高水位 + 1
// 约束: 高水位只在批次开始时查询一次, 批内在进程中推进
// ==========================================

use crate::domain::{AssetId, GroupId, ImportRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::CatalogRepository;

/// 行是否指向已存在的物品
///
/// 无导入引用的行一律视为新建。
pub async fn resolve_identity<R>(repo: &R, group_id: GroupId, row: &ImportRow) -> ImportResult<bool>
where
    R: CatalogRepository + ?Sized,
{
    match row.reference() {
        Some(reference) => repo
            .item_exists_by_reference(group_id, reference)
            .await
            .map_err(|e| ImportError::lookup(format!("检查导入引用失败: {}", reference), e)),
        None => Ok(false),
    }
}

/// 计算行的有效资产编号
///
/// # 返回
/// - Ok((有效编号, 新高水位))
/// - Err(ImportError::AssetIdExhausted): 高水位已是最大编号
pub fn allocate_asset_id(
    row_asset_id: AssetId,
    high_water_mark: AssetId,
    auto_increment: bool,
) -> ImportResult<(AssetId, AssetId)> {
    if auto_increment && row_asset_id.is_unset() {
        let next = high_water_mark
            .next()
            .ok_or(ImportError::AssetIdExhausted(high_water_mark))?;
        Ok((next, next))
    } else {
        Ok((row_asset_id, high_water_mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemCreate;
    use crate::domain::LocationId;
    use crate::importer::mock_repo::MockCatalogRepository;

    #[test]
    fn test_consecutive_unset_rows_get_sequential_ids() {
        let mut hwm = AssetId(10);
        let mut issued = Vec::new();
        for _ in 0..3 {
            let (id, next) = allocate_asset_id(AssetId::UNSET, hwm, true).unwrap();
            issued.push(id);
            hwm = next;
        }

        assert_eq!(issued, vec![AssetId(11), AssetId(12), AssetId(13)]);
        assert_eq!(hwm, AssetId(13));
    }

    #[test]
    fn test_row_supplied_id_does_not_advance_mark() {
        assert_eq!(
            allocate_asset_id(AssetId(500), AssetId(10), true).unwrap(),
            (AssetId(500), AssetId(10))
        );
    }

    #[test]
    fn test_exhausted_mark_is_an_error() {
        let result = allocate_asset_id(AssetId::UNSET, AssetId(i64::MAX), true);
        assert!(matches!(
            result,
            Err(ImportError::AssetIdExhausted(AssetId(i64::MAX)))
        ));

        // 行自带编号时不需要推进高水位
        assert_eq!(
            allocate_asset_id(AssetId(7), AssetId(i64::MAX), true).unwrap(),
            (AssetId(7), AssetId(i64::MAX))
        );
    }

    #[test]
    fn test_disabled_auto_increment_passes_through() {
        assert_eq!(
            allocate_asset_id(AssetId::UNSET, AssetId(10), false).unwrap(),
            (AssetId::UNSET, AssetId(10))
        );
    }

    #[tokio::test]
    async fn test_resolve_identity_by_reference() {
        let repo = MockCatalogRepository::new();
        let group = GroupId::new();
        repo.seed_item(
            group,
            ItemCreate {
                import_ref: Some("ref-1".to_string()),
                name: "电钻".to_string(),
                description: String::new(),
                asset_id: AssetId(1),
                location_id: LocationId::new(),
                label_ids: vec![],
            },
        )
        .await;

        let mut row = ImportRow {
            import_ref: Some("ref-1".to_string()),
            ..Default::default()
        };
        assert!(resolve_identity(&repo, group, &row).await.unwrap());

        row.import_ref = Some("ref-2".to_string());
        assert!(!resolve_identity(&repo, group, &row).await.unwrap());

        row.import_ref = None;
        assert!(!resolve_identity(&repo, group, &row).await.unwrap());
    }

    #[tokio::test]
    async fn test_resolve_identity_lookup_failure() {
        let repo = MockCatalogRepository::new();
        repo.fail_lookups();
        let row = ImportRow {
            import_ref: Some("ref-1".to_string()),
            ..Default::default()
        };

        let result = resolve_identity(&repo, GroupId::new(), &row).await;
        assert!(matches!(result, Err(ImportError::Lookup { .. })));
    }
}
