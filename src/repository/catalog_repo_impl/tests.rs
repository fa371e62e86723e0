use super::CatalogRepositoryImpl;
use crate::domain::{
    AssetId, GroupId, ItemCreate, ItemField, LabelCreate, LocationCreate, LocationId,
};
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_repo() -> CatalogRepositoryImpl {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    CatalogRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
}

async fn create_root(repo: &CatalogRepositoryImpl, group: GroupId, name: &str) -> LocationId {
    repo.create_location(
        group,
        LocationCreate {
            name: name.to_string(),
            parent_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn test_labels_are_scoped_and_unique() {
    let repo = setup_repo();
    let group = GroupId::new();
    let other = GroupId::new();

    repo.create_label(group, LabelCreate { name: "工具".to_string() })
        .await
        .unwrap();
    repo.create_label(other, LabelCreate { name: "工具".to_string() })
        .await
        .unwrap();

    let dup = repo
        .create_label(group, LabelCreate { name: "工具".to_string() })
        .await;
    assert!(matches!(dup, Err(RepositoryError::UniqueConstraintViolation(_))));

    assert_eq!(repo.get_all_labels(group).await.unwrap().len(), 1);
    assert_eq!(repo.count_labels(other).await.unwrap(), 1);
}

#[tokio::test]
async fn test_location_tree_assembly() {
    let repo = setup_repo();
    let group = GroupId::new();

    let garage = create_root(&repo, group, "车库").await;
    let shelf = repo
        .create_location(
            group,
            LocationCreate {
                name: "架子".to_string(),
                parent_id: Some(garage),
            },
        )
        .await
        .unwrap();
    repo.create_location(
        group,
        LocationCreate {
            name: "抽屉".to_string(),
            parent_id: Some(shelf.id),
        },
    )
    .await
    .unwrap();
    create_root(&repo, group, "阁楼").await;

    let tree = repo.get_location_tree(group).await.unwrap();
    assert_eq!(tree.len(), 2);

    let garage_node = tree.iter().find(|n| n.id == garage).unwrap();
    assert_eq!(garage_node.children.len(), 1);
    assert_eq!(garage_node.children[0].name, "架子");
    assert_eq!(garage_node.children[0].children[0].name, "抽屉");
    assert_eq!(repo.count_locations(group).await.unwrap(), 4);
}

#[tokio::test]
async fn test_create_location_with_unknown_parent_fails() {
    let repo = setup_repo();
    let result = repo
        .create_location(
            GroupId::new(),
            LocationCreate {
                name: "孤儿".to_string(),
                parent_id: Some(LocationId::new()),
            },
        )
        .await;

    assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
}

#[tokio::test]
async fn test_item_create_update_and_reference_lookup() {
    let repo = setup_repo();
    let group = GroupId::new();
    let loc = create_root(&repo, group, "车库").await;
    let label = repo
        .create_label(group, LabelCreate { name: "电动".to_string() })
        .await
        .unwrap();

    let created = repo
        .create_item(
            group,
            ItemCreate {
                import_ref: Some("ref-1".to_string()),
                name: "电钻".to_string(),
                description: String::new(),
                asset_id: AssetId(5),
                location_id: loc,
                label_ids: vec![label.id, label.id],
            },
        )
        .await
        .unwrap();

    assert!(!created.id.is_nil());
    assert_eq!(created.label_ids, vec![label.id]);
    assert!(repo.item_exists_by_reference(group, "ref-1").await.unwrap());
    assert!(!repo.item_exists_by_reference(group, "ref-2").await.unwrap());

    let mut update = crate::domain::ImportRow {
        name: "冲击钻".to_string(),
        quantity: 2,
        purchase_time: NaiveDate::from_ymd_opt(2024, 3, 1),
        ..Default::default()
    }
    .to_item_update(created.id, AssetId(5), loc, vec![]);
    update.fields = vec![ItemField::text("颜色", "蓝"), ItemField::text("功率", "800W")];

    let updated = repo.update_item(group, update).await.unwrap();
    assert_eq!(updated.name, "冲击钻");
    assert_eq!(updated.quantity, 2);
    assert!(updated.label_ids.is_empty());
    assert_eq!(updated.purchase_time, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(updated.fields.len(), 2);
    assert_eq!(updated.fields[1].name, "功率");

    let by_ref = repo.get_item_by_reference(group, "ref-1").await.unwrap();
    assert_eq!(by_ref.id, created.id);

    let missing = repo.get_item_by_reference(group, "nope").await;
    assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
async fn test_highest_asset_id_and_unset_listing() {
    let repo = setup_repo();
    let group = GroupId::new();
    let loc = create_root(&repo, group, "车库").await;

    assert_eq!(repo.get_highest_asset_id(group).await.unwrap(), AssetId::UNSET);

    for (name, aid) in [("a", 3), ("b", 0), ("c", 9), ("d", 0)] {
        repo.create_item(
            group,
            ItemCreate {
                import_ref: None,
                name: name.to_string(),
                description: String::new(),
                asset_id: AssetId(aid),
                location_id: loc,
                label_ids: vec![],
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(repo.get_highest_asset_id(group).await.unwrap(), AssetId(9));

    let unset = repo.get_items_with_unset_asset_id(group).await.unwrap();
    assert_eq!(unset.len(), 2);

    repo.set_asset_id(group, unset[0].id, AssetId(10)).await.unwrap();
    assert_eq!(repo.get_highest_asset_id(group).await.unwrap(), AssetId(10));

    let without_ref = repo.get_item_ids_without_import_ref(group).await.unwrap();
    assert_eq!(without_ref.len(), 4);
    repo.set_import_ref(group, without_ref[0], "abcd1234").await.unwrap();
    assert_eq!(repo.get_item_ids_without_import_ref(group).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_unknown_item_is_not_found() {
    let repo = setup_repo();
    let group = GroupId::new();
    let loc = create_root(&repo, group, "车库").await;

    let update = crate::domain::ImportRow::default().to_item_update(
        crate::domain::ItemId::new(),
        AssetId::UNSET,
        loc,
        vec![],
    );

    let result = repo.update_item(group, update).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}
