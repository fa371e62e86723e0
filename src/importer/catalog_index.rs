// ==========================================
// 库存目录导入引擎 - 目录索引构建
// ==========================================
// 职责: 导入开始时一次性加载标签全集与位置树快照
// 输出: PathIndex (路径键 → 位置 ID) + LabelIndex (标签名 → 标签 ID)
// 约束: 快照不随并发写入方更新, 仅在本次导入内原地扩展
// ==========================================

use crate::domain::{GroupId, LabelId, LocationId, LocationTreeNode};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::path_resolver::serialize;
use crate::repository::CatalogRepository;
use std::collections::HashMap;
use tracing::{debug, warn};

// ==========================================
// PathIndex - 路径索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    entries: HashMap<String, LocationId>,
}

impl PathIndex {
    pub fn get(&self, path_key: &str) -> Option<LocationId> {
        self.entries.get(path_key).copied()
    }

    pub fn contains(&self, path_key: &str) -> bool {
        self.entries.contains_key(path_key)
    }

    /// 插入路径键, 返回被覆盖的旧值
    pub fn insert(&mut self, path_key: String, id: LocationId) -> Option<LocationId> {
        self.entries.insert(path_key, id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// LabelIndex - 标签索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    entries: HashMap<String, LabelId>,
}

impl LabelIndex {
    pub fn get(&self, name: &str) -> Option<LabelId> {
        self.entries.get(name).copied()
    }

    pub fn insert(&mut self, name: String, id: LabelId) -> Option<LabelId> {
        self.entries.insert(name, id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 加载快照并构建两张索引
///
/// # 返回
/// - Err(ImportError::Lookup): 标签或位置树读取失败
pub async fn build_indexes<R>(repo: &R, group_id: GroupId) -> ImportResult<(PathIndex, LabelIndex)>
where
    R: CatalogRepository + ?Sized,
{
    let labels = repo
        .get_all_labels(group_id)
        .await
        .map_err(|e| ImportError::lookup("读取标签全集失败", e))?;

    let mut label_index = LabelIndex::default();
    for label in labels {
        label_index.insert(label.name, label.id);
    }

    let forest = repo
        .get_location_tree(group_id)
        .await
        .map_err(|e| ImportError::lookup("读取位置树失败", e))?;

    let path_index = flatten_location_tree(&forest);

    debug!(
        labels = label_index.len(),
        paths = path_index.len(),
        "目录索引构建完成"
    );

    Ok((path_index, label_index))
}

/// 深度优先展开位置森林（显式栈, 不递归）
///
/// 每个节点（含中间节点）都登记一条路径键。
/// 同名兄弟节点产生相同路径键时, 后访问者覆盖先访问者。
pub fn flatten_location_tree(forest: &[LocationTreeNode]) -> PathIndex {
    let mut index = PathIndex::default();

    // 栈元素: (节点, 父路径键)
    let mut stack: Vec<(&LocationTreeNode, Option<String>)> =
        forest.iter().rev().map(|root| (root, None)).collect();

    while let Some((node, parent_key)) = stack.pop() {
        let key = match parent_key {
            Some(parent) => serialize(&[parent.as_str(), node.name.as_str()]),
            None => node.name.clone(),
        };

        for child in node.children.iter().rev() {
            stack.push((child, Some(key.clone())));
        }

        if let Some(previous) = index.insert(key.clone(), node.id) {
            if previous != node.id {
                warn!(path = %key, previous = %previous, current = %node.id, "位置路径重复, 以后者为准");
            }
        }
    }

    index
}
