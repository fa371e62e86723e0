// ==========================================
// 库存目录导入引擎 - 目录结构模型（位置/标签）
// ==========================================
// 位置: 严格树结构, 根节点无 parent_id
// 标签: 作用域内按名称唯一, 导入引擎只创建不更新
// ==========================================

use crate::domain::types::{LabelId, LocationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ==========================================
// Label - 标签
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCreate {
    pub name: String,
}

// ==========================================
// Location - 位置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub parent_id: Option<LocationId>, // 根节点为 None
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCreate {
    pub name: String,
    pub parent_id: Option<LocationId>,
}

// ==========================================
// LocationTreeNode - 位置树节点
// ==========================================
// 用途: 目录索引构建时的全量树快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTreeNode {
    pub id: LocationId,
    pub name: String,
    pub parent_id: Option<LocationId>,
    pub children: Vec<LocationTreeNode>,
}

impl LocationTreeNode {
    pub fn leaf(id: LocationId, name: impl Into<String>, parent_id: Option<LocationId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
            children: Vec::new(),
        }
    }
}

// 析构不递归: 子树逐层移入栈中释放
impl Drop for LocationTreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// 扁平节点 → 森林（显式栈, 不递归）
///
/// 子节点保持输入顺序。父节点不在输入中的节点作为根。
/// 未能从任何根到达的节点（父链成环）被丢弃。
pub fn assemble_forest(flat: Vec<LocationTreeNode>) -> Vec<LocationTreeNode> {
    let known: HashSet<LocationId> = flat.iter().map(|n| n.id).collect();

    let mut root_ids = Vec::new();
    let mut child_ids: HashMap<LocationId, Vec<LocationId>> = HashMap::new();
    let mut pending: HashMap<LocationId, LocationTreeNode> = HashMap::with_capacity(flat.len());
    for node in flat {
        match node.parent_id {
            Some(parent) if known.contains(&parent) => {
                child_ids.entry(parent).or_default().push(node.id)
            }
            _ => root_ids.push(node.id),
        }
        pending.insert(node.id, node);
    }

    // 先序遍历; 逆序处理即保证子孙先于祖先完成挂载
    let mut preorder = Vec::with_capacity(pending.len());
    let mut stack: Vec<LocationId> = root_ids.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        preorder.push(id);
        if let Some(children) = child_ids.get(&id) {
            stack.extend(children.iter().rev().copied());
        }
    }

    let mut built: HashMap<LocationId, LocationTreeNode> = HashMap::with_capacity(preorder.len());
    for id in preorder.into_iter().rev() {
        let Some(mut node) = pending.remove(&id) else {
            continue;
        };
        if let Some(children) = child_ids.get(&id) {
            node.children = children.iter().filter_map(|c| built.remove(c)).collect();
        }
        built.insert(id, node);
    }

    root_ids
        .iter()
        .filter_map(|id| built.remove(id))
        .collect()
}
