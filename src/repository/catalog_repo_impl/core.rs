use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::{
    assemble_forest, GroupId, Label, LabelCreate, LabelId, Location, LocationCreate, LocationId,
    LocationTreeNode,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// CatalogRepositoryImpl - 目录仓储（SQLite）
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct CatalogRepositoryImpl {
    pub(super) conn: Arc<Mutex<Connection>>,
}

impl CatalogRepositoryImpl {
    /// 打开数据库文件并建表（幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（调用方负责 PRAGMA 与建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 共享底层连接（供配置管理器等复用）
    pub fn shared_connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 标签
    // ==========================================

    pub(super) fn list_labels(&self, group_id: GroupId) -> RepositoryResult<Vec<Label>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at FROM labels WHERE group_id = ?1 ORDER BY name",
        )?;

        let labels = stmt
            .query_map(params![group_id.to_string()], |row| {
                Ok(Label {
                    id: read_id(row, 0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(labels)
    }

    pub(super) fn insert_label(
        &self,
        group_id: GroupId,
        label: LabelCreate,
    ) -> RepositoryResult<Label> {
        let conn = self.get_conn()?;
        let created = Label {
            id: LabelId::new(),
            name: label.name,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO labels (id, group_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                created.id.to_string(),
                group_id.to_string(),
                created.name,
                created.created_at,
            ],
        )?;

        Ok(created)
    }

    // ==========================================
    // 位置
    // ==========================================

    /// 读取扁平位置表并组装为森林
    ///
    /// 说明: parent_id 指向其他作用域（或不存在）的节点视为根节点
    pub(super) fn load_location_tree(
        &self,
        group_id: GroupId,
    ) -> RepositoryResult<Vec<LocationTreeNode>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, parent_id FROM locations WHERE group_id = ?1 ORDER BY name, created_at",
        )?;

        let flat = stmt
            .query_map(params![group_id.to_string()], |row| {
                Ok(LocationTreeNode::leaf(
                    read_id(row, 0)?,
                    row.get::<_, String>(1)?,
                    read_optional_id(row, 2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assemble_forest(flat))
    }

    pub(super) fn insert_location(
        &self,
        group_id: GroupId,
        location: LocationCreate,
    ) -> RepositoryResult<Location> {
        let conn = self.get_conn()?;
        let created = Location {
            id: LocationId::new(),
            name: location.name,
            parent_id: location.parent_id,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO locations (id, group_id, name, parent_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                created.id.to_string(),
                group_id.to_string(),
                created.name,
                created.parent_id.map(|p| p.to_string()),
                created.created_at,
            ],
        )?;

        Ok(created)
    }

    /// 按表统计作用域内记录数
    pub(super) fn count_in_group(&self, table: &str, group_id: GroupId) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) FROM {} WHERE group_id = ?1", table);
        let count: i64 = conn.query_row(&sql, params![group_id.to_string()], |row| row.get(0))?;
        Ok(count as usize)
    }
}

// ==========================================
// 行映射辅助
// ==========================================

/// 读取 TEXT 列并解析为 UUID 新类型
pub(super) fn read_id<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = uuid::Error>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(super) fn read_optional_id<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = uuid::Error>,
{
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(v) if !v.trim().is_empty() => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        _ => Ok(None),
    }
}
