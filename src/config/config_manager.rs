// ==========================================
// 库存目录导入引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 优先级: 环境变量 > config_kv(global) > 默认值
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    overrides: HashMap<String, String>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            overrides: HashMap::new(),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn.lock()?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self {
            conn,
            overrides: HashMap::new(),
        })
    }

    /// 叠加环境变量覆写（仅对已定义的环境变量生效）
    pub fn with_env_overrides(mut self) -> Self {
        for (key, env_name) in config_keys::ENV_OVERRIDES {
            if let Ok(value) = std::env::var(env_name) {
                self.overrides.insert(key.to_string(), value);
            }
        }
        self
    }

    /// 进程内覆写单个配置
    pub fn with_override(mut self, key: &str, value: impl Into<String>) -> Self {
        self.overrides.insert(key.to_string(), value.into());
        self
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        if let Some(value) = self.overrides.get(key) {
            return Ok(Some(value.clone()));
        }

        let conn = self.conn.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.conn.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> ImportResult<bool> {
        let value = self
            .get_config_value(key)
            .map_err(|e| ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(match value {
            None => default,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warn!(config_key = key, raw_value = %raw, "布尔配置格式错误，使用默认值");
                default
            }),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn auto_increment_asset_id(&self) -> ImportResult<bool> {
        self.get_bool_or_default(config_keys::AUTO_INCREMENT_ASSET_ID, true)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 资产编号
    pub const AUTO_INCREMENT_ASSET_ID: &str = "item.auto_increment_asset_id";

    /// (配置键, 环境变量名)
    pub const ENV_OVERRIDES: &[(&str, &str)] = &[(
        AUTO_INCREMENT_ASSET_ID,
        "INVENTORY_IMPORT_AUTO_INCREMENT_ASSET_ID",
    )];
}
