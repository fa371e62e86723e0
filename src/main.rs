// ==========================================
// 库存目录导入引擎 - 命令行入口
// ==========================================
// 用法:
//   inventory-import <file> [db_path] [group_id]
//
// - db_path 缺省: 环境变量 INVENTORY_IMPORT_DB_PATH, 其次用户数据目录
// - group_id 缺省: config_kv 中的 cli.default_group_id（首次运行时生成）
// - 成功时向 stdout 输出导入统计 JSON, 日志写入 stderr
// ==========================================

use anyhow::{bail, Context};
use inventory_import::config::ConfigManager;
use inventory_import::repository::CatalogRepositoryImpl;
use inventory_import::{logging, CancellationToken, GroupId, ItemService, APP_NAME, VERSION};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_GROUP_KEY: &str = "cli.default_group_id";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let file_path = match args.next() {
        Some(p) => PathBuf::from(p),
        None => bail!("用法: inventory-import <file> [db_path] [group_id]"),
    };
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);

    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let repo = Arc::new(
        CatalogRepositoryImpl::new(&db_path).with_context(|| format!("无法打开数据库: {}", db_path))?,
    );
    let config = ConfigManager::from_connection(repo.shared_connection())?.with_env_overrides();

    let group_id = match args.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<GroupId>()
            .with_context(|| format!("无效的 group_id: {}", raw))?,
        None => default_group_id(&config)?,
    };
    tracing::info!(group_id = %group_id, "导入作用域");

    // Ctrl-C 请求取消, 当前行完成后停止
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("收到中断信号, 正在取消导入");
                cancel.cancel();
            }
        });
    }

    let service = ItemService::new(repo, Arc::new(config));
    let summary = service
        .import_file(group_id, Path::new(&file_path), &cancel)
        .await
        .with_context(|| format!("导入失败: {}", file_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// 读取或生成命令行默认作用域
fn default_group_id(config: &ConfigManager) -> anyhow::Result<GroupId> {
    if let Some(raw) = config.get_global_config_value(DEFAULT_GROUP_KEY)? {
        if let Ok(id) = raw.parse::<GroupId>() {
            return Ok(id);
        }
        tracing::warn!(raw_value = %raw, "默认作用域配置无效, 重新生成");
    }

    let id = GroupId::new();
    config.set_global_config_value(DEFAULT_GROUP_KEY, &id.to_string())?;
    Ok(id)
}

/// 默认数据库路径
fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("INVENTORY_IMPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./inventory_import.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("inventory-import");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("inventory_import.db");
        }
    }

    path.to_string_lossy().to_string()
}
