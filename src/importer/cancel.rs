// ==========================================
// 库存目录导入引擎 - 协作式取消
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 导入取消令牌
///
/// 克隆共享同一状态, 导入循环在处理每一行之前检查。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
