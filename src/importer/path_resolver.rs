// ==========================================
// 库存目录导入引擎 - 位置路径序列化
// ==========================================
// 规则: 路径段以 '/' 连接, 不做转义
// 限制: 路径段内含 '/' 会破坏路径键（行映射阶段已按 '/' 拆分, 不会出现）
// ==========================================

/// 路径分隔符
pub const PATH_SEPARATOR: &str = "/";

/// 路径段 → 规范路径键
pub fn serialize<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_joins_with_slash() {
        assert_eq!(serialize(&["车库", "架子", "抽屉"]), "车库/架子/抽屉");
        assert_eq!(serialize(&["A"]), "A");
    }

    #[test]
    fn test_serialize_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(serialize(&empty), "");
    }

    #[test]
    fn test_separator_inside_segment_collides() {
        // 已知限制: 不转义
        assert_eq!(serialize(&["A/B"]), serialize(&["A", "B"]));
    }

    #[test]
    fn test_serialize_owned_strings() {
        let segments = vec!["A".to_string(), "B".to_string()];
        assert_eq!(serialize(&segments), "A/B");
        assert_eq!(serialize(&segments[..1]), "A");
    }
}
