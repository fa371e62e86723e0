// ==========================================
// 库存目录导入引擎 - 领域类型定义
// ==========================================
// 职责: 标识符新类型 + 资产编号 (AssetId)
// 红线: nil UUID 永远不是合法的持久化标识
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ==========================================
// 标识符新类型
// ==========================================
// 存储层统一以 TEXT(UUID) 落库
macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// 生成新的随机标识 (v4)
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn nil() -> Self {
                Self(Uuid::nil())
            }

            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

uuid_newtype!(
    /// 租户/分组作用域 (Scope)
    GroupId
);
uuid_newtype!(
    /// 位置标识
    LocationId
);
uuid_newtype!(
    /// 标签标识
    LabelId
);
uuid_newtype!(
    /// 物品存储标识（区别于对外展示的 AssetId）
    ItemId
);

// ==========================================
// 资产编号 (Asset ID)
// ==========================================
// 对外展示的顺序整数编号, 0 表示"未设置"
// 展示格式: 000-042
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub i64);

impl AssetId {
    pub const UNSET: AssetId = AssetId(0);

    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }

    /// 下一个编号（高水位 + 1）, 编号空间耗尽时为 None
    pub fn next(&self) -> Option<AssetId> {
        self.0.checked_add(1).map(AssetId)
    }

    /// 解析单元格文本
    ///
    /// # 规则
    /// - 空白 → UNSET
    /// - "000-042" / "42" → 42（仅接受纯数字或 "数字-三位数字"）
    /// - 超出 i64 范围或其他形式 → None
    pub fn parse(value: &str) -> Option<AssetId> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Some(AssetId::UNSET);
        }

        let digits = match trimmed.split_once('-') {
            Some((head, tail)) => {
                if head.is_empty() || tail.len() != 3 || !is_digits(head) || !is_digits(tail) {
                    return None;
                }
                format!("{}{}", head, tail)
            }
            None if is_digits(trimmed) => trimmed.to_string(),
            None => return None,
        };

        digits.parse::<i64>().ok().map(AssetId)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return Ok(());
        }
        let padded = format!("{:06}", self.0);
        let (head, tail) = padded.split_at(padded.len() - 3);
        write!(f, "{}-{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_parse() {
        assert_eq!(AssetId::parse(""), Some(AssetId::UNSET));
        assert_eq!(AssetId::parse("  "), Some(AssetId::UNSET));
        assert_eq!(AssetId::parse("000-042"), Some(AssetId(42)));
        assert_eq!(AssetId::parse("17"), Some(AssetId(17)));
        assert_eq!(AssetId::parse("1234-567"), Some(AssetId(1_234_567)));
        assert_eq!(AssetId::parse("abc"), None);
        assert_eq!(AssetId::parse("-"), None);
    }

    #[test]
    fn test_asset_id_parse_rejects_malformed_dashes() {
        assert_eq!(AssetId::parse("-5"), None);
        assert_eq!(AssetId::parse("1-2"), None);
        assert_eq!(AssetId::parse("1-234-567"), None);
        assert_eq!(AssetId::parse("000-"), None);
        assert_eq!(AssetId::parse("-042"), None);
        assert_eq!(AssetId::parse("12-34a"), None);
    }

    #[test]
    fn test_asset_id_parse_range() {
        assert_eq!(
            AssetId::parse("9223372036854775807"),
            Some(AssetId(i64::MAX))
        );
        assert_eq!(AssetId::parse("9223372036854775808"), None);
    }

    #[test]
    fn test_asset_id_display() {
        assert_eq!(AssetId(42).to_string(), "000-042");
        assert_eq!(AssetId(1_234_567).to_string(), "1234-567");
        assert_eq!(AssetId::UNSET.to_string(), "");
    }

    #[test]
    fn test_asset_id_next() {
        assert_eq!(AssetId(9).next(), Some(AssetId(10)));
        assert_eq!(AssetId::UNSET.next(), Some(AssetId(1)));
        assert_eq!(AssetId(i64::MAX).next(), None);
    }

    #[test]
    fn test_id_newtype_roundtrip() {
        let id = LocationId::new();
        assert!(!id.is_nil());
        let parsed: LocationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!(ItemId::default().is_nil());
    }
}
