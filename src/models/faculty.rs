//! 学院对照表
//!
//! 课程代码前缀 → 学院。前缀可能是 2 位或 3 位，3 位前缀优先。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 学院信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faculty {
    pub name: String,
    pub school: String,
}

/// 前缀 → 学院
#[derive(Debug, Clone, Default)]
pub struct FacultyTable {
    by_prefix: HashMap<String, Faculty>,
}

impl FacultyTable {
    /// 从原始对照表构建，键形如 `"AA;AB"`
    pub fn from_grouped(grouped: HashMap<String, Faculty>) -> Self {
        let mut by_prefix = HashMap::new();
        for (keys, faculty) in grouped {
            for key in keys.split(';').map(str::trim).filter(|k| !k.is_empty()) {
                by_prefix.insert(key.to_string(), faculty.clone());
            }
        }
        Self { by_prefix }
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    /// 先按 2 位前缀查找，再用 3 位前缀覆盖
    pub fn resolve(&self, code: &str) -> Option<&Faculty> {
        let mut found = None;
        for len in [2, 3] {
            let Some(prefix) = prefix_of(code, len) else {
                break;
            };
            if let Some(faculty) = self.by_prefix.get(prefix) {
                found = Some(faculty);
            }
        }
        found
    }
}

fn prefix_of(code: &str, len: usize) -> Option<&str> {
    code.char_indices()
        .nth(len)
        .map(|(idx, _)| &code[..idx])
        .or_else(|| (code.chars().count() == len).then_some(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faculty(name: &str) -> Faculty {
        Faculty {
            name: name.to_string(),
            school: String::new(),
        }
    }

    fn table() -> FacultyTable {
        let mut grouped = HashMap::new();
        grouped.insert("SC;CZ".to_string(), faculty("Computing"));
        grouped.insert("MH".to_string(), faculty("Mathematics"));
        grouped.insert("MHX".to_string(), faculty("Maths Exchange"));
        FacultyTable::from_grouped(grouped)
    }

    #[test]
    fn test_semicolon_keys_are_split() {
        let table = table();

        assert_eq!(table.len(), 4);
        assert_eq!(table.resolve("SC1003").unwrap().name, "Computing");
        assert_eq!(table.resolve("CZ2001").unwrap().name, "Computing");
    }

    #[test]
    fn test_longer_prefix_wins() {
        let table = table();

        assert_eq!(table.resolve("MH1100").unwrap().name, "Mathematics");
        assert_eq!(table.resolve("MHX100").unwrap().name, "Maths Exchange");
    }

    #[test]
    fn test_short_or_unknown_codes() {
        let table = table();

        assert!(table.resolve("ZZ9999").is_none());
        assert!(table.resolve("S").is_none());
        assert_eq!(table.resolve("MH").unwrap().name, "Mathematics");
    }
}
