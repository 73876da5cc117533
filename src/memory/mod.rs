use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 一次写入记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteRecord {
    /// `scope:key`
    pub full_key: String,
    pub written_at: DateTime<Utc>,
    pub size: usize,
}

/// Memory元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub access_counts: HashMap<String, u64>,
    pub data_sizes: HashMap<String, usize>,
    pub total_size: usize,
    /// 按写入先后排列的写入记录
    pub writes: Vec<WriteRecord>,
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            last_updated: Utc::now(),
            access_counts: HashMap::new(),
            data_sizes: HashMap::new(),
            total_size: 0,
            writes: Vec::new(),
        }
    }
}

/// 流水线共享记录，按 `scope:key` 存放JSON值
#[derive(Debug)]
pub struct Memory {
    data: HashMap<String, Value>,
    metadata: MemoryMetadata,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

fn full_key(scope: &str, key: &str) -> String {
    format!("{}:{}", scope, key)
}

impl Memory {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            metadata: MemoryMetadata::new(),
        }
    }

    /// 存储数据到指定作用域和键
    pub fn store<T>(&mut self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = full_key(scope, key);
        let serialized = serde_json::to_value(data)?;
        let data_size = serialized.to_string().len();
        let now = Utc::now();

        if let Some(old_size) = self.metadata.data_sizes.get(&full_key) {
            self.metadata.total_size -= old_size;
        }
        self.metadata.data_sizes.insert(full_key.clone(), data_size);
        self.metadata.total_size += data_size;
        self.metadata.last_updated = now;
        self.metadata.writes.push(WriteRecord {
            full_key: full_key.clone(),
            written_at: now,
            size: data_size,
        });

        self.data.insert(full_key, serialized);
        Ok(())
    }

    /// 从指定作用域和键获取数据
    pub fn get<T>(&mut self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a>,
    {
        let full_key = full_key(scope, key);

        *self
            .metadata
            .access_counts
            .entry(full_key.clone())
            .or_insert(0) += 1;

        self.data
            .get(&full_key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// 列出指定作用域的所有键，按首次写入顺序
    pub fn list_keys(&self, scope: &str) -> Vec<String> {
        let prefix = format!("{}:", scope);
        let mut keys: Vec<String> = Vec::new();
        for record in &self.metadata.writes {
            if let Some(key) = record.full_key.strip_prefix(&prefix)
                && !keys.iter().any(|k| k == key)
            {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// 检查是否存在指定数据
    pub fn has_data(&self, scope: &str, key: &str) -> bool {
        self.data.contains_key(&full_key(scope, key))
    }

    /// 全部写入记录，按时间先后
    pub fn write_order(&self) -> &[WriteRecord] {
        &self.metadata.writes
    }

    /// 指定键被读取的次数
    pub fn access_count(&self, scope: &str, key: &str) -> u64 {
        self.metadata
            .access_counts
            .get(&full_key(scope, key))
            .copied()
            .unwrap_or(0)
    }

    /// 获取内存使用统计（按作用域汇总字节数）
    pub fn get_usage_stats(&self) -> HashMap<String, usize> {
        let mut stats = HashMap::new();

        for (key, size) in &self.metadata.data_sizes {
            let scope = key.split(':').next().unwrap_or("unknown").to_string();
            *stats.entry(scope).or_insert(0) += size;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get() {
        let mut memory = Memory::new();
        memory.store("trip", "hotels", vec!["a", "b"]).unwrap();

        let hotels: Option<Vec<String>> = memory.get("trip", "hotels");
        assert_eq!(hotels, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(memory.access_count("trip", "hotels"), 1);
        assert!(memory.has_data("trip", "hotels"));
        assert!(!memory.has_data("trip", "flights"));
        assert!(!memory.has_data("other", "hotels"));
    }

    #[test]
    fn test_get_with_wrong_type_returns_none() {
        let mut memory = Memory::new();
        memory.store("trip", "num_days", 3).unwrap();

        let value: Option<Vec<String>> = memory.get("trip", "num_days");
        assert!(value.is_none());
    }

    #[test]
    fn test_list_keys_follows_write_order() {
        let mut memory = Memory::new();
        memory.store("trip", "weather", 1).unwrap();
        memory.store("timing", "weather", 2).unwrap();
        memory.store("trip", "destination", 3).unwrap();
        memory.store("trip", "weather", 4).unwrap();

        assert_eq!(memory.list_keys("trip"), vec!["weather", "destination"]);
        assert_eq!(memory.write_order().len(), 4);
        assert_eq!(memory.write_order()[1].full_key, "timing:weather");
    }

    #[test]
    fn test_usage_stats_replace_old_sizes() {
        let mut memory = Memory::new();
        memory.store("trip", "expenses", "x".repeat(10)).unwrap();
        memory.store("trip", "expenses", "x".repeat(4)).unwrap();

        let stats = memory.get_usage_stats();
        // JSON字符串带两个引号
        assert_eq!(stats.get("trip"), Some(&6));
    }
}
