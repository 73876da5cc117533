use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::llm::CompletionService;
use crate::memory::Memory;
use crate::planner::memory::{MemoryScope, StateKey};
use crate::services::TravelServices;

#[derive(Clone)]
pub struct PlannerContext {
    /// 文本补全服务，用于费用估算与报告撰写
    pub llm: Arc<dyn CompletionService>,
    /// 第三方数据源
    pub services: TravelServices,
    /// 配置
    pub config: Config,
    /// 流水线共享记录
    pub memory: Arc<RwLock<Memory>>,
}

impl PlannerContext {
    pub fn new(config: Config, llm: Arc<dyn CompletionService>) -> Result<Self> {
        let services = TravelServices::new(&config)?;
        Ok(Self {
            llm,
            services,
            config,
            memory: Arc::new(RwLock::new(Memory::new())),
        })
    }

    /// 存储行程字段
    pub async fn store_to_memory<T>(&self, key: StateKey, data: T) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.store(MemoryScope::TRIP, key.as_str(), data)
    }

    /// 读取行程字段
    pub async fn get_from_memory<T>(&self, key: StateKey) -> Option<T>
    where
        T: for<'a> Deserialize<'a> + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.get(MemoryScope::TRIP, key.as_str())
    }

    pub async fn has_memory_data(&self, key: StateKey) -> bool {
        let memory = self.memory.read().await;
        memory.has_data(MemoryScope::TRIP, key.as_str())
    }

    /// 已写入的行程字段，按首次写入顺序
    pub async fn list_memory_keys(&self) -> Vec<String> {
        let memory = self.memory.read().await;
        memory.list_keys(MemoryScope::TRIP)
    }

    pub async fn get_memory_stats(&self) -> HashMap<String, usize> {
        let memory = self.memory.read().await;
        memory.get_usage_stats()
    }

    /// 记录阶段耗时
    pub async fn record_timing(&self, stage_name: &str, seconds: f64) -> Result<()> {
        let mut memory = self.memory.write().await;
        memory.store(MemoryScope::TIMING, stage_name, seconds)
    }
}
