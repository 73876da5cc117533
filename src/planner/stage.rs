use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;

/// 阶段数据配置 - 声明所需的记录字段
#[derive(Debug, Clone, Default)]
pub struct StageDataConfig {
    /// 必需字段 - 缺少时执行失败
    pub required_keys: Vec<StateKey>,
    /// 可选字段 - 缺少时不影响执行
    pub optional_keys: Vec<StateKey>,
}

impl StageDataConfig {
    pub fn requires(keys: &[StateKey]) -> Self {
        Self {
            required_keys: keys.to_vec(),
            optional_keys: Vec::new(),
        }
    }

    pub fn with_optional(mut self, keys: &[StateKey]) -> Self {
        self.optional_keys.extend_from_slice(keys);
        self
    }
}

/// 流水线阶段：读取若干字段，产出一个字段
#[async_trait]
pub trait PipelineStage: Send + Sync {
    type Output: Serialize + Send + Sync;

    fn stage_name(&self) -> &'static str;

    fn output_key(&self) -> StateKey;

    fn data_config(&self) -> StageDataConfig;

    async fn run(&self, context: &PlannerContext) -> Result<Self::Output>;

    /// 校验必需字段后执行，并把结果写回共享记录
    async fn execute(&self, context: &PlannerContext) -> Result<()> {
        let config = self.data_config();
        for key in &config.required_keys {
            if !context.has_memory_data(*key).await {
                return Err(anyhow!(
                    "阶段 {} 缺少必需字段 {}",
                    self.stage_name(),
                    key
                ));
            }
        }
        for key in &config.optional_keys {
            if !context.has_memory_data(*key).await {
                debug!(stage = self.stage_name(), key = %key, "可选字段不存在，跳过");
            }
        }

        let output = self.run(context).await?;
        context.store_to_memory(self.output_key(), &output).await?;
        debug!(stage = self.stage_name(), key = %self.output_key(), "阶段结果已写入");
        Ok(())
    }
}

/// 读取必需字段，缺失时报错
pub async fn require<T>(context: &PlannerContext, key: StateKey) -> Result<T>
where
    T: for<'a> serde::Deserialize<'a> + Send + Sync,
{
    context
        .get_from_memory(key)
        .await
        .ok_or_else(|| anyhow!("共享记录中缺少字段 {}", key))
}
