use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::llm::LLMClient;
use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::outlet::{self, SavedReport};
use crate::planner::stage::PipelineStage;
use crate::planner::stages::{
    AttractionsStage, ExpenseStage, FinalReportStage, FlightsStage, GeocodeStage, HotelsStage,
    NearbyTransportStage, RestaurantsStage, TransportStage, WeatherStage,
};
use crate::planner::state::TravelState;
use crate::types::trip::TripRequest;

/// 时间跟踪作用域，按执行顺序记录各阶段耗时
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: Vec<(String, Instant)>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .push((phase_name.to_string(), Instant::now()));
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let index = self
            .phase_start_times
            .iter()
            .position(|(name, _)| name == phase_name)?;
        let (name, start_time) = self.phase_start_times.remove(index);
        let duration = start_time.elapsed();
        self.phase_durations.push((name, duration));
        Some(duration)
    }

    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 固定顺序的旅行规划流水线
#[derive(Debug, Clone, Default)]
pub struct TravelPipeline {
    include_nearby_transport: bool,
}

impl TravelPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            include_nearby_transport: config.include_nearby_transport,
        }
    }

    /// 阶段执行顺序
    pub fn stage_names(&self) -> Vec<&'static str> {
        let mut names = vec!["geocode", "weather", "hotels", "flights", "transport"];
        if self.include_nearby_transport {
            names.push("nearby_transport");
        }
        names.extend(["restaurants", "attractions", "expense", "final_report"]);
        names
    }

    /// 按顺序执行全部阶段
    pub async fn execute(&self, context: &PlannerContext, timing: &mut TimingScope) -> Result<()> {
        println!("🚀 开始执行旅行规划流程...");

        self.execute_stage(&GeocodeStage, context, timing).await?;
        self.execute_stage(&WeatherStage, context, timing).await?;
        self.execute_stage(&HotelsStage, context, timing).await?;
        self.execute_stage(&FlightsStage, context, timing).await?;
        self.execute_stage(&TransportStage, context, timing).await?;
        if self.include_nearby_transport {
            self.execute_stage(&NearbyTransportStage, context, timing)
                .await?;
        }
        self.execute_stage(&RestaurantsStage, context, timing)
            .await?;
        self.execute_stage(&AttractionsStage, context, timing)
            .await?;
        self.execute_stage(&ExpenseStage, context, timing).await?;
        self.execute_stage(&FinalReportStage, context, timing)
            .await?;

        println!("✓ 旅行规划流程执行完毕");
        Ok(())
    }

    /// 执行单个阶段
    async fn execute_stage<T>(
        &self,
        stage: &T,
        context: &PlannerContext,
        timing: &mut TimingScope,
    ) -> Result<()>
    where
        T: PipelineStage,
    {
        let name = stage.stage_name();
        println!("🤖 执行 {} 阶段...", name);

        timing.start_phase(name);
        stage.execute(context).await?;
        if let Some(duration) = timing.end_phase(name) {
            context
                .record_timing(name, duration.as_secs_f64())
                .await?;
        }

        println!("✓ {} 阶段完成", name);
        Ok(())
    }
}

/// 在已构建的上下文上执行完整流程：写入行程请求、运行流水线、保存产出
pub async fn run(context: &PlannerContext, trip: TripRequest) -> Result<(TravelState, SavedReport)> {
    trip.validate()?;
    let mut timing = TimingScope::new();

    context.store_to_memory(StateKey::TripRequest, &trip).await?;
    TravelPipeline::new(&context.config)
        .execute(context, &mut timing)
        .await?;

    let state = TravelState::collect(context).await?;

    timing.start_phase("output");
    let saved = outlet::save(context, &state).await?;
    timing.end_phase("output");

    info!(memory = ?context.get_memory_stats().await, "共享记录使用情况");
    println!("\n{}", timing.generate_timing_report());
    Ok((state, saved))
}

/// 启动旅行规划工作流
pub async fn launch(config: &Config, trip: TripRequest) -> Result<TravelState> {
    let llm_client = LLMClient::new(&config.llm)?;

    // 启动时检查模型连接
    if config.check_llm_connection {
        llm_client.check_connection().await?;
    }

    let context = PlannerContext::new(config.clone(), Arc::new(llm_client))?;
    let (state, _saved) = run(&context, trip).await?;
    Ok(state)
}

// Include tests
#[cfg(test)]
mod tests;
