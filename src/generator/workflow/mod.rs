use crate::config::Config;
use crate::error::{DocsmithError, Result};
use crate::generator::context::GeneratorContext;
use crate::generator::outlet::output_path;
use crate::generator::types::RunResult;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: BTreeMap<String, Instant>,
    phase_durations: BTreeMap<String, Duration>,
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
            phase_start_times: BTreeMap::new(),
            phase_durations: BTreeMap::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations
            .insert(phase_name.to_string(), duration);
        Some(duration)
    }

    /// 获取总执行时间
    pub fn total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 各阶段耗时（毫秒），写入 RunResult
    pub fn phase_millis(&self) -> BTreeMap<String, u64> {
        self.phase_durations
            .iter()
            .map(|(phase, duration)| (phase.clone(), duration.as_millis() as u64))
            .collect()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "total: {:.2}s",
            self.total_duration().as_secs_f64()
        );
        for (phase, duration) in &self.phase_durations {
            report.push_str(&format!(", {}: {:.3}s", phase, duration.as_secs_f64()));
        }
        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const PLAN: &'static str = "plan";
    pub const RESEARCH: &'static str = "research";
    pub const COMPOSE: &'static str = "compose";
    pub const RENDER: &'static str = "render";
}

/// 主题到文档的完整流水线：计划 → 检索汇总 → 成文 → 渲染
#[derive(Clone)]
pub struct Pipeline {
    context: GeneratorContext,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            context: GeneratorContext::new(config)?,
        })
    }

    pub fn from_context(context: GeneratorContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &GeneratorContext {
        &self.context
    }

    /// 执行一次完整运行。输出目录缺省时使用配置中的目录或当前目录，不存在时自动创建。
    pub async fn run(&self, topic: &str, output_dir: Option<&Path>) -> Result<RunResult> {
        let config = &self.context.config;
        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => config.resolve_output_dir(),
        };
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| DocsmithError::filesystem(&output_dir, e))?;

        let mut timing = TimingScope::new();
        tracing::info!(topic, output_dir = %output_dir.display(), "run started");

        timing.start_phase(TimingKeys::PLAN);
        let plan = self.context.planner.plan(topic).await?;
        timing.end_phase(TimingKeys::PLAN);
        tracing::info!(
            title = %plan.article_title,
            steps = plan.research_steps.len(),
            "research plan ready"
        );

        timing.start_phase(TimingKeys::RESEARCH);
        let record = self.context.aggregator().aggregate(topic, &plan).await;
        timing.end_phase(TimingKeys::RESEARCH);
        let failed = record.collected.iter().filter(|c| c.result.is_error()).count();
        tracing::info!(
            collected = record.collected.len(),
            failed,
            facts = record.fact_summaries.len(),
            has_image = record.image_url.is_some(),
            "research finished"
        );

        timing.start_phase(TimingKeys::COMPOSE);
        let article = self.context.composer.compose(&record).await?;
        timing.end_phase(TimingKeys::COMPOSE);
        tracing::info!(sections = article.sections.len(), "article composed");

        timing.start_phase(TimingKeys::RENDER);
        let target = output_path(
            &output_dir,
            &record.article_title,
            &config.document.fallback_file_stem,
        );
        let file_path = self
            .context
            .renderer()
            .render(&article, record.image_url.as_deref(), &target)
            .await?;
        timing.end_phase(TimingKeys::RENDER);

        tracing::info!("run finished ({})", timing.generate_timing_report());

        Ok(RunResult {
            file_path,
            article,
            image_url: record.image_url,
            plan,
            collected: record.collected,
            timings: timing.phase_millis(),
        })
    }

    /// 在后台任务中执行，调用方自行等待结果
    pub fn spawn(&self, topic: impl Into<String>, output_dir: Option<PathBuf>) -> JoinHandle<Result<RunResult>> {
        let pipeline = self.clone();
        let topic = topic.into();
        tokio::spawn(async move { pipeline.run(&topic, output_dir.as_deref()).await })
    }
}

/// 按配置构建流水线并执行一次
pub async fn launch(config: &Config, topic: &str) -> Result<RunResult> {
    config.validate()?;
    let pipeline = Pipeline::new(config.clone())?;
    pipeline.run(topic, None).await
}

#[cfg(test)]
mod tests;
