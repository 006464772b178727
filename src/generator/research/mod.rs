// 研究阶段
// 1. planner：生成服务给出文章标题与检索查询
// 2. classifier：把每个查询归为图片查询或事实查询
// 3. aggregator：逐步执行检索，汇总为 AggregatedRecord

pub mod aggregator;
pub mod classifier;
pub mod planner;

pub use aggregator::Aggregator;
pub use classifier::{KeywordClassifier, QueryClassifier};
pub use planner::{LlmPlanner, ResearchPlanner, StandInPlanner};
