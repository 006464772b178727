use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::generator::compose::{ArticleComposer, LlmComposer, StandInComposer};
use crate::generator::outlet::{
    DocxRenderer, HttpImageFetcher, ImageFetcher, StandInImageFetcher,
};
use crate::generator::research::{
    Aggregator, KeywordClassifier, LlmPlanner, QueryClassifier, ResearchPlanner, StandInPlanner,
};
use crate::llm::client::build_generation_client;
use crate::search::{WebSearch, build_web_search};

/// 流水线各阶段使用的服务实现。
/// 替身模式与真实服务的选择只在这里发生一次。
#[derive(Clone)]
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    pub planner: Arc<dyn ResearchPlanner>,
    pub search: Arc<dyn WebSearch>,
    pub classifier: Arc<dyn QueryClassifier>,
    pub composer: Arc<dyn ArticleComposer>,
    pub image_fetcher: Arc<dyn ImageFetcher>,
}

impl GeneratorContext {
    /// 按配置创建上下文
    pub fn new(config: Config) -> Result<Self> {
        let search = build_web_search(&config);
        let classifier: Arc<dyn QueryClassifier> = Arc::new(KeywordClassifier::default());

        if config.stand_in {
            tracing::info!("stand-in mode: no network calls will be made");
            return Ok(Self {
                planner: Arc::new(StandInPlanner::new(config.language)),
                composer: Arc::new(StandInComposer::new(config.language)),
                image_fetcher: Arc::new(StandInImageFetcher::default()),
                search,
                classifier,
                config,
            });
        }

        let generation = build_generation_client(&config.generation)?;
        Ok(Self {
            planner: Arc::new(LlmPlanner::new(generation.clone(), &config)),
            composer: Arc::new(LlmComposer::new(generation, &config)),
            image_fetcher: Arc::new(HttpImageFetcher::new(&config.document)),
            search,
            classifier,
            config,
        })
    }

    /// 替换查询分类器
    pub fn with_classifier(mut self, classifier: Arc<dyn QueryClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(
            self.search.clone(),
            self.classifier.clone(),
            self.config.search.results_per_query,
            self.config.fact_summary_cap,
        )
    }

    pub fn renderer(&self) -> DocxRenderer {
        DocxRenderer::new(
            self.image_fetcher.clone(),
            self.config.document.clone(),
            self.config.language,
        )
    }
}
