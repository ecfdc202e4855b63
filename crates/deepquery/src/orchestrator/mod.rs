//! Query orchestrator: plan, execute tools, aggregate sources, stream synthesis
//!
//! One cooperative task drives the whole pipeline per query:
//! `Planning -> Executing(step 1..N) -> Synthesizing -> Done`, with every
//! stage reported incrementally through the event sink. Steps run strictly
//! sequentially; source order is citation order.

pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::sleep;

use crate::config::OrchestratorConfig;
use crate::error::Result;
use crate::providers::llm::LlmProvider;
use crate::retrieval::RetrievalService;
use crate::search::web::WebSearchProvider;
use crate::stream::{EventSink, StreamEvent};
use crate::types::plan::{PlanStep, StepKind};
use crate::types::source::Source;

/// One query to orchestrate
#[derive(Debug, Clone)]
pub struct QueryInput {
    pub prompt: String,
    pub user_id: String,
    pub deep_research: bool,
}

/// The core state machine driving a single query
pub struct Orchestrator {
    llm: Arc<dyn LlmProvider>,
    retrieval: Arc<RetrievalService>,
    web: Arc<dyn WebSearchProvider>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        retrieval: Arc<RetrievalService>,
        web: Arc<dyn WebSearchProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            llm,
            retrieval,
            web,
            config,
        }
    }

    /// Run one query end to end, emitting events into the sink.
    ///
    /// Errors from planning or synthesis abort the run; the caller turns
    /// them into a terminal `error` event. A `StreamClosed` error means the
    /// client went away and the run should end silently.
    pub async fn run(&self, input: &QueryInput, sink: &EventSink) -> Result<()> {
        // Planning: one LLM call, split into numbered steps.
        let plan = self.generate_plan(&input.prompt).await?;
        tracing::info!(
            "Planned {} steps for user {} (deep_research: {})",
            plan.len(),
            input.user_id,
            input.deep_research
        );

        let plan_delay = Duration::from_millis(self.config.plan_delay_ms);
        for step in &plan {
            sink.emit(StreamEvent::Plan(step.text.clone())).await?;
            if !plan_delay.is_zero() {
                sleep(plan_delay).await;
            }
        }

        // Executing: strictly sequential, sources stream out as found.
        let mut sources: Vec<Source> = Vec::new();
        for step in &plan {
            let step_sources = self.execute_step(step, input, sink).await?;
            for source in step_sources {
                sink.emit(StreamEvent::Source(source.clone())).await?;
                sources.push(source);
            }
        }

        // The full evidence block, made inspectable before synthesis starts.
        let context = sources
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        sink.emit(StreamEvent::Context(context)).await?;

        // Synthesizing: token-streamed, cited answer.
        self.synthesize(&input.prompt, &sources, sink).await
    }

    async fn generate_plan(&self, prompt: &str) -> Result<Vec<PlanStep>> {
        let response = self.llm.complete(prompts::PLANNING_PROMPT, prompt).await?;
        Ok(PlanStep::parse_plan(&response))
    }

    /// Execute one plan step, returning the sources it produced.
    ///
    /// Tool progress is reported around the call; inert steps stay silent.
    async fn execute_step(
        &self,
        step: &PlanStep,
        input: &QueryInput,
        sink: &EventSink,
    ) -> Result<Vec<Source>> {
        match step.kind {
            StepKind::InternalSearch => {
                sink.emit(StreamEvent::ToolStart(
                    "Performing internal search...".to_string(),
                ))
                .await?;

                let matches = self
                    .retrieval
                    .search(&input.prompt, &input.user_id, input.deep_research)
                    .await?;

                sink.emit(StreamEvent::ToolEnd(format!(
                    "Found {} relevant documents.",
                    matches.len()
                )))
                .await?;

                Ok(matches
                    .into_iter()
                    .map(|m| Source::internal(m.record.source_url, m.record.text))
                    .collect())
            }
            StepKind::WebSearch => {
                sink.emit(StreamEvent::ToolStart(
                    "Performing web search...".to_string(),
                ))
                .await?;

                if input.deep_research {
                    // Deep research streams the provider's research body
                    // straight through; it yields no discrete sources.
                    self.web.deep_search(&input.prompt, sink).await?;
                    sink.emit(StreamEvent::ToolEnd(
                        "Deep research stream complete.".to_string(),
                    ))
                    .await?;
                    return Ok(Vec::new());
                }

                let results = self.web.normal_search(&input.prompt).await;
                sink.emit(StreamEvent::ToolEnd(format!(
                    "Found {} web results.",
                    results.len()
                )))
                .await?;

                Ok(results
                    .into_iter()
                    .map(|r| Source::web(r.url, r.title, r.content))
                    .collect())
            }
            StepKind::Other => Ok(Vec::new()),
        }
    }

    async fn synthesize(
        &self,
        prompt: &str,
        sources: &[Source],
        sink: &EventSink,
    ) -> Result<()> {
        let source_block = prompts::build_source_block(sources);
        let user_message = prompts::build_user_message(prompt, &source_block);

        let mut tokens = self
            .llm
            .stream(prompts::SYNTHESIS_PROMPT, &user_message)
            .await?;

        while let Some(token) = tokens.next().await {
            sink.emit(StreamEvent::Response(token?)).await?;
        }

        Ok(())
    }
}
