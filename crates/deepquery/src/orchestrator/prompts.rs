//! System prompts and context formatting for the orchestrator

use crate::types::source::Source;

/// Planning system prompt: produce a bare numbered list of tool steps
pub const PLANNING_PROMPT: &str = r#"
You are an expert AI planner. Your job is to create a clear, step-by-step plan to answer a user's prompt.
The user has access to two tools:
1.  **Internal Search**: Searches a private knowledge base of documents.
2.  **Web Search**: Searches the public internet.

Based on the user's prompt, create a numbered list of the steps required to provide a comprehensive answer.
The plan should be a simple numbered list. Do not add any extra commentary.
Prioritize "Internal Search" if the prompt seems related to private or specific knowledge.

Example:
Prompt: "How does our new product compare to competitors?"
Plan:
1. Search internal documents for the new product's specifications.
2. Search the web for the top 3 competitors.
3. Search the web for the features of each competitor.
4. Synthesize a comparative analysis of the features.
"#;

/// Synthesis system prompt: grounded, cited answer over the collected context
pub const SYNTHESIS_PROMPT: &str = r#"
You are an expert AI assistant. Your job is to synthesize a comprehensive, grounded, and cited answer based on the user's prompt and the provided context from internal and web searches.

- Use the provided context to answer the user's prompt.
- Do not make up information. If the context does not provide an answer, state that.
- Cite your sources where appropriate using [Source X] notation, where X is the number of the source.
"#;

/// Synthesis prompt for the validation endpoint: strictly context-bound
pub const VALIDATION_PROMPT: &str = r#"
You are an expert AI assistant. Your job is to synthesize a comprehensive, grounded, and cited answer based on the user's prompt and the provided context.
- Use ONLY the provided context to answer the user's prompt.
- Do not make up information. If the context does not provide an answer, state that.
- This is a validation step, so be concise and stick to the facts presented in the context.
"#;

/// Build the numbered source block handed to synthesis.
///
/// The 1-based position here is the citation index the answer refers to.
pub fn build_source_block(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            format!("[Source {}: {}]\n{}", i + 1, source.display_title(), source.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Build the user message for a synthesis or validation call
pub fn build_user_message(prompt: &str, context: &str) -> String {
    format!("Prompt: {}\n\nContext:\n{}", prompt, context)
}
