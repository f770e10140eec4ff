use tracing::{info, warn};

use super::dto::{SeoRequest, SeoSuggestions};
use super::llm::{generate_json, LlmError, TextGenerator};
use crate::{
    error::AppError,
    validation::{is_blank, non_blank, ValidationErrors},
};

const SYSTEM_PROMPT: &str =
    "You are an SEO assistant. Answer with a single JSON object and nothing else.";

pub fn build_prompt(content: &str, current_url: &str, focus_keyword: Option<&str>) -> String {
    format!(
        r#"You are an SEO expert, and your task is to optimize a blog post for search engines.

Analyze the provided blog content and suggest improvements for:
- Relevant keywords
- Meta description
- URL structure
- Overall suggestions to improve SEO.

Blog Content:
{content}

Current URL: {current_url}

Focus Keyword (if provided): {focus}

Output the suggestions as a JSON object with exactly these fields:
- "suggestedKeywords": an array of keyword strings, most relevant first
- "suggestedMetaDescription": a meta description of at most 160 characters
- "suggestedUrl": a full suggested URL for the post with a lowercase, hyphenated slug
- "suggestions": overall advice to improve SEO, as plain text
"#,
        focus = focus_keyword.unwrap_or(""),
    )
}

/// One request to the model; failures are not retried. The answer is
/// returned as parsed, and the same input may give different suggestions.
pub async fn suggest(
    generator: &dyn TextGenerator,
    req: SeoRequest,
) -> Result<SeoSuggestions, AppError> {
    let mut errors = ValidationErrors::new();
    if is_blank(&req.content) {
        errors.add("content", "Content is required.");
    }
    if is_blank(&req.current_url) {
        errors.add("currentUrl", "Current URL is required.");
    }
    errors.into_result()?;

    let focus = non_blank(req.focus_keyword);
    let prompt = build_prompt(&req.content, req.current_url.trim(), focus.as_deref());

    let suggestions: SeoSuggestions = generate_json(generator, Some(SYSTEM_PROMPT), &prompt)
        .await
        .map_err(AppError::SuggestionGeneration)?;

    if suggestions.suggested_keywords.is_empty() {
        warn!("model answered without keywords");
        return Err(AppError::SuggestionGeneration(LlmError::Malformed(
            "no keywords suggested".into(),
        )));
    }

    info!(
        keywords = suggestions.suggested_keywords.len(),
        "seo suggestions generated"
    );
    Ok(suggestions)
}
