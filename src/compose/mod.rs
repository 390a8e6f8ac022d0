//! Text composition: the completion boundary and everything that drives it.
//!
//! [`Completion`] is the only seam to a language model; production code
//! plugs in the HTTP client behind the `openai` feature, tests plug in a
//! scripted stand-in. On top of it sit the develop pass (one paragraph per
//! top-level block), single-slot regeneration, block generation, and title
//! generation with a local fallback.

use crate::core::{Block, BlockId, Source, clamp_title};
use crate::doc::Draft;
use crate::extract::{self, ExtractError};
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const BLOCKS_MODEL: &str = "gpt-4o";
pub const TITLE_MODEL: &str = "gpt-4o-mini";
pub const EXPAND_MODEL: &str = "gpt-4o-search-preview";

/// Number of blocks a generation pass always yields.
pub const BLOCK_COUNT: usize = 8;

/// One completion call: a single prompt, the model to use, and sampling
/// parameters. Backends that do not support `temperature` for a given model
/// may drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// Failure taxonomy at the completion boundary. Callers branch on the
/// variant to decide between surfacing the error and falling back locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limited: {0}")]
    RateLimit(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A blocking text-completion backend.
pub trait Completion {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("no block at position {0}")]
    InvalidIndex(usize),
}

/// Generates a fresh set of exactly [`BLOCK_COUNT`] blocks for `topic`.
///
/// When `existing` is non-empty the prompt steers the model away from
/// duplicating those blocks, and the new ids continue from the highest id
/// seen so far. Short responses are padded with placeholder blocks and long
/// ones truncated, so the count never varies.
pub fn generate_blocks(
    client: &impl Completion,
    topic: &str,
    existing: &[Block],
) -> Result<Vec<Block>, ComposeError> {
    let request = CompletionRequest {
        prompt: blocks_prompt(topic, existing),
        model: BLOCKS_MODEL.to_string(),
        max_tokens: 2000,
        temperature: Some(0.7),
    };
    let response = client.complete(&request)?;
    let mut seeds = extract::block_seeds(&response)?;

    if seeds.len() < BLOCK_COUNT {
        debug!(got = seeds.len(), "padding generated blocks to full count");
    }
    let mut counter = seeds.len();
    while seeds.len() < BLOCK_COUNT {
        counter += 1;
        seeds.push(extract::BlockSeed {
            title: format!("Additional point {counter}"),
            summary: format!(
                "Consider including additional relevant information or details for your {topic}."
            ),
        });
    }
    seeds.truncate(BLOCK_COUNT);

    let base = existing.iter().map(|b| b.id).max().unwrap_or(0);
    Ok(seeds
        .into_iter()
        .enumerate()
        .map(|(i, seed)| {
            Block::new(base + 1 + i as BlockId, seed.title, seed.summary, Source::Generated)
        })
        .collect())
}

/// Develops the whole draft: one paragraph per top-level block, generated
/// sequentially in display order. Each completed paragraph is committed
/// before the next call, so a mid-pass failure keeps everything finished so
/// far.
pub fn develop(
    draft: &mut Draft,
    client: &impl Completion,
    topic: &str,
) -> Result<(), ComposeError> {
    let tops = draft.store().top_level();
    draft.resize_expansion(tops.len());
    for (slot, id) in tops.into_iter().enumerate() {
        let paragraph = expand_block(draft, client, topic, id)?;
        draft.write_slot(slot, paragraph);
        draft.mark_developed(id);
    }
    Ok(())
}

/// Regenerates the paragraph for the block at `index` in the display order.
///
/// The paragraph belongs to the governing top-level block (the block itself,
/// or its parent when a child was picked). An already developed slot is
/// replaced in place; an undeveloped one gets a new paragraph inserted at
/// its position, leaving neighbours untouched.
pub fn regenerate(
    draft: &mut Draft,
    client: &impl Completion,
    topic: &str,
    index: usize,
) -> Result<(), ComposeError> {
    let id = draft
        .store()
        .ids_in_order()
        .get(index)
        .copied()
        .ok_or(ComposeError::InvalidIndex(index))?;
    let governing = draft.governing(id).ok_or(ComposeError::InvalidIndex(index))?;
    let slot = draft
        .store()
        .top_index(governing)
        .ok_or(ComposeError::InvalidIndex(index))?;

    let paragraph = expand_block(draft, client, topic, governing)?;

    let developed = draft
        .block(governing)
        .map(|b| b.developed)
        .unwrap_or(false);
    if developed {
        draft.write_slot(slot, paragraph);
    } else {
        draft.insert_slot(slot, paragraph);
        draft.mark_developed(governing);
    }
    Ok(())
}

/// Replaces the whole draft text with a single free-form response. Blocks
/// are left untouched.
pub fn freeform(
    draft: &mut Draft,
    client: &impl Completion,
    prompt: &str,
) -> Result<(), ComposeError> {
    let request = CompletionRequest {
        prompt: prompt.to_string(),
        model: BLOCKS_MODEL.to_string(),
        max_tokens: 4000,
        temperature: Some(0.7),
    };
    let response = client.complete(&request)?;
    draft.replace_expansion(vec![response.trim().to_string()]);
    Ok(())
}

/// Titles a piece of user text with the model, falling back to the local
/// heuristic when the call fails or comes back empty. Never errors; a title
/// is always produced.
pub fn generate_title(client: &impl Completion, text: &str) -> String {
    let request = CompletionRequest {
        prompt: title_prompt(text),
        model: TITLE_MODEL.to_string(),
        max_tokens: 20,
        temperature: Some(0.3),
    };
    match client.complete(&request) {
        Ok(response) => {
            let title = response
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim();
            if title.is_empty() {
                title_from_text(text)
            } else {
                clamp_title(title)
            }
        }
        Err(err) => {
            warn!(%err, "title generation failed, using local heuristic");
            title_from_text(text)
        }
    }
}

/// Local titling heuristic: picks the most content-bearing words of the
/// text, title-cases them (keeping well-known acronyms upper-case), and adds
/// an ellipsis when a lot was dropped.
pub fn title_from_text(text: &str) -> String {
    let clean = text.trim();
    let clean_len = clean.chars().count();
    if clean_len <= 20 {
        return clean.to_string();
    }

    let stop_words: BTreeSet<&str> = [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "would",
        "you", "your", "can", "could", "should", "may", "might", "must", "shall",
    ]
    .into_iter()
    .collect();

    let words: Vec<String> = clean
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let important: Vec<String> = words
        .iter()
        .filter(|w| !stop_words.contains(w.as_str()) && w.chars().count() > 2)
        .cloned()
        .collect();

    let (pool, max_words) = if important.len() >= 2 {
        (&important, 4)
    } else {
        (&words, 6)
    };
    let selected = &pool[..max_words.min(pool.len())];
    let mut title = selected
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ");

    // Room to spare: pull in one more word when it still fits.
    if title.chars().count() < 35 && (title.chars().count() as f32) < clean_len as f32 * 0.7 {
        if let Some(next) = pool.get(selected.len()) {
            let candidate = format!("{title} {}", capitalize(next));
            if candidate.chars().count() <= 45 {
                title = candidate;
            }
        }
    }

    if (title.chars().count() as f32) < clean_len as f32 * 0.8 && title.chars().count() < 47 {
        title.push_str("...");
    }

    clamp_title(&title)
}

fn capitalize(word: &str) -> String {
    const ACRONYMS: &[&str] = &["ai", "api", "ui", "ux", "seo", "roi", "ceo", "cto", "hr"];
    if ACRONYMS.contains(&word) {
        return word.to_uppercase();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One completion for one top-level block: a cohesive paragraph weaving in
/// the children when it has any, a plain 1-2 sentence expansion otherwise.
fn expand_block(
    draft: &Draft,
    client: &impl Completion,
    topic: &str,
    id: BlockId,
) -> Result<String, CompletionError> {
    let block = draft.block(id).ok_or_else(|| {
        CompletionError::Malformed(format!("block {id} vanished before expansion"))
    })?;
    let children = draft.store().children_of(id);
    let prompt = if children.is_empty() {
        point_prompt(topic, &block.summary)
    } else {
        let supporting: Vec<&str> = children.iter().map(|c| c.summary.as_str()).collect();
        cohesive_prompt(topic, &block.summary, &supporting)
    };
    let request = CompletionRequest {
        prompt,
        model: EXPAND_MODEL.to_string(),
        max_tokens: 2000,
        temperature: Some(0.7),
    };
    Ok(client.complete(&request)?.trim().to_string())
}

fn blocks_prompt(topic: &str, existing: &[Block]) -> String {
    let avoid = if existing.is_empty() {
        String::new()
    } else {
        let listed = existing
            .iter()
            .map(|b| format!("- {}: {}", b.title, b.summary))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "\n\nIMPORTANT: Generate DIFFERENT blocks from these existing ones. Avoid these topics:\n{listed}\n\nFocus on different aspects, approaches, or sections that complement but don't duplicate the existing blocks."
        )
    };
    format!(
        r#"You are a professional writing assistant. Generate exactly {BLOCK_COUNT} writing blocks for the topic: "{topic}"

Each block should represent a key section or element that someone writing about this topic should consider including.

For each block, provide:
1. A short, descriptive title (2-4 words, like a section heading)
2. A one-line explanation of what content this section should include
{avoid}
CRITICAL: Respond with ONLY a valid JSON array. No additional text, explanations, or markdown formatting.
CRITICAL: Ensure the JSON is complete and properly closed with ].

Format your response exactly like this:
[
  {{
    "title": "Opening greeting",
    "summary": "Start with a warm, professional greeting that sets a positive tone for the conversation."
  }},
  {{
    "title": "Context setting",
    "summary": "Provide background information and establish why you're writing this communication."
  }}
]

Topic: "{topic}"

Generate exactly {BLOCK_COUNT} blocks with specific, actionable guidance for someone writing about this topic. Focus on logical flow and comprehensive coverage. ENSURE the JSON array is complete and properly formatted."#
    )
}

fn cohesive_prompt(topic: &str, topic_sentence: &str, supporting: &[&str]) -> String {
    let bullets = supporting
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");
    let sentences = (supporting.len() + 1) as f32 * 1.5;
    format!(
        r#"You are a clear and concise writer.

Your goal is to write text that sounds natural to read out loud, using simple and direct language while staying polished and credible.
Your task is to expand the following outline into a cohesive paragraph.

Topic sentence: {topic_sentence}
Supporting points: {bullets}

Instructions:
- Create a {sentences} sentence paragraph
- Start with the topic sentence, then expand each supporting point into 1-2 sentences
- Use plain, everyday English (aim for clarity, not elegance)
- Make it flow as one natural paragraph
- Stay consistent with the topic: {topic}

Respond with only the expanded paragraph, no additional commentary or formatting."#
    )
}

fn point_prompt(topic: &str, point: &str) -> String {
    format!(
        r#"You are a clear and concise writer. Your goal is to write text that sounds natural to read out loud, using simple and direct language while staying polished and credible. Your task is to expand the following outline point into 1-2 natural, readable sentences.

Each expansion should:
- Transform the basic point into professional, business language that is easy to read
- Stay consistent and coherent to the overall topic of the writing, which is {topic}

Outline point to expand:
{point}

Instructions:
- Use plain, everyday English (aim for clarity, not elegance)
- Write 1-2 concise sentences for this point
- Avoid fancy words, fillers, jargon, buzzwords, or overly complex phrasing
- Only include real evidence, data, or statistics if the outline point explicitly asks for actual examples or numbers
- When you do include data or evidence, use credible and verifiable sources and cite the source URL clearly in parentheses
- Do NOT fabricate or guess data
- Make sure that the text is coherent with the topic, which is {topic}

Respond with only the expanded text, no additional commentary or formatting."#
    )
}

fn title_prompt(text: &str) -> String {
    format!(
        r#"You are a professional writing assistant. Your task is to create a concise, descriptive title for the following text content. The title should:

1. Be 2-4 words maximum
2. Capture the main topic or theme
3. Use title case (capitalize each word)
4. Be clear and specific
5. Work as a section heading

Text content: "{text}"

Respond with ONLY the title. No quotes, no additional text, no explanations."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_titles_as_itself() {
        assert_eq!(title_from_text("Budget overview"), "Budget overview");
    }

    #[test]
    fn heuristic_keeps_content_words_and_acronyms() {
        let title = title_from_text(
            "the roi of our new seo tooling should be presented to the ceo with care",
        );
        assert!(title.starts_with("ROI"), "got: {title}");
        assert!(title.contains("SEO"), "got: {title}");
        assert!(!title.contains("The "), "got: {title}");
    }

    #[test]
    fn heuristic_drops_two_letter_words_even_known_acronyms() {
        // Word selection filters out anything of two characters or less,
        // so "ai" never reaches the acronym upcaser.
        let title = title_from_text(
            "the roi of our new ai tooling should be presented to the board",
        );
        assert!(!title.contains("AI"), "got: {title}");
        assert!(title.starts_with("ROI"), "got: {title}");
    }

    #[test]
    fn heuristic_marks_heavy_truncation_with_ellipsis() {
        let long = "quarterly revenue projections broken down by region, product line, and customer segment for the upcoming board meeting";
        let title = title_from_text(long);
        assert!(title.ends_with("..."), "got: {title}");
        assert!(title.chars().count() <= 50);
    }

    #[test]
    fn cohesive_prompt_scales_sentence_target() {
        let prompt = cohesive_prompt("cover letter", "I am a strong fit.", &["skills", "history"]);
        assert!(prompt.contains("Create a 4.5 sentence paragraph"));
        assert!(prompt.contains("- skills"));
    }
}
