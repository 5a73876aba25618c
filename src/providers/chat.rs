/*!
 * Translation on top of chat-style LLM APIs.
 *
 * LLM vendors have no batch endpoint. With `merge` off every text is sent
 * on its own; with `merge` on a batch goes out as one prompt in which each
 * text sits under a `<<ENTRY_n>>` marker, and the reply is split on the
 * same markers. A reply that cannot be split back falls back to one call
 * per text.
 */

use async_trait::async_trait;
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::{TranslationResult, META_MODEL};
use crate::errors::ProviderError;
use crate::language_utils::display_language;

// @const: Entry marker line in merged prompts and replies
static ENTRY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*<<ENTRY_(\d+)>>[ \t]*\r?$").unwrap()
});

const END_MARKER: &str = "<<END>>";

/// A chat completion backend
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Registry key of the provider
    fn provider_name(&self) -> &str;

    /// Model used for completions
    fn model(&self) -> &str;

    /// Whether batches are merged into one prompt
    fn merge(&self) -> bool;

    /// URL of the completion endpoint
    fn completion_url(&self) -> Result<Url, ProviderError>;

    /// Run one completion and return the reply text
    async fn complete(&self, url: Url, system: &str, user: &str) -> Result<String, ProviderError>;
}

/// Instruction for translating a single text
pub fn system_prompt(target_language: &str, source_language: Option<&str>) -> String {
    let direction = match source_language {
        Some(source) => format!("from {} to {}", display_language(source), display_language(target_language)),
        None => format!("to {}", display_language(target_language)),
    };
    format!(
        "You are a translator. Translate the following text {}. Provide only the translation, no explanations.",
        direction
    )
}

/// Instruction for translating a merged batch
pub fn merged_system_prompt(target_language: &str, source_language: Option<&str>) -> String {
    format!(
        "{} The text is split into entries, each introduced by a marker line such as <<ENTRY_0>>. \
         Reply with every marker line unchanged, each followed by the translation of its entry, \
         and finish with {}.",
        system_prompt(target_language, source_language),
        END_MARKER
    )
}

/// Join texts into one marked-up prompt
pub fn merged_prompt(texts: &[String]) -> String {
    let mut prompt = String::new();
    for (i, text) in texts.iter().enumerate() {
        prompt.push_str(&format!("<<ENTRY_{}>>\n{}\n", i, text));
    }
    prompt.push_str(END_MARKER);
    prompt
}

/// Split a merged reply back into one text per entry.
///
/// Returns `None` unless markers 0..expected appear exactly once each and in
/// order, each followed by some text.
pub fn split_merged_reply(reply: &str, expected: usize) -> Option<Vec<String>> {
    let body = match reply.find(END_MARKER) {
        Some(end) => &reply[..end],
        None => reply,
    };

    let markers: Vec<(usize, usize, usize)> = ENTRY_MARKER
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str().parse::<usize>().ok()?;
            Some((number, whole.start(), whole.end()))
        })
        .collect();

    if markers.len() != expected {
        return None;
    }

    let mut segments = Vec::with_capacity(expected);
    for (position, (number, _, content_start)) in markers.iter().enumerate() {
        if *number != position {
            return None;
        }
        let content_end = markers.get(position + 1).map(|next| next.1).unwrap_or(body.len());
        let segment = body[*content_start..content_end].trim();
        if segment.is_empty() {
            return None;
        }
        segments.push(segment.to_string());
    }

    Some(segments)
}

/// Translate one text through a chat backend
pub async fn translate_one<C: ChatCompletion + ?Sized>(
    chat: &C,
    text: &str,
    target_language: &str,
    source_language: Option<&str>,
) -> TranslationResult {
    let provider = chat.provider_name();
    let reply = match chat.completion_url() {
        Ok(url) => chat.complete(url, &system_prompt(target_language, source_language), text).await,
        Err(e) => Err(e),
    };

    let reply = reply.and_then(|reply| {
        let reply = reply.trim();
        if reply.is_empty() {
            Err(ProviderError::ParseError("empty completion".to_string()))
        } else {
            Ok(reply.to_string())
        }
    });

    match reply {
        Ok(translated) => TranslationResult::success(
            text,
            translated,
            source_language.unwrap_or_default(),
            target_language,
            provider,
        )
        .with_metadata(META_MODEL, chat.model()),
        Err(e) => {
            error!("{} translation error: {}", provider, e);
            TranslationResult::passthrough(text, target_language, provider, &e)
        }
    }
}

/// Translate texts one call at a time
async fn translate_each<C: ChatCompletion + ?Sized>(
    chat: &C,
    texts: &[String],
    target_language: &str,
    source_language: Option<&str>,
) -> Vec<TranslationResult> {
    let mut results = Vec::with_capacity(texts.len());
    for text in texts {
        results.push(translate_one(chat, text, target_language, source_language).await);
    }
    results
}

/// Translate a batch through a chat backend, merging it when enabled
pub async fn translate_batch<C: ChatCompletion + ?Sized>(
    chat: &C,
    texts: &[String],
    target_language: &str,
    source_language: Option<&str>,
) -> Result<Vec<TranslationResult>, ProviderError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let url = chat.completion_url()?;
    if !chat.merge() || texts.len() == 1 {
        return Ok(translate_each(chat, texts, target_language, source_language).await);
    }

    let provider = chat.provider_name();
    let system = merged_system_prompt(target_language, source_language);
    match chat.complete(url, &system, &merged_prompt(texts)).await {
        Ok(reply) => match split_merged_reply(&reply, texts.len()) {
            Some(segments) => {
                debug!("{} merged batch of {} entries", provider, texts.len());
                Ok(texts
                    .iter()
                    .zip(segments)
                    .map(|(text, translated)| {
                        TranslationResult::success(
                            text.as_str(),
                            translated,
                            source_language.unwrap_or_default(),
                            target_language,
                            provider,
                        )
                        .with_metadata(META_MODEL, chat.model())
                    })
                    .collect())
            }
            None => {
                warn!(
                    "{} merged reply did not match {} entries, translating one by one",
                    provider,
                    texts.len()
                );
                Ok(translate_each(chat, texts, target_language, source_language).await)
            }
        },
        Err(e) => {
            error!("{} batch translation error: {}", provider, e);
            Ok(TranslationResult::passthrough_all(texts, target_language, provider, &e)
                .into_iter()
                .map(|result| result.with_metadata(META_MODEL, chat.model()))
                .collect())
        }
    }
}
