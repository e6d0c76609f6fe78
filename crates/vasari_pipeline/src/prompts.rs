//! Style contract and prompt construction.
//!
//! A [`StyleSheet`] carries the writing contract and one draft template per
//! platform. Built-in defaults apply when no style file is supplied;
//! a markdown file can override the contract and any template section.

use std::collections::HashMap;
use strum::IntoEnumIterator;
use vasari_core::Platform;
use vasari_error::{ConfigError, ConfigErrorKind, VasariResult};

const BUILTIN_CONTRACT: &str = "Write concise, clear, first-person social posts. \
Avoid hype, avoid claims you cannot support, and keep practical value high.";

fn builtin_template(platform: Platform) -> &'static str {
    match platform {
        Platform::X => {
            "Transform this diary entry into one X post. Keep it punchy and under the platform limit.\n\
             Diary:\n{entry_text}\n\nSummary:\n{summary}\n\nConstraints:\n{strict_rules}"
        }
        Platform::Threads => {
            "Transform this diary entry into one Threads post. Keep it conversational and concrete.\n\
             Diary:\n{entry_text}\n\nSummary:\n{summary}\n\nConstraints:\n{strict_rules}"
        }
        Platform::LinkedIn => {
            "Transform this diary entry into one LinkedIn post with practical takeaways.\n\
             Diary:\n{entry_text}\n\nSummary:\n{summary}\n\nConstraints:\n{strict_rules}"
        }
    }
}

/// Writing contract plus per-platform draft templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    contract: String,
    templates: HashMap<Platform, String>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            contract: BUILTIN_CONTRACT.to_string(),
            templates: Platform::iter()
                .map(|p| (p, builtin_template(p).to_string()))
                .collect(),
        }
    }
}

impl StyleSheet {
    /// Parse a style markdown document.
    ///
    /// A heading containing "style contract" overrides the contract; a
    /// heading containing "template" and a platform name overrides that
    /// platform's template. Unmatched sections keep the built-in defaults.
    /// A document with no headings becomes the contract wholesale.
    pub fn from_markdown(text: &str) -> Self {
        let mut sheet = Self::default();
        let sections = parse_sections(text);

        if sections.is_empty() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                sheet.contract = trimmed.to_string();
            }
            return sheet;
        }

        for (title, body) in &sections {
            if title.contains("style contract") && !body.is_empty() {
                sheet.contract = body.clone();
                break;
            }
        }
        for platform in Platform::iter() {
            let name = platform.to_string();
            for (title, body) in &sections {
                if title.contains("template") && title.contains(&name) && !body.is_empty() {
                    sheet.templates.insert(platform, body.clone());
                    break;
                }
            }
        }
        sheet
    }

    /// Load a style markdown file.
    pub fn load(path: impl AsRef<std::path::Path>) -> VasariResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(ConfigErrorKind::FileRead(format!(
                "{}: {e}",
                path.as_ref().display()
            )))
        })?;
        Ok(Self::from_markdown(&text))
    }

    /// The writing contract text.
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// System prompt wrapping the contract.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a social writing assistant. Follow this style contract exactly when possible:\n\n{}",
            self.contract
        )
    }

    /// Summarization prompt for an entry.
    pub fn summary_prompt(&self, entry_text: &str) -> String {
        format!(
            "Summarize this diary entry in 2-3 sentences. \
             Preserve concrete facts, remove fluff, and do not invent details.\n\n\
             Diary entry:\n{entry_text}"
        )
    }

    /// Draft prompt for one platform, from its template.
    pub fn draft_prompt(
        &self,
        platform: Platform,
        entry_text: &str,
        summary: &str,
        is_strict: bool,
        limit: usize,
    ) -> String {
        let template = self
            .templates
            .get(&platform)
            .map(String::as_str)
            .unwrap_or_else(|| builtin_template(platform));
        template
            .replace("{entry_text}", entry_text)
            .replace("{summary}", summary)
            .replace("{strict_rules}", &strict_rules(is_strict, limit))
            .replace("{platform}", &platform.to_string())
            .replace("{char_limit}", &limit.to_string())
    }
}

fn strict_rules(is_strict: bool, limit: usize) -> String {
    if is_strict {
        format!("Hard limit: {limit} chars. Use conservative wording, no risky claims.")
    } else {
        format!("Hard limit: {limit} chars. Keep tone natural and practical.")
    }
}

fn parse_sections(text: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_end();
        let hashes = trimmed.chars().take_while(|c| *c == '#').count();
        if (1..=6).contains(&hashes)
            && trimmed.chars().nth(hashes).is_some_and(char::is_whitespace)
        {
            let title = trimmed[hashes..].trim().to_lowercase();
            sections.push((title, String::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    for (_, body) in &mut sections {
        *body = body.trim().to_string();
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_platform() {
        let sheet = StyleSheet::default();
        for platform in Platform::iter() {
            let prompt = sheet.draft_prompt(platform, "raw", "sum", false, 280);
            assert!(prompt.contains("raw"));
            assert!(prompt.contains("sum"));
            assert!(prompt.contains("Hard limit: 280 chars"));
        }
    }

    #[test]
    fn strictness_changes_constraint_wording() {
        let sheet = StyleSheet::default();
        let strict = sheet.draft_prompt(Platform::X, "t", "s", true, 100);
        let relaxed = sheet.draft_prompt(Platform::X, "t", "s", false, 100);
        assert!(strict.contains("no risky claims"));
        assert!(relaxed.contains("natural and practical"));
    }

    #[test]
    fn markdown_overrides_contract_and_templates() {
        let sheet = StyleSheet::from_markdown(
            "# Style Contract\nBe terse.\n\n## X Template\nPost about {summary}\n",
        );
        assert_eq!(sheet.contract(), "Be terse.");
        let prompt = sheet.draft_prompt(Platform::X, "t", "shipping", false, 280);
        assert_eq!(prompt, "Post about shipping");
        // Unmatched platforms keep the builtin.
        let threads = sheet.draft_prompt(Platform::Threads, "t", "s", false, 500);
        assert!(threads.contains("Threads post"));
    }

    #[test]
    fn headingless_document_becomes_the_contract() {
        let sheet = StyleSheet::from_markdown("Just one plain paragraph.\n");
        assert_eq!(sheet.contract(), "Just one plain paragraph.");
    }
}
