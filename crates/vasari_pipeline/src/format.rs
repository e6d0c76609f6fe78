//! Plain-text rendering of a draft for a chat or console surface.

use serde_json::Value as JsonValue;
use vasari_core::{Draft, Validation};

fn provenance_line(label: &str, fallback: &str, meta: Option<&JsonValue>) -> String {
    let mode = meta
        .and_then(|m| m.get("mode"))
        .and_then(JsonValue::as_str);
    if mode == Some("llm") {
        let provider = meta
            .and_then(|m| m.get("provider"))
            .and_then(JsonValue::as_str)
            .unwrap_or("?");
        let model = meta
            .and_then(|m| m.get("model"))
            .and_then(JsonValue::as_str)
            .unwrap_or("?");
        format!("{label}: {provider}:{model}")
    } else {
        format!("{label}: {fallback}")
    }
}

/// Render a draft with its validation verdict and generation provenance.
///
/// Without a validation the content is presented as fitting, with an
/// unknown limit.
pub fn format_draft_message(draft: &Draft, validation: Option<&Validation>) -> String {
    let (ok, length, limit) = match validation {
        Some(v) => (v.ok, v.length, v.limit.to_string()),
        None => (true, draft.content.chars().count(), "?".to_string()),
    };

    let writer_line = provenance_line("Writer", "template fallback", draft.meta.get("generation"));
    let summary_line = provenance_line("Summary model", "fallback", draft.meta.get("summary_meta"));

    format!(
        "Draft #{} | {} | v{} | status={}\nValidation: {} ({length}/{limit})\n\n{writer_line}\n{summary_line}\n\n{}",
        draft.id,
        draft.platform.tag(),
        draft.version,
        draft.status,
        if ok { "OK" } else { "TOO LONG" },
        draft.content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use vasari_core::{DraftStatus, Platform, validate};

    fn sample_draft(meta: JsonValue) -> Draft {
        Draft {
            id: 7,
            entry_id: 1,
            platform: Platform::X,
            created_at: Utc::now(),
            content: "Shipped it!".to_string(),
            status: DraftStatus::Pending,
            scheduled_at: None,
            meta,
            version: 2,
        }
    }

    #[test]
    fn renders_llm_provenance() {
        let draft = sample_draft(json!({
            "generation": {"mode": "llm", "provider": "openai", "model": "small-1"},
            "summary_meta": {"mode": "fallback"},
        }));
        let validation = validate(&draft.content, 280);
        let message = format_draft_message(&draft, Some(&validation));
        assert!(message.starts_with("Draft #7 | X | v2 | status=pending"));
        assert!(message.contains("Validation: OK (11/280)"));
        assert!(message.contains("Writer: openai:small-1"));
        assert!(message.contains("Summary model: fallback"));
        assert!(message.ends_with("Shipped it!"));
    }

    #[test]
    fn renders_fallback_writer_and_unknown_limit() {
        let draft = sample_draft(json!({}));
        let message = format_draft_message(&draft, None);
        assert!(message.contains("Validation: OK (11/?)"));
        assert!(message.contains("Writer: template fallback"));
    }

    #[test]
    fn flags_over_limit_content() {
        let draft = sample_draft(json!({}));
        let validation = validate(&draft.content, 5);
        let message = format_draft_message(&draft, Some(&validation));
        assert!(message.contains("Validation: TOO LONG (11/5)"));
    }
}
