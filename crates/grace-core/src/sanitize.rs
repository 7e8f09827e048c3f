//! Reply sanitizing: pull control payloads out of a raw model completion.
//!
//! The model is asked to append a JSON object such as
//! `{"type":"UPDATE_VIBE","payload":"GROWTH","insight":{...}}` to the end of
//! its reply. Nothing enforces that format, so extraction is tolerant:
//! - a trailing object whose `type` is an UPPER_SNAKE token
//! - failing that, a final JSON segment after a triple newline
//! - any other embedded control object, or a truncated one, is removed
//! - code fences and stray backticks are stripped
//!
//! The returned text never contains a complete or truncated control object,
//! nor a backtick. A brace fragment that is not JSON is left as prose.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::action::ControlAction;

/// Start of an inline control object: `{"type":"SOME_ACTION"`.
static CONTROL_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\s*"type"\s*:\s*"[A-Z_]+""#).expect("valid regex"));

/// A fenced code block, with or without a language tag.
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));

const SEGMENT_SEPARATOR: &str = "\n\n\n";

/// Sanitizer output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedReply {
    /// User-visible text.
    pub text: String,
    /// First control action found, if any.
    pub action: Option<ControlAction>,
    /// Free-form insight attached to the control object.
    pub insight: Option<Value>,
}

impl CleanedReply {
    fn absorb(&mut self, obj: &Map<String, Value>) {
        if self.action.is_none() {
            if let Some(kind) = obj.get("type").and_then(Value::as_str) {
                let payload = obj.get("payload").cloned().unwrap_or(Value::Null);
                self.action = Some(ControlAction::from_parts(kind, payload));
            }
        }
        if self.insight.is_none() {
            if let Some(insight) = obj.get("insight").filter(|v| !v.is_null()) {
                self.insight = Some(insight.clone());
            }
        }
    }
}

/// Clean a raw completion for display.
///
/// Passes repeat until the text stops changing, so cleaning an already
/// cleaned text returns it unchanged.
pub fn clean_response(raw: &str) -> CleanedReply {
    let mut reply = CleanedReply::default();
    let mut text = raw.trim().to_string();
    loop {
        let next = clean_pass(&text, &mut reply);
        if next == text {
            break;
        }
        text = next;
    }
    reply.text = text;
    reply
}

fn clean_pass(text: &str, reply: &mut CleanedReply) -> String {
    let text = if let Some((start, obj)) = trailing_control(text) {
        reply.absorb(&obj);
        text[..start].to_string()
    } else if let Some((head, obj)) = separated_control(text) {
        reply.absorb(&obj);
        head.to_string()
    } else {
        strip_embedded_controls(text, reply)
    };
    strip_code(&text).trim().to_string()
}

/// A control object that runs to the end of the text. Returns the byte
/// offset where it starts.
///
/// Candidates are tried leftmost first so an object whose payload nests
/// another `"type"` key is taken whole. Candidates inside an object already
/// parsed are skipped.
fn trailing_control(text: &str) -> Option<(usize, Map<String, Value>)> {
    let tail = text.trim_end();
    if !tail.ends_with('}') {
        return None;
    }
    let mut covered = 0;
    for m in CONTROL_START.find_iter(tail) {
        if m.start() < covered {
            continue;
        }
        if let Some(Ok((value, end))) = parse_at(tail, m.start()) {
            match value {
                Value::Object(obj) if end == tail.len() => return Some((m.start(), obj)),
                _ => covered = end,
            }
        }
    }
    None
}

/// Parse one JSON value starting at `start`. On success returns the value and
/// the byte offset just past it; the rest of the text is not read.
fn parse_at(text: &str, start: usize) -> Option<Result<(Value, usize), serde_json::Error>> {
    let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
    let parsed = stream.next()?;
    Some(parsed.map(|value| (value, start + stream.byte_offset())))
}

/// The final segment after a triple newline, when it is a JSON object.
fn separated_control(text: &str) -> Option<(&str, Map<String, Value>)> {
    let (head, last) = text.rsplit_once(SEGMENT_SEPARATOR)?;
    let last = last.trim();
    if !(last.starts_with('{') && last.ends_with('}')) {
        return None;
    }
    match serde_json::from_str::<Value>(last) {
        Ok(Value::Object(obj)) => Some((head, obj)),
        _ => None,
    }
}

/// Remove control objects that sit mid-text, and cut a truncated one off at
/// the end. A fragment that is neither stays as written.
fn strip_embedded_controls(text: &str, reply: &mut CleanedReply) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for m in CONTROL_START.find_iter(text) {
        if m.start() < pos {
            continue;
        }
        match parse_at(text, m.start()) {
            Some(Ok((Value::Object(obj), end))) => {
                reply.absorb(&obj);
                out.push_str(&text[pos..m.start()]);
                pos = end;
            }
            Some(Err(e)) if e.is_eof() => {
                out.push_str(&text[pos..m.start()]);
                return out;
            }
            _ => {}
        }
    }
    out.push_str(&text[pos..]);
    out
}

/// Drop fenced blocks, then any backticks left over.
fn strip_code(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").replace('`', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Vibe;

    #[test]
    fn test_plain_text_passes_through() {
        let reply = clean_response("  That sounds like a lot. What happened next?  \n");
        assert_eq!(reply.text, "That sounds like a lot. What happened next?");
        assert!(reply.action.is_none());
        assert!(reply.insight.is_none());
    }

    #[test]
    fn test_trailing_update_vibe_with_insight() {
        let raw = "You handled that really well.\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"GROWTH\",\"insight\":{\"theme\":\"courage\",\"observation\":\"Spoke up at lunch\"}}\n";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "You handled that really well.");
        assert!(!reply.text.contains("UPDATE_VIBE"));
        let action = reply.action.unwrap();
        assert_eq!(action.kind(), "UPDATE_VIBE");
        assert_eq!(action, ControlAction::UpdateVibe(Vibe::Growth));
        assert_eq!(reply.insight.unwrap()["theme"], "courage");
    }

    #[test]
    fn test_unlock_skill_after_triple_newline() {
        let raw = "Great job!\n\n\n{\"type\":\"UNLOCK_SKILL\",\"payload\":{\"id\":\"m2\"}}";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "Great job!");
        let action = reply.action.unwrap();
        assert_eq!(action.kind(), "UNLOCK_SKILL");
        assert_eq!(action.payload(), serde_json::json!({"id": "m2"}));
    }

    #[test]
    fn test_nested_type_key_taken_whole() {
        let raw = "New practice for you!\n{\"type\":\"CREATE_ACTIVITY\",\"payload\":{\"moduleId\":\"m1\",\"activity\":{\"id\":\"d1\",\"type\":\"REFLECTION\",\"title\":\"Bus ride\",\"content\":\"How did it feel?\"}}}";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "New practice for you!");
        assert_eq!(reply.action.unwrap().kind(), "CREATE_ACTIVITY");
    }

    #[test]
    fn test_separator_fallback_for_lowercase_type() {
        let raw = "See you soon.\n\n\n{\"type\":\"celebrate\",\"payload\":null}";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "See you soon.");
        assert_eq!(reply.action.unwrap().kind(), "celebrate");
    }

    #[test]
    fn test_separator_segment_that_is_not_json_stays() {
        let raw = "Here's a thought.\n\n\n{ not json, just braces }";
        let reply = clean_response(raw);
        assert_eq!(reply.text, raw);
        assert!(reply.action.is_none());
    }

    #[test]
    fn test_code_fences_removed() {
        let raw = "Here you go:\n```json\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"CALM\"}\n```\nTake a breath. Also `this`.";
        let reply = clean_response(raw);
        assert!(!reply.text.contains('`'));
        assert!(!reply.text.contains("UPDATE_VIBE"));
        assert!(reply.text.contains("Take a breath. Also this."));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let reply = clean_response("Before\n```\nsome block\n```\nAfter");
        assert_eq!(reply.text, "Before\n\nAfter");
    }

    #[test]
    fn test_truncated_control_never_leaks() {
        let raw = "Nice work today.\n{\"type\":\"UPDATE_VIBE\",\"payl";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "Nice work today.");
        assert!(reply.action.is_none());
    }

    #[test]
    fn test_unparseable_fragment_keeps_following_prose() {
        let raw = "Try starting with {\"type\":\"HELLO\" as a joke. Then ask how their weekend went, and listen closely.";
        let reply = clean_response(raw);
        assert_eq!(reply.text, raw);
        assert!(reply.action.is_none());
    }

    #[test]
    fn test_truncated_string_at_end_is_cut() {
        let raw = "Keep going!\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"GRO";
        assert_eq!(clean_response(raw).text, "Keep going!");
    }

    #[test]
    fn test_many_fragments_before_trailing_control() {
        let mut raw = String::from("Start.");
        for i in 0..500 {
            raw.push_str(&format!(" {{\"type\":\"X\" note {i}."));
        }
        raw.push_str("\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"CALM\"}");
        let reply = clean_response(&raw);
        assert!(reply.text.starts_with("Start."));
        assert!(reply.text.ends_with("note 499."));
        assert_eq!(reply.action, Some(ControlAction::UpdateVibe(Vibe::Calm)));
    }

    #[test]
    fn test_all_mid_text_controls_removed_in_one_pass() {
        let raw = "a {\"type\":\"A\"} b {\"type\":\"B\"} c";
        let mut reply = CleanedReply::default();
        let text = strip_embedded_controls(raw, &mut reply);
        assert_eq!(text, "a  b  c");
        assert_eq!(reply.action.unwrap().kind(), "A");
    }

    #[test]
    fn test_mid_text_control_removed() {
        let raw = "First part. {\"type\":\"UPDATE_VIBE\",\"payload\":\"FLOW\"} Second part.";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "First part.  Second part.");
        assert_eq!(reply.action, Some(ControlAction::UpdateVibe(Vibe::Flow)));
    }

    #[test]
    fn test_fence_hiding_control_then_trailing_object() {
        let raw = "Hi {\"type\":\"UPDATE_VIBE\",\"payload\":\"CALM\"} ```x```";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "Hi");
        assert_eq!(reply.action, Some(ControlAction::UpdateVibe(Vibe::Calm)));
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "plain words",
            "Great job!\n\n\n{\"type\":\"UNLOCK_SKILL\",\"payload\":{\"id\":\"m2\"}}",
            "a {\"type\":\"A\"} b {\"type\":\"B\"}",
            "x\n\n\n{}\n\n\n{}",
            "```\ncode\n``` tail `tick`",
            "Nice.\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"GROWTH\"}\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"FLOW\"}",
        ];
        for raw in samples {
            let once = clean_response(raw).text;
            let twice = clean_response(&once).text;
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_first_extracted_action_wins() {
        let raw = "Nice.\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"GROWTH\"}\n{\"type\":\"UPDATE_VIBE\",\"payload\":\"FLOW\"}";
        let reply = clean_response(raw);
        assert_eq!(reply.text, "Nice.");
        assert_eq!(reply.action, Some(ControlAction::UpdateVibe(Vibe::Flow)));
    }
}
