use std::collections::HashMap;
use tracing::{info, warn};

use super::shellexpand;

/// Instruction appended to the user's text for the safety classifier.
///
/// Compiled in and never read from disk: the classifier gates crisis
/// handling, so its wording is not user-editable.
pub const SAFETY_CHECK_PROMPT: &str = "Analyze the user's input for:\n\
1. Self-harm or crisis.\n\
2. Sexuality, sex acts, or sexual intimacy topics.\n\
Return a JSON object:\n\
{ \"isSafe\": boolean, \"isRelevant\": boolean, \"isSexualTopic\": boolean }";

/// Bundled system prompt, embedded at compile time.
const BUNDLED_SYSTEM_PROMPT: &str = include_str!("../../../../prompts/SYSTEM_PROMPT.md");

/// Persona prompt sections, loaded from `{data_dir}/prompts/SYSTEM_PROMPT.md`.
///
/// Missing files or sections keep the bundled text.
#[derive(Debug, Clone)]
pub struct Prompts {
    /// Who Grace is.
    pub persona: String,
    /// Hard topic boundaries.
    pub boundaries: String,
    /// Tone and mirroring rules.
    pub style: String,
    /// Trailing control-object format.
    pub protocol: String,
}

impl Default for Prompts {
    fn default() -> Self {
        let sections = parse_markdown_sections(BUNDLED_SYSTEM_PROMPT);
        let get = |key: &str| sections.get(key).cloned().unwrap_or_default();
        Self {
            persona: get("Persona"),
            boundaries: get("Boundaries"),
            style: get("Style"),
            protocol: get("Protocol"),
        }
    }
}

/// Deploy the bundled prompt file to `{data_dir}/prompts/`, creating the directory if needed.
///
/// Never overwrites an existing file so user edits are preserved.
pub fn install_bundled_prompts(data_dir: &str) {
    let expanded = shellexpand(data_dir);
    let dir = std::path::Path::new(&expanded).join("prompts");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!("prompts: failed to create {}: {e}", dir.display());
        return;
    }

    let dest = dir.join("SYSTEM_PROMPT.md");
    if !dest.exists() {
        if let Err(e) = std::fs::write(&dest, BUNDLED_SYSTEM_PROMPT) {
            warn!("prompts: failed to write {}: {e}", dest.display());
        } else {
            info!("prompts: deployed bundled SYSTEM_PROMPT.md");
        }
    }
}

impl Prompts {
    /// Load prompts from `{data_dir}/prompts/SYSTEM_PROMPT.md`.
    pub fn load(data_dir: &str) -> Self {
        let mut prompts = Self::default();
        let dir = shellexpand(data_dir);

        let prompt_path = format!("{dir}/prompts/SYSTEM_PROMPT.md");
        if let Ok(content) = std::fs::read_to_string(&prompt_path) {
            let sections = parse_markdown_sections(&content);
            if let Some(v) = sections.get("Persona") {
                prompts.persona = v.clone();
            }
            if let Some(v) = sections.get("Boundaries") {
                prompts.boundaries = v.clone();
            }
            if let Some(v) = sections.get("Style") {
                prompts.style = v.clone();
            }
            if let Some(v) = sections.get("Protocol") {
                prompts.protocol = v.clone();
            }
            info!("loaded prompts from {prompt_path}");
        }

        prompts
    }

    /// The full system instruction for the persona call.
    pub fn system_instruction(&self) -> String {
        [
            self.persona.as_str(),
            self.boundaries.as_str(),
            self.style.as_str(),
            self.protocol.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n")
    }
}

/// The classifier request text for one user input.
pub fn safety_check_request(input: &str) -> String {
    format!("Input: \"{input}\"\n\n{SAFETY_CHECK_PROMPT}")
}

/// The request sent when the user answers a learning activity.
pub fn activity_reflection_request(
    module_title: &str,
    activity_title: &str,
    activity_content: &str,
    response: &str,
) -> String {
    format!(
        "Context: Learning Module \"{module_title}\"\n\
         Activity: \"{activity_title}\"\n\
         Content: \"{activity_content}\"\n\
         User Response: \"{response}\"\n\n\
         Grace, please respond to the user's choice/reflection. Be encouraging, \
         mentor-like, and broaden their perspective. Keep it brief but deep."
    )
}

/// Parse a markdown file with `## Section` headers into a map of section name -> body.
fn parse_markdown_sections(content: &str) -> HashMap<String, String> {
    let mut sections = HashMap::new();
    let mut current_key: Option<String> = None;
    let mut current_body = String::new();

    for line in content.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            if let Some(key) = current_key.take() {
                let trimmed = current_body.trim().to_string();
                if !trimmed.is_empty() {
                    sections.insert(key, trimmed);
                }
            }
            current_key = Some(header.trim().to_string());
            current_body.clear();
        } else if current_key.is_some() {
            current_body.push_str(line);
            current_body.push('\n');
        }
    }

    if let Some(key) = current_key {
        let trimmed = current_body.trim().to_string();
        if !trimmed.is_empty() {
            sections.insert(key, trimmed);
        }
    }

    sections
}
