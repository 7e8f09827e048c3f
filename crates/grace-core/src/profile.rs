//! The user profile: identity, current vibe, learning path, and recorded insights.
//!
//! Serialized with the same camelCase field names the web client stored, so a
//! profile exported from the browser loads unchanged.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::ControlAction;
use crate::curriculum::initial_curriculum;

/// Emotional tone of the session, steered by the model through `UPDATE_VIBE`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vibe {
    #[default]
    Calm,
    Growth,
    Protection,
    Flow,
}

impl Vibe {
    /// Lowercase name for display.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Calm => "calm",
            Self::Growth => "growth",
            Self::Protection => "protection",
            Self::Flow => "flow",
        }
    }
}

/// Availability of a learning module.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModuleStatus {
    #[default]
    Locked,
    Available,
    Completed,
}

/// Kind of a learning activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Reading,
    Scenario,
    Reflection,
    MilestonePrompt,
    AskGrace,
    GuidedChoice,
}

/// One selectable answer of a guided-choice activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub feedback: String,
}

/// A single step inside a learning module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_interpretation: Option<String>,
    /// Created by the model at runtime rather than shipped in the curriculum.
    #[serde(default)]
    pub is_dynamic: bool,
}

/// A curriculum unit made of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub status: ModuleStatus,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub time_estimate: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub activities: Vec<LearningActivity>,
    #[serde(default)]
    pub mastery_score: u32,
    #[serde(default)]
    pub current_activity_index: usize,
}

/// Partial module carried by an `UNLOCK_SKILL` action. Absent fields keep
/// whatever the profile already has.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ModuleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<LearningActivity>>,
}

impl ModulePatch {
    fn apply_to(self, module: &mut LearningModule) {
        module.status = match self.status {
            Some(status) => status,
            // Unlocking never demotes a finished module.
            None if module.status == ModuleStatus::Completed => ModuleStatus::Completed,
            None => ModuleStatus::Available,
        };
        if let Some(v) = self.title {
            module.title = v;
        }
        if let Some(v) = self.subtitle {
            module.subtitle = v;
        }
        if let Some(v) = self.intro {
            module.intro = v;
        }
        if let Some(v) = self.time_estimate {
            module.time_estimate = v;
        }
        if let Some(v) = self.category {
            module.category = v;
        }
        if let Some(v) = self.tag {
            module.tag = v;
        }
        if let Some(v) = self.icon {
            module.icon = v;
        }
        if let Some(v) = self.activities {
            module.activities = v;
        }
    }

    /// Build a brand-new module. Needs at least an id and a title.
    fn into_module(self) -> Option<LearningModule> {
        let id = self.id.clone()?;
        let title = self.title.clone()?;
        let mut module = LearningModule {
            id,
            title,
            subtitle: String::new(),
            status: ModuleStatus::Available,
            intro: String::new(),
            time_estimate: String::new(),
            category: String::new(),
            tag: String::new(),
            icon: String::new(),
            activities: Vec::new(),
            mastery_score: 0,
            current_activity_index: 0,
        };
        self.apply_to(&mut module);
        Some(module)
    }
}

/// Something Grace noticed about the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub theme: String,
    pub observation: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// The persisted user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    /// The beta access code the profile was created with.
    pub recovery_key: String,
    #[serde(default)]
    pub avatar_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    #[serde(default)]
    pub current_vibe: Vibe,
    #[serde(default = "initial_curriculum")]
    pub learning_path: Vec<LearningModule>,
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub mastery_progress: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub join_date: DateTime<Utc>,
}

impl Profile {
    /// Create a fresh profile with the initial curriculum.
    pub fn new(
        name: &str,
        recovery_key: &str,
        avatar_id: &str,
        pronouns: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            recovery_key: recovery_key.trim().to_string(),
            avatar_id: avatar_id.to_string(),
            pronouns,
            current_vibe: Vibe::default(),
            learning_path: initial_curriculum(),
            insights: Vec::new(),
            mastery_progress: 0,
            join_date: now,
        }
    }

    /// Look up a module by id.
    pub fn module(&self, id: &str) -> Option<&LearningModule> {
        self.learning_path.iter().find(|m| m.id == id)
    }

    /// Apply a control action emitted by the model. Returns `true` if the
    /// profile changed and should be saved.
    pub fn apply_action(&mut self, action: &ControlAction) -> bool {
        let changed = match action {
            ControlAction::UpdateVibe(vibe) => {
                let changed = self.current_vibe != *vibe;
                self.current_vibe = *vibe;
                changed
            }
            ControlAction::UnlockSkill(patch) => self.unlock(patch.clone()),
            ControlAction::CreateActivity {
                module_id,
                activity,
            } => self.add_activity(module_id, activity.clone()),
            ControlAction::Other { .. } => false,
        };
        if changed {
            self.refresh_mastery();
        }
        changed
    }

    fn unlock(&mut self, patch: ModulePatch) -> bool {
        let Some(id) = patch.id.clone() else {
            return false;
        };
        if let Some(module) = self.learning_path.iter_mut().find(|m| m.id == id) {
            let before = module.clone();
            patch.apply_to(module);
            return *module != before;
        }
        match patch.into_module() {
            Some(module) => {
                self.learning_path.push(module);
                true
            }
            None => false,
        }
    }

    fn add_activity(&mut self, module_id: &str, mut activity: LearningActivity) -> bool {
        let Some(module) = self.learning_path.iter_mut().find(|m| m.id == module_id) else {
            return false;
        };
        if module.activities.iter().any(|a| a.id == activity.id) {
            return false;
        }
        activity.is_dynamic = true;
        module.activities.push(activity);
        true
    }

    /// Record an insight payload. Accepts an object with `theme` and
    /// `observation` strings, or a bare string observation.
    pub fn record_insight(&mut self, insight: &Value, now: DateTime<Utc>) -> bool {
        let (theme, observation) = match insight {
            Value::String(s) => ("general".to_string(), s.trim().to_string()),
            Value::Object(map) => {
                let theme = map
                    .get("theme")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or("general")
                    .to_string();
                let observation = map
                    .get("observation")
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
                (theme, observation)
            }
            _ => return false,
        };
        if observation.is_empty() {
            return false;
        }
        self.insights.push(Insight {
            theme,
            observation,
            timestamp: now,
        });
        true
    }

    /// Recompute `mastery_progress` as the percentage of completed modules.
    pub fn refresh_mastery(&mut self) {
        let total = self.learning_path.len();
        if total == 0 {
            self.mastery_progress = 0;
            return;
        }
        let done = self
            .learning_path
            .iter()
            .filter(|m| m.status == ModuleStatus::Completed)
            .count();
        self.mastery_progress = (done * 100 / total) as u32;
    }

    /// The first unfinished activity of an unlocked module.
    pub fn next_activity(&self, module_id: &str) -> Option<&LearningActivity> {
        self.module(module_id)
            .filter(|m| m.status != ModuleStatus::Locked)?
            .activities
            .iter()
            .find(|a| !a.is_completed)
    }

    /// Record the user's answer to an activity and Grace's reading of it.
    ///
    /// Returns `false` for an unknown or locked module, or an unknown
    /// activity. When every activity of the module is done the module is
    /// marked completed and mastery is recomputed.
    pub fn complete_activity(
        &mut self,
        module_id: &str,
        activity_id: &str,
        response: &str,
        selected_option_index: Option<usize>,
        interpretation: &str,
    ) -> bool {
        let Some(module) = self
            .learning_path
            .iter_mut()
            .find(|m| m.id == module_id && m.status != ModuleStatus::Locked)
        else {
            return false;
        };
        let Some(activity) = module.activities.iter_mut().find(|a| a.id == activity_id) else {
            return false;
        };
        activity.is_completed = true;
        activity.user_response = Some(response.to_string());
        activity.selected_option_index = selected_option_index;
        activity.grace_interpretation = Some(interpretation.to_string());

        let total = module.activities.len();
        let done = module.activities.iter().filter(|a| a.is_completed).count();
        module.mastery_score = (done * 100 / total) as u32;
        module.current_activity_index = module
            .activities
            .iter()
            .position(|a| !a.is_completed)
            .unwrap_or(total);
        if done == total {
            module.status = ModuleStatus::Completed;
        }
        self.refresh_mastery();
        true
    }

    /// Whether the beta window that started at `join_date` has closed.
    pub fn is_beta_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.join_date >= window
    }
}
