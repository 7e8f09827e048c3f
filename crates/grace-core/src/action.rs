//! Control actions the model embeds at the tail of a reply.

use serde_json::Value;

use crate::profile::{LearningActivity, ModulePatch, Vibe};

/// An app-level effect requested by the model. Never shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// `UPDATE_VIBE` with a vibe name payload.
    UpdateVibe(Vibe),
    /// `UNLOCK_SKILL` with a partial learning module.
    UnlockSkill(ModulePatch),
    /// `CREATE_ACTIVITY` with `{moduleId, activity}`.
    CreateActivity {
        module_id: String,
        activity: LearningActivity,
    },
    /// A well-formed action whose type or payload this build does not understand.
    Other { kind: String, payload: Value },
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateActivityPayload {
    module_id: String,
    activity: LearningActivity,
}

impl ControlAction {
    /// Build an action from its `type` tag and raw payload. Payloads that do
    /// not match the known shape fall back to [`ControlAction::Other`].
    pub fn from_parts(kind: &str, payload: Value) -> Self {
        let typed = match kind {
            "UPDATE_VIBE" => serde_json::from_value::<Vibe>(payload.clone())
                .ok()
                .map(Self::UpdateVibe),
            "UNLOCK_SKILL" => serde_json::from_value::<ModulePatch>(payload.clone())
                .ok()
                .map(Self::UnlockSkill),
            "CREATE_ACTIVITY" => serde_json::from_value::<CreateActivityPayload>(payload.clone())
                .ok()
                .map(|p| Self::CreateActivity {
                    module_id: p.module_id,
                    activity: p.activity,
                }),
            _ => None,
        };
        typed.unwrap_or_else(|| Self::Other {
            kind: kind.to_string(),
            payload,
        })
    }

    /// The `type` tag as the model wrote it.
    pub fn kind(&self) -> &str {
        match self {
            Self::UpdateVibe(_) => "UPDATE_VIBE",
            Self::UnlockSkill(_) => "UNLOCK_SKILL",
            Self::CreateActivity { .. } => "CREATE_ACTIVITY",
            Self::Other { kind, .. } => kind,
        }
    }

    /// The payload re-encoded as JSON.
    pub fn payload(&self) -> Value {
        match self {
            Self::UpdateVibe(vibe) => serde_json::to_value(vibe).unwrap_or(Value::Null),
            Self::UnlockSkill(patch) => serde_json::to_value(patch).unwrap_or(Value::Null),
            Self::CreateActivity {
                module_id,
                activity,
            } => serde_json::json!({
                "moduleId": module_id,
                "activity": activity,
            }),
            Self::Other { payload, .. } => payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_vibe_parses() {
        let action = ControlAction::from_parts("UPDATE_VIBE", json!("GROWTH"));
        assert_eq!(action, ControlAction::UpdateVibe(Vibe::Growth));
        assert_eq!(action.kind(), "UPDATE_VIBE");
        assert_eq!(action.payload(), json!("GROWTH"));
    }

    #[test]
    fn test_unknown_vibe_keeps_kind() {
        let action = ControlAction::from_parts("UPDATE_VIBE", json!("HAPPY"));
        assert!(matches!(action, ControlAction::Other { .. }));
        assert_eq!(action.kind(), "UPDATE_VIBE");
    }

    #[test]
    fn test_unlock_skill_partial() {
        let action = ControlAction::from_parts("UNLOCK_SKILL", json!({"id": "m2"}));
        match action {
            ControlAction::UnlockSkill(patch) => {
                assert_eq!(patch.id.as_deref(), Some("m2"));
                assert!(patch.title.is_none());
            }
            other => panic!("expected UnlockSkill, got {other:?}"),
        }
    }

    #[test]
    fn test_create_activity() {
        let payload = json!({
            "moduleId": "m1",
            "activity": {
                "id": "dyn-7",
                "type": "REFLECTION",
                "title": "Lunch table",
                "content": "Who did you sit with today?"
            }
        });
        let action = ControlAction::from_parts("CREATE_ACTIVITY", payload);
        match &action {
            ControlAction::CreateActivity {
                module_id,
                activity,
            } => {
                assert_eq!(module_id, "m1");
                assert_eq!(activity.id, "dyn-7");
            }
            other => panic!("expected CreateActivity, got {other:?}"),
        }
        assert_eq!(action.payload()["moduleId"], "m1");
    }

    #[test]
    fn test_missing_payload_is_other() {
        let action = ControlAction::from_parts("CELEBRATE", Value::Null);
        assert_eq!(action.kind(), "CELEBRATE");
        assert_eq!(action.payload(), Value::Null);
    }
}
