// --- Default value functions ---

pub(super) fn default_name() -> String {
    "Grace".to_string()
}
pub(super) fn default_data_dir() -> String {
    "~/.grace".to_string()
}
pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_gemini_model() -> String {
    "gemini-3-flash-preview".to_string()
}
pub(super) fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
pub(super) fn default_temperature() -> f32 {
    0.8
}
pub(super) fn default_timeout_secs() -> u64 {
    60
}
pub(super) fn default_db_path() -> String {
    "~/.grace/data/memory.db".to_string()
}
pub(super) fn default_beta_codes() -> Vec<String> {
    (1..=20).map(|n| format!("LOOP-BETA-{n:02}")).collect()
}
pub(super) fn default_beta_duration_days() -> i64 {
    11
}
