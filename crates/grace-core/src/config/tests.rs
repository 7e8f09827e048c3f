use super::*;

#[test]
fn test_defaults_when_sections_missing() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.grace.name, "Grace");
    assert_eq!(cfg.provider.gemini.model, "gemini-3-flash-preview");
    assert!((cfg.provider.gemini.temperature - 0.8).abs() < f32::EPSILON);
    assert!(!cfg.provider.gemini.has_api_key());
    assert_eq!(cfg.beta.codes.len(), 20);
    assert_eq!(cfg.beta.duration_days, 11);
}

#[test]
fn test_gemini_config_from_toml() {
    let toml_str = r#"
        [provider.gemini]
        api_key = "AIza-file"
        model = "gemini-2.0-flash"
        timeout_secs = 15
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.provider.gemini.api_key, "AIza-file");
    assert_eq!(cfg.provider.gemini.model, "gemini-2.0-flash");
    // Classifier model keeps its own default.
    assert_eq!(cfg.provider.gemini.classifier_model, "gemini-3-flash-preview");
    assert_eq!(cfg.provider.gemini.timeout_secs, 15);
}

#[test]
fn test_env_key_overrides_file() {
    let mut cfg = Config::default();
    cfg.provider.gemini.api_key = "from-file".into();
    apply_env_overrides(&mut cfg, |var| match var {
        "API_KEY" => Some("from-env".into()),
        _ => None,
    });
    assert_eq!(cfg.provider.gemini.api_key, "from-env");
}

#[test]
fn test_env_key_precedence_and_blank_values() {
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg, |var| match var {
        "GEMINI_API_KEY" => Some("   ".into()),
        "API_KEY" => Some("second".into()),
        _ => None,
    });
    assert_eq!(cfg.provider.gemini.api_key, "second");

    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg, |_| None);
    assert!(cfg.provider.gemini.api_key.is_empty());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__grace_test__/config.toml").unwrap();
    assert_eq!(cfg.grace.data_dir, "~/.grace");
}

#[test]
fn test_load_rejects_bad_toml() {
    let tmp = std::env::temp_dir().join("__grace_test_bad_config__.toml");
    std::fs::write(&tmp, "[grace\nname = ").unwrap();
    let err = load(tmp.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn test_beta_codes() {
    let beta = BetaConfig::default();
    assert!(beta.accepts("LOOP-BETA-01"));
    assert!(beta.accepts("  LOOP-BETA-20 "));
    assert!(!beta.accepts("LOOP-BETA-21"));
    assert!(!beta.accepts("loop-beta-01"));
    assert!(!beta.accepts(""));
    assert_eq!(beta.window(), chrono::Duration::days(11));
}

#[test]
fn test_bundled_prompt_sections() {
    let prompts = Prompts::default();
    assert!(prompts.persona.contains("You are Grace"));
    assert!(prompts.boundaries.contains("trusted adult"));
    assert!(prompts.protocol.contains("UPDATE_VIBE"));
    let system = prompts.system_instruction();
    assert!(system.starts_with("You are Grace"));
    assert!(system.contains("UNLOCK_SKILL"));
}

#[test]
fn test_prompt_override_keeps_other_sections() {
    let tmp = std::env::temp_dir().join("__grace_test_prompt_override__");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(tmp.join("prompts")).unwrap();
    std::fs::write(
        tmp.join("prompts/SYSTEM_PROMPT.md"),
        "## Persona\nYou are Grace, but shorter.",
    )
    .unwrap();

    let prompts = Prompts::load(tmp.to_str().unwrap());
    assert_eq!(prompts.persona, "You are Grace, but shorter.");
    assert!(prompts.protocol.contains("UPDATE_VIBE"));

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_install_bundled_prompts_never_overwrites() {
    let tmp = std::env::temp_dir().join("__grace_test_bundled_prompts__");
    let _ = std::fs::remove_dir_all(&tmp);

    install_bundled_prompts(tmp.to_str().unwrap());
    let path = tmp.join("prompts/SYSTEM_PROMPT.md");
    assert!(path.exists());
    assert!(std::fs::read_to_string(&path).unwrap().contains("## Persona"));

    std::fs::write(&path, "custom").unwrap();
    install_bundled_prompts(tmp.to_str().unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "custom");

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_safety_check_request_interpolates_input() {
    let req = safety_check_request("I want to hurt myself");
    assert!(req.starts_with("Input: \"I want to hurt myself\""));
    assert!(req.ends_with(SAFETY_CHECK_PROMPT));
}

#[test]
fn test_activity_reflection_request_carries_answer() {
    let req = activity_reflection_request(
        "Starting a conversation",
        "The first move",
        "Someone new sits near you.",
        "Ask about their headphones",
    );
    assert!(req.starts_with("Context: Learning Module \"Starting a conversation\""));
    assert!(req.contains("Activity: \"The first move\""));
    assert!(req.contains("User Response: \"Ask about their headphones\""));
    assert!(req.ends_with("Keep it brief but deep."));
}
