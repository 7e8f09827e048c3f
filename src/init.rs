//! Init wizard: interactive onboarding with cliclack styled prompts.

use chrono::Utc;
use grace_core::{
    config::{self, install_bundled_prompts},
    profile::Profile,
    shellexpand,
    traits::ProfileRepository,
};
use grace_memory::Store;
use std::path::Path;

/// Avatar ids and the glyph shown for each.
pub const AVATARS: &[(&str, &str)] = &[
    ("wave", "🌊"),
    ("moon", "🌙"),
    ("star", "⭐"),
    ("flower", "🌸"),
    ("butterfly", "🦋"),
    ("palette", "🎨"),
    ("masks", "🎭"),
    ("guitar", "🎸"),
    ("books", "📚"),
    ("controller", "🎮"),
    ("lightning", "⚡"),
    ("rainbow", "🌈"),
];

/// Glyph for an avatar id, or a plain star for unknown ids.
pub fn avatar_glyph(id: &str) -> &'static str {
    AVATARS
        .iter()
        .find(|(aid, _)| *aid == id)
        .map(|(_, glyph)| *glyph)
        .unwrap_or("✦")
}

const LOGO: &str = r#"
      ██████╗ ██████╗  █████╗  ██████╗███████╗
     ██╔════╝ ██╔══██╗██╔══██╗██╔════╝██╔════╝
     ██║  ███╗██████╔╝███████║██║     █████╗
     ██║   ██║██╔══██╗██╔══██║██║     ██╔══╝
     ╚██████╔╝██║  ██║██║  ██║╚██████╗███████╗
      ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝ ╚═════╝╚══════╝
"#;

/// Run the interactive init wizard.
pub async fn run(config_path: &str) -> anyhow::Result<()> {
    println!("{LOGO}");
    cliclack::intro("grace init")?;

    // 1. Generate config.toml.
    if Path::new(config_path).exists() {
        cliclack::log::success(format!("{config_path} — exists"))?;
    } else {
        let api_key: String = cliclack::input("Gemini API key")
            .placeholder("Paste your key (or Enter to use GEMINI_API_KEY later)")
            .required(false)
            .default_input("")
            .interact()?;
        std::fs::write(config_path, generate_config(api_key.trim()))?;
        cliclack::log::success(format!("Generated {config_path}"))?;
    }

    let cfg = config::load(config_path)?;

    // 2. Data directory and prompt file.
    let data_dir = shellexpand(&cfg.grace.data_dir);
    if !Path::new(&data_dir).exists() {
        std::fs::create_dir_all(&data_dir)?;
        cliclack::log::success(format!("{data_dir} — created"))?;
    } else {
        cliclack::log::success(format!("{data_dir} — exists"))?;
    }
    install_bundled_prompts(&cfg.grace.data_dir);

    // 3. Existing profile?
    let store = Store::new(&cfg.memory).await?;
    if let Some(existing) = store.load().await? {
        let restart: bool = cliclack::confirm(format!(
            "A profile for {} already exists. Start over?",
            existing.name
        ))
        .initial_value(false)
        .interact()?;
        if !restart {
            cliclack::outro("Keeping your profile. Run `grace chat` to talk to Grace.")?;
            return Ok(());
        }
        store.clear().await?;
    }

    // 4. Who are you?
    let name: String = cliclack::input("What should Grace call you?")
        .placeholder("First name or nickname")
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a name")
            } else {
                Ok(())
            }
        })
        .interact()?;

    let mut avatar_prompt = cliclack::select("Pick an avatar");
    for (id, glyph) in AVATARS {
        avatar_prompt = avatar_prompt.item(*id, format!("{glyph}  {id}"), "");
    }
    let avatar_id: &str = avatar_prompt.interact()?;

    let pronouns: &str = cliclack::select("Pronouns")
        .item("", "Prefer not to say", "")
        .item("she/her", "she/her", "")
        .item("he/him", "he/him", "")
        .item("they/them", "they/them", "")
        .interact()?;

    // 5. Beta access code.
    let beta = cfg.beta.clone();
    let code: String = cliclack::input("Beta access code")
        .placeholder("LOOP-BETA-..")
        .validate(move |input: &String| {
            if beta.accepts(input) {
                Ok(())
            } else {
                Err("That code isn't on the beta list")
            }
        })
        .interact()?;

    let profile = Profile::new(
        &name,
        &code,
        avatar_id,
        (!pronouns.is_empty()).then(|| pronouns.to_string()),
        Utc::now(),
    );
    store.save(&profile).await?;
    cliclack::log::success(format!(
        "Profile saved — {} {}",
        avatar_glyph(&profile.avatar_id),
        profile.name
    ))?;

    let mut steps = String::from("1. Run: grace chat\n2. Type /quit to leave a chat");
    if !cfg.provider.gemini.has_api_key() {
        steps.push_str("\n★ Set GEMINI_API_KEY or add api_key to config.toml first");
    }
    steps.push_str(&format!(
        "\nYour beta access lasts {} days.",
        cfg.beta.duration_days
    ));
    cliclack::note("Next steps", &steps)?;

    cliclack::outro("Setup complete — Grace is ready when you are.")?;
    Ok(())
}

/// Generate config.toml content from wizard inputs (pure function for testability).
pub fn generate_config(api_key: &str) -> String {
    let key_line = if api_key.is_empty() {
        "api_key = \"\"  # or set GEMINI_API_KEY".to_string()
    } else {
        format!("api_key = \"{api_key}\"")
    };

    format!(
        r#"[grace]
name = "Grace"
data_dir = "~/.grace"
log_level = "info"

[provider.gemini]
{key_line}
model = "gemini-3-flash-preview"
classifier_model = "gemini-3-flash-preview"
temperature = 0.8
timeout_secs = 60

[memory]
db_path = "~/.grace/data/memory.db"

[beta]
duration_days = 11
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_config_with_key() {
        let cfg: config::Config = toml::from_str(&generate_config("AIza-test")).unwrap();
        assert_eq!(cfg.provider.gemini.api_key, "AIza-test");
        assert_eq!(cfg.provider.gemini.model, "gemini-3-flash-preview");
        assert_eq!(cfg.beta.duration_days, 11);
        // Codes keep their default list.
        assert!(cfg.beta.accepts("LOOP-BETA-05"));
    }

    #[test]
    fn test_generate_config_without_key() {
        let text = generate_config("");
        assert!(text.contains("GEMINI_API_KEY"));
        let cfg: config::Config = toml::from_str(&text).unwrap();
        assert!(!cfg.provider.gemini.has_api_key());
        assert_eq!(cfg.memory.db_path, "~/.grace/data/memory.db");
    }

    #[test]
    fn test_avatars_are_unique() {
        let mut ids: Vec<&str> = AVATARS.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), AVATARS.len());
    }

    #[test]
    fn test_avatar_glyph_lookup() {
        assert_eq!(avatar_glyph("moon"), "🌙");
        assert_eq!(avatar_glyph("unknown"), "✦");
    }
}
