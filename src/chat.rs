//! Interactive chat. One conversation, one in-flight message at a time.

use crate::gateway::Gateway;
use crate::init::avatar_glyph;
use chrono::{DateTime, Utc};
use console::style;
use grace_core::{
    config::activity_reflection_request,
    message::{ChatTurn, Reply, Transcript},
    profile::{LearningActivity, ModuleStatus, Profile},
    traits::ProfileRepository,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// Apply a reply's action and insight to the profile. Returns `true` if the
/// profile changed and should be saved.
pub fn apply_reply(profile: &mut Profile, reply: &Reply, now: DateTime<Utc>) -> bool {
    let mut changed = false;
    if let Some(ref action) = reply.action {
        if profile.apply_action(action) {
            info!("profile updated by {}", action.kind());
            changed = true;
        } else {
            info!("ignored control action {}", action.kind());
        }
    }
    if let Some(ref insight) = reply.insight {
        changed |= profile.record_insight(insight, now);
    }
    changed
}

/// A chat bound to one profile and its store.
pub struct ChatSession<R: ProfileRepository> {
    gateway: Gateway,
    repo: R,
    profile: Profile,
    transcript: Transcript,
}

impl<R: ProfileRepository> ChatSession<R> {
    pub fn new(gateway: Gateway, repo: R, profile: Profile) -> Self {
        Self {
            gateway,
            repo,
            profile,
            transcript: Transcript::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Send one message. The reply is recorded in the transcript and any
    /// profile change is saved before returning. A failed save is logged;
    /// the reply is still returned.
    pub async fn send(&mut self, input: &str) -> Reply {
        let history = self.transcript.to_history();
        self.transcript.push(ChatTurn::user(input));

        let reply = self.gateway.handle_message(&history, input).await;
        self.transcript.push(ChatTurn::assistant(&reply));

        if apply_reply(&mut self.profile, &reply, Utc::now()) {
            self.persist().await;
        }
        reply
    }

    /// The activity `/practice` would present next for a module.
    pub fn next_activity(&self, module_id: &str) -> Option<&LearningActivity> {
        self.profile.next_activity(module_id)
    }

    /// Answer the next open activity of a module. Grace reflects on the
    /// answer without chat history, and the activity is marked complete with
    /// the reflection unless the turn was routed to the safety resource.
    pub async fn practice(&mut self, module_id: &str, answer: &str) -> anyhow::Result<Reply> {
        let Some(module) = self.profile.module(module_id) else {
            anyhow::bail!("no module called {module_id}");
        };
        if module.status == ModuleStatus::Locked {
            anyhow::bail!("\"{}\" is still locked", module.title);
        }
        let Some(activity) = self.profile.next_activity(module_id) else {
            anyhow::bail!("\"{}\" has no open activities", module.title);
        };
        let (response, selected) = parse_answer(activity, answer);
        if response.is_empty() {
            anyhow::bail!("empty answer");
        }
        let prompt = activity_reflection_request(
            &module.title,
            &activity.title,
            &activity.content,
            &response,
        );
        let activity_id = activity.id.clone();

        let reply = self.gateway.handle_message(&[], &prompt).await;

        let mut changed = apply_reply(&mut self.profile, &reply, Utc::now());
        if !reply.is_safety_resource {
            if self.profile.complete_activity(
                module_id,
                &activity_id,
                &response,
                selected,
                &reply.text,
            ) {
                info!("completed activity {activity_id} in {module_id}");
                changed = true;
            }
        }
        if changed {
            self.persist().await;
        }
        Ok(reply)
    }

    async fn persist(&self) {
        if let Err(e) = self.repo.save(&self.profile).await {
            error!("failed to save profile: {e}");
        }
    }
}

/// Read an answer line. A number picks the matching option of a guided
/// choice; anything else is a free-text reflection.
pub fn parse_answer(activity: &LearningActivity, line: &str) -> (String, Option<usize>) {
    let line = line.trim();
    if let Some(index) = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|i| *i < activity.options.len())
    {
        return (activity.options[index].label.clone(), Some(index));
    }
    (line.to_string(), None)
}

/// Render an activity for `/practice`.
pub fn format_activity(activity: &LearningActivity) -> String {
    let mut out = format!("{}\n{}\n", activity.title, activity.content);
    if let Some(ref prompt) = activity.prompt {
        out.push_str(&format!("{prompt}\n"));
    }
    for (i, option) in activity.options.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, option.label));
    }
    out
}

/// Render the learning path for `/path`.
pub fn format_path(profile: &Profile) -> String {
    let mut out = format!("Mastery: {}%\n", profile.mastery_progress);
    for module in &profile.learning_path {
        let marker = match module.status {
            ModuleStatus::Completed => "✓",
            ModuleStatus::Available => "○",
            ModuleStatus::Locked => "🔒",
        };
        out.push_str(&format!("  {marker} {} — {}\n", module.id, module.title));
        for activity in &module.activities {
            let tag = if activity.is_dynamic { " (new)" } else { "" };
            out.push_str(&format!("      · {}{tag}\n", activity.title));
        }
    }
    out
}

fn print_reply(reply: &Reply) {
    let label = style("grace ›").magenta().bold();
    if reply.is_safety_resource {
        println!("{label} {}\n", style(&reply.text).red().bold());
    } else {
        println!("{label} {}\n", reply.text);
    }
}

/// Run the interactive loop until `/quit` or end of input.
pub async fn run<R: ProfileRepository>(mut session: ChatSession<R>) -> anyhow::Result<()> {
    let name = session.profile().name.clone();
    println!(
        "{} {}",
        style(avatar_glyph(&session.profile().avatar_id)).bold(),
        style(format!("Hi {name}, Grace is here.")).cyan().bold()
    );
    println!(
        "{}",
        style(
            "Type a message and press Enter. /path shows your orbit, \
             /practice <module> plays its next activity, /quit leaves."
        )
        .dim()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style("you ›").green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input {
            "/quit" | "/exit" => break,
            "/path" => {
                println!("{}", format_path(session.profile()));
                continue;
            }
            _ => {}
        }

        if let Some(module_id) = input.strip_prefix("/practice") {
            let module_id = module_id.trim();
            let Some(activity) = session.next_activity(module_id) else {
                println!(
                    "{}\n",
                    style("Nothing to practice there. Use /path to see open modules.").yellow()
                );
                continue;
            };
            println!("\n{}", format_activity(activity));
            print!("{} ", style("answer ›").green().bold());
            std::io::stdout().flush()?;

            let Some(answer) = lines.next_line().await? else {
                break;
            };
            if answer.trim().is_empty() {
                continue;
            }
            match session.practice(module_id, &answer).await {
                Ok(reply) => print_reply(&reply),
                Err(e) => println!("{}\n", style(e).yellow()),
            }
            continue;
        }

        let reply = session.send(input).await;
        print_reply(&reply);
    }

    info!("chat ended after {} turns", session.transcript().len());
    println!("{}", style("See you soon. ✦").dim());
    Ok(())
}
