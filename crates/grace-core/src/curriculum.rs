//! The built-in learning path every new profile starts with.

use crate::profile::{ActivityType, ChoiceOption, LearningActivity, LearningModule, ModuleStatus};

fn activity(
    id: &str,
    kind: ActivityType,
    title: &str,
    content: &str,
    prompt: Option<&str>,
    options: &[(&str, &str)],
) -> LearningActivity {
    LearningActivity {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        content: content.to_string(),
        prompt: prompt.map(str::to_string),
        options: options
            .iter()
            .map(|(label, feedback)| ChoiceOption {
                label: label.to_string(),
                feedback: feedback.to_string(),
            })
            .collect(),
        is_completed: false,
        user_response: None,
        selected_option_index: None,
        grace_interpretation: None,
        is_dynamic: false,
    }
}

#[allow(clippy::too_many_arguments)]
fn module(
    id: &str,
    title: &str,
    subtitle: &str,
    status: ModuleStatus,
    time_estimate: &str,
    category: &str,
    tag: &str,
    icon: &str,
    intro: &str,
    activities: Vec<LearningActivity>,
) -> LearningModule {
    LearningModule {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        status,
        intro: intro.to_string(),
        time_estimate: time_estimate.to_string(),
        category: category.to_string(),
        tag: tag.to_string(),
        icon: icon.to_string(),
        activities,
        mastery_score: 0,
        current_activity_index: 0,
    }
}

/// Modules `m1` (available), `m2` and `m3` (locked until Grace unlocks them).
pub fn initial_curriculum() -> Vec<LearningModule> {
    use ActivityType::*;

    vec![
        module(
            "m1",
            "Starting a conversation",
            "Low-pressure way to reach out",
            ModuleStatus::Available,
            "8 min",
            "Practice Run",
            "low-stakes",
            "\u{2604}\u{fe0f}",
            "First steps can feel heavy. Let's practice the \"hi\" without the overthinking.",
            vec![
                activity(
                    "a1-1",
                    GuidedChoice,
                    "The Entrance",
                    "You're walking into a room where you only know one person. They are busy talking to someone else. How do you approach the situation?",
                    Some("What's your natural move?"),
                    &[
                        ("Wait by the wall/phone", "This is a common \"safety\" move. It protects you from rejection but keeps you isolated."),
                        ("Interrupt with a joke", "Humor is a great bridge! Just be sure you aren't using it to hide your true self."),
                        ("Join and listen first", "The observer approach! This helps you gauge the vibe before contributing."),
                    ],
                ),
                activity(
                    "a1-2",
                    GuidedChoice,
                    "The Cafeteria",
                    "You see someone from your math class standing alone by the food table. You want to say hi but don't want to be awkward.",
                    Some("Pick your icebreaker strategy:"),
                    &[
                        ("\"Hey, aren't you in my math class? This event is way better than algebra, right?\"", "Shared misery or experience is the fastest way to build a connection."),
                        ("\"I'm just here for the free cookies. Have you tried the chocolate chip ones yet?\"", "Low-stakes, relatable, and opens the door for a simple answer."),
                        ("\"Hi! I'm [Name]. I've seen you around and wanted to say hi.\"", "Direct and confident. It sets a very clear, honest tone for the friendship."),
                    ],
                ),
                activity(
                    "a1-3",
                    Scenario,
                    "The Group Chat Entry",
                    "You just got added to a group chat for a project. Everyone is already joking around. You want to establish a friendly presence without being too much.",
                    Some("What is your first message to the group?"),
                    &[],
                ),
                activity(
                    "a1-4",
                    Scenario,
                    "The Hobby Bridge",
                    "You notice someone at the park wearing a t-shirt for your favorite band. You really want to mention it, but don't want to seem like a creep.",
                    Some("How do you open the conversation using that shared interest as a bridge?"),
                    &[],
                ),
            ],
        ),
        module(
            "m2",
            "The Digital Ghost",
            "When a friend stops responding",
            ModuleStatus::Locked,
            "10 min",
            "Decision Journey",
            "real-life",
            "\u{1f52d}",
            "Cancellation or \"ghosting\" doesn't always mean rejection. Let's look at the possibilities.",
            vec![
                activity(
                    "a2-1",
                    Scenario,
                    "The Seen Receipt",
                    "You sent a text asking to hang out 4 hours ago. It says \"Read\", but there's no reply. What is the first story you tell yourself about why?",
                    Some("Describe the story in your head..."),
                    &[],
                ),
                activity(
                    "a2-2",
                    GuidedChoice,
                    "The Follow-Up Choice",
                    "It's been 24 hours. Still no reply. You see them posting on their story, though. How do you handle your next move?",
                    None,
                    &[
                        ("Send a \"???\" to show you noticed.", "This can feel aggressive or passive-aggressive. It might push them further away if they are overwhelmed."),
                        ("Wait another day. They might just be in a different headspace.", "Patience is a form of respect for their orbit, and your own peace."),
                        ("Send a \"No pressure! Just checking in.\" text.", "This offers a \"safe exit\" for them. It shows you care without demanding their time."),
                    ],
                ),
                activity(
                    "a2-3",
                    Scenario,
                    "The Last-Minute Text",
                    "You are literally dressed and ready to leave when they text: \"hey so sorry, can't make it today. super tired.\" This is the second time this month.",
                    Some("How do you respond in a way that is honest about your disappointment but leaves room for them to explain?"),
                    &[],
                ),
            ],
        ),
        module(
            "m3",
            "Setting Boundaries",
            "Drawing your own orbit",
            ModuleStatus::Locked,
            "12 min",
            "Protection",
            "inner-work",
            "\u{1f6e1}\u{fe0f}",
            "Boundaries aren't walls; they're gates. You decide who comes in and when.",
            vec![
                activity(
                    "a3-1",
                    GuidedChoice,
                    "The Energy Drain",
                    "A friend always vents to you about their problems but never asks how you are. You're feeling drained. What do you say?",
                    None,
                    &[
                        ("\"Hey, I'm a bit overwhelmed right now, can we talk later?\"", "Great way to take a breather and protect your immediate energy."),
                        ("\"I love supporting you, but I need some space to recharge today.\"", "Honest and kind. It establishes that your energy is a finite resource."),
                        ("Just stop replying for a few days", "Effective for distance, but might cause confusion. Directness usually builds more trust."),
                    ],
                ),
                activity(
                    "a3-2",
                    Reflection,
                    "The \"Always On\" Pressure",
                    "Do you feel like you have to reply to texts immediately to be a \"good friend\"? Where does that pressure come from?",
                    Some("Reflect on the digital tether..."),
                    &[],
                ),
                activity(
                    "a3-3",
                    Scenario,
                    "The Borrowed Item",
                    "A friend keeps \"borrowing\" your stuff without asking and doesn't return it on time. You want to keep the friend but stop the borrowing.",
                    Some("How do you bring this up without making it a big fight?"),
                    &[],
                ),
                activity(
                    "a3-4",
                    Reflection,
                    "The I-Statement Builder",
                    "I-statements follow a pattern: \"I feel [Emotion] when [Action] because [Reason].\" Try building one for a situation where a friend is teasing you about something you actually care about.",
                    Some("Construct your I-statement:"),
                    &[],
                ),
            ],
        ),
    ]
}
