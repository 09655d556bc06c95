//! Summarization prompt construction.
//!
//! The prompt tells the week as a narrative: entries appear in recording
//! order with local weekday/time headers, followed by a movement summary when
//! location data exists, followed by the format instructions the response
//! parser understands (see [`crate::parse`]).

use chrono_tz::Tz;
use location_insights::LocationInsights;

use crate::types::TranscriptEntry;

/// System prompt for the summarization model.
pub const SYSTEM_PROMPT: &str = "You are a thoughtful, empathetic AI assistant helping someone reflect \
on their week through their voice diary entries. Provide insightful, supportive analysis that helps \
them understand patterns in their thoughts, emotions, and experiences. When location data is available, \
consider how physical movement and places might relate to their mental and emotional states.";

/// Build the user prompt for a week's summary.
///
/// `tz` is the journal owner's timezone; entry headers are rendered in local
/// time so the model sees the week the way the user lived it.
pub fn build_summary_prompt(
    transcripts: &[TranscriptEntry],
    location: Option<&LocationInsights>,
    tz: Tz,
) -> String {
    let mut prompt = String::from("Here are the diary entries from this person's week:\n\n");

    for (index, entry) in transcripts.iter().enumerate() {
        let local = entry.recorded_at.with_timezone(&tz);
        prompt.push_str(&format!(
            "Entry {} ({} at {}):\n{}\n\n",
            index + 1,
            local.format("%A"),
            local.format("%I:%M %p"),
            entry.text
        ));
    }

    if let Some(insights) = location {
        prompt.push_str(&movement_summary(insights));
    }

    prompt.push_str(
        "Please analyze this week and provide:\n\n\
         1. **SUMMARY**: A thoughtful 2-3 paragraph summary of their week\n\
         2. **MOOD**: Overall mood trend (e.g., \"positive\", \"mixed\", \"stressed\", \"reflective\")\n\
         3. **THEMES**: 3-5 key themes or topics that came up repeatedly\n\
         4. **HIGHLIGHTS**: 2-3 specific moments or insights worth remembering",
    );

    if location.is_some() {
        prompt.push_str(
            "\n5. **LOCATION_INSIGHT**: How their movement patterns might relate to their emotional state or experiences",
        );
    }

    prompt.push_str(
        "\n\nFormat your response as:\n\
         SUMMARY:\n\
         [Your 2-3 paragraph summary]\n\n\
         MOOD: [mood trend]\n\n\
         THEMES: [theme 1], [theme 2], [theme 3]\n\n\
         HIGHLIGHTS:\n\
         - [highlight 1]\n\
         - [highlight 2]\n\
         - [highlight 3]",
    );

    if location.is_some() {
        prompt.push_str("\n\nLOCATION_INSIGHT: [brief insight about movement and mood]");
    }

    prompt
}

/// Render the movement and location block of the prompt.
fn movement_summary(insights: &LocationInsights) -> String {
    let mut block = String::from("\n--- Movement & Location Summary ---\n");

    block.push_str(&format!(
        "- Recorded from {} unique location{}\n",
        insights.total_unique_locations,
        if insights.total_unique_locations == 1 { "" } else { "s" }
    ));
    block.push_str(&format!(
        "- Traveled approximately {:.1}km this week\n",
        insights.distance_traveled_km
    ));
    block.push_str(&format!(
        "- {}% of entries from primary location (likely home)\n",
        insights.time_at_home_percent
    ));

    block.push_str(&format!("- Mobility score: {}/100 ", insights.mobility_score));
    block.push_str(match insights.mobility_score {
        0..=29 => "(stayed mostly in one place)\n",
        30..=69 => "(moderate movement)\n",
        _ => "(high mobility, moved around a lot)\n",
    });

    block.push_str(&format!("- Exploration score: {}/100 ", insights.exploration_score));
    block.push_str(match insights.exploration_score {
        0..=29 => "(stuck to familiar places)\n",
        30..=69 => "(some variety in locations)\n",
        _ => "(explored new places)\n",
    });

    block.push('\n');
    block
}
