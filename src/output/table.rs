use unicode_width::UnicodeWidthStr;

use crate::link::CrossRefs;
use crate::model::{Conversation, Decision, Episode};
use crate::summary::JourneySummary;
use crate::timeline::{date, TimelineEntry};

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

fn one_line(s: &str) -> String {
    s.replace('\n', " ")
}

/// Print the merged episode/decision timeline.
pub fn print_timeline(entries: &[TimelineEntry<'_>]) {
    if entries.is_empty() {
        println!("No journey data available.");
        return;
    }

    println!(
        "{} timeline entr{}:\n",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" }
    );

    for entry in entries {
        match entry {
            TimelineEntry::Episode { index, episode, key } => {
                println!(
                    "  [{}] EPISODE #{} {}",
                    key,
                    index + 1,
                    truncate(&episode.title, 48)
                );
                println!(
                    "        {} messages, {} decisions",
                    episode.message_count(),
                    episode.decision_count()
                );
            }
            TimelineEntry::Decision { decision, key } => {
                println!(
                    "  [{}] DECISION   {}",
                    key,
                    truncate(&one_line(decision.statement()), 56)
                );
                if let Some(member) = &decision.team_member {
                    println!("        by {member}");
                }
            }
        }
    }
}

/// Print the pure episode sequence for `mjv episodes`.
pub fn print_episode_list(episodes: &[(usize, &Episode)]) {
    if episodes.is_empty() {
        println!("No episodes found.");
        return;
    }

    println!(
        "{} episode{}:\n",
        episodes.len(),
        if episodes.len() == 1 { "" } else { "s" }
    );

    println!("  {:<4} {:<40} {:<13} {:<9} {:<9}", "#", "TITLE", "START", "MESSAGES", "DECISIONS");
    println!("  {}", "-".repeat(78));

    for (index, ep) in episodes {
        println!(
            "  {:<4} {:<40} {:<13} {:<9} {:<9}",
            index + 1,
            truncate(&ep.title, 38),
            date::normalize(ep.start_raw()).to_string(),
            ep.message_count(),
            ep.decision_count(),
        );
        if !ep.conversations.is_empty() {
            println!("       ({} contained messages)", ep.conversations.len());
        }
    }
}

/// Print filtered conversation results, marking decision-linked messages.
pub fn print_conversations(results: &[&Conversation], refs: &CrossRefs<'_>, query: Option<&str>) {
    if results.is_empty() {
        match query {
            Some(q) => println!("No conversations match \"{q}\"."),
            None => println!("No conversations match."),
        }
        return;
    }

    println!(
        "{} conversation{}:\n",
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    );

    for conv in results {
        let when = date::normalize(conv.timestamp.as_deref());
        let sender = conv.sender.as_deref().unwrap_or("(unknown)");
        let role = conv.role.as_deref().unwrap_or("-");
        println!("  [{when}] {sender} ({role})");
        println!(
            "    {}",
            truncate(&one_line(conv.message.as_deref().unwrap_or("")), 76)
        );

        let linked = refs.decisions_for(&conv.id);
        if !linked.is_empty() {
            for d in linked {
                println!("    -> decision: {}", truncate(&one_line(d.statement()), 60));
            }
        }
        println!("    id: {}\n", conv.id);
    }
}

/// Print the decision list for `mjv decisions`.
pub fn print_decision_list(decisions: &[&Decision]) {
    if decisions.is_empty() {
        println!("No decisions found.");
        return;
    }

    println!(
        "{} decision{}:\n",
        decisions.len(),
        if decisions.len() == 1 { "" } else { "s" }
    );

    println!("  {:<13} {:<52} {:<14}", "DATE", "DECISION", "CONVERSATION");
    println!("  {}", "-".repeat(80));

    for d in decisions {
        println!(
            "  {:<13} {:<52} {:<14}",
            date::normalize(d.date_raw()).to_string(),
            truncate(&one_line(d.statement()), 50),
            d.conversation_ref().unwrap_or("-"),
        );
        println!("  id: {}\n", d.id);
    }
}

/// Full traceability detail for one decision: statement, reasoning,
/// trigger, attribution, outcomes, and the originating conversation chain.
pub fn print_decision_detail(
    decision: &Decision,
    conversation: Option<&Conversation>,
    episode_id: Option<&str>,
) {
    println!("Decision: {}", decision.statement());
    println!("  ID:   {}", decision.id);
    println!("  Date: {}", date::normalize(decision.date_raw()));

    if let Some(reasoning) = decision.reasoning() {
        println!("\nReasoning:");
        for line in reasoning.lines() {
            println!("  {line}");
        }
    }

    if let Some(trigger) = decision.trigger_text() {
        println!("\nTriggered by:");
        for line in trigger.lines() {
            println!("  {line}");
        }
    }

    if let Some(member) = &decision.team_member {
        println!("\nTeam member: {member}");
    }

    if !decision.linked_outcomes.is_empty() {
        println!("\nExpected outcomes:");
        for outcome in &decision.linked_outcomes {
            println!("  - {}", truncate(outcome, 76));
        }
    }

    match conversation {
        Some(conv) => {
            println!("\nOriginating conversation ({}):", conv.id);
            println!(
                "  {} ({}): {}",
                conv.sender.as_deref().unwrap_or("(unknown)"),
                conv.role.as_deref().unwrap_or("-"),
                truncate(&one_line(conv.message.as_deref().unwrap_or("")), 64)
            );
            if let Some(ep) = episode_id {
                println!("  episode: {ep}");
            }
        }
        None => println!("\nOriginating conversation: (unlinked)"),
    }
}

/// Print the headline summary block.
pub fn print_summary(summary: &JourneySummary) {
    println!("Journey Summary:");
    println!("  Episodes:               {}", summary.episode_count);
    println!("  Episodes with decisions: {}", summary.decision_episode_count);
    println!("  Messages:               {}", summary.total_messages);
    println!("  Decisions:              {}", summary.total_decisions);
    println!(
        "  Date range:             {} to {}",
        summary.date_span.start, summary.date_span.end
    );
}
