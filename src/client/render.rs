use crate::domain::message::Message;
use std::fmt::Write as _;
use time::OffsetDateTime;
use time::macros::format_description;

/// Clears the terminal and moves the cursor home.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Human-friendly age of a message relative to `now`.
#[must_use]
pub fn format_timestamp(timestamp: OffsetDateTime, now: OffsetDateTime) -> String {
    let minutes = (now - timestamp).whole_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    timestamp
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| timestamp.date().to_string())
}

fn initial(sender: &str) -> String {
    sender.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

/// Renders the whole conversation for `current_user`.
///
/// The current user's messages are right-aligned within `width` columns; the
/// other participant's are left-aligned.
#[must_use]
pub fn render_feed(messages: &[Message], current_user: &str, now: OffsetDateTime, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hi, {current_user}!  (/help for commands)");
    let _ = writeln!(out, "{}", "─".repeat(width));

    if messages.is_empty() {
        let _ = writeln!(out, "{:^width$}", "No messages yet");
        let _ = writeln!(out, "{:^width$}", "Start a conversation");
        return out;
    }

    for message in messages {
        let own = message.sender == current_user;
        let badge = initial(&message.sender);
        let age = format_timestamp(message.timestamp, now);

        for line in message.text.lines() {
            if own {
                let _ = writeln!(out, "{:>width$}", format!("{line} [{badge}]"));
            } else {
                let _ = writeln!(out, "[{badge}] {line}");
            }
        }

        if own {
            let _ = writeln!(out, "{age:>width$}");
        } else {
            let _ = writeln!(out, "    {age}");
        }
    }

    out
}
