//! Terminal output for the CLI and the chat loop.
//!
//! Every line has a colored form and a plain form (`--no-color`, pipes).
//! The plain form uses bracketed tags so scripted callers can grep it.

use crate::types::{ConversationTurn, Role};
use owo_colors::OwoColorize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy)]
enum Tone {
    Good,
    Note,
    Warn,
    Bad,
    Muted,
    Strong,
    Accent,
}

pub struct Output {
    pub colored: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.colored {
            return text.to_string();
        }
        match tone {
            Tone::Good => text.green().to_string(),
            Tone::Note => text.blue().to_string(),
            Tone::Warn => text.yellow().to_string(),
            Tone::Bad => text.red().to_string(),
            Tone::Muted => text.dimmed().to_string(),
            Tone::Strong => text.bright_white().bold().to_string(),
            Tone::Accent => text.bright_cyan().bold().to_string(),
        }
    }

    /// `marker` in color, `[tag]` without.
    fn tag(&self, marker: &str, tag: &str, tone: Tone) -> String {
        if self.colored {
            self.paint(marker, tone).bold().to_string()
        } else {
            format!("[{tag}]")
        }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}\n",
                self.paint("☎ switchboard", Tone::Accent),
                self.paint(&version, Tone::Muted)
            );
        } else {
            println!("\n   switchboard {version}\n");
        }
    }

    pub fn success(&self, message: &str) {
        println!("  {} {}", self.tag("✓", "OK", Tone::Good), self.paint(message, Tone::Good));
    }

    pub fn info(&self, message: &str) {
        println!("  {} {}", self.tag("•", "INFO", Tone::Note), message);
    }

    pub fn warning(&self, message: &str) {
        println!("  {} {}", self.tag("⚠", "WARN", Tone::Warn), self.paint(message, Tone::Warn));
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("  {} {}", self.tag("✗", "ERROR", Tone::Bad), self.paint(message, Tone::Bad));
    }

    /// A file written by `init`.
    pub fn created(&self, file_type: &str, path: &str) {
        println!(
            "  {} {} {}",
            self.tag("✓", "CREATED", Tone::Good),
            self.paint(file_type, Tone::Muted),
            self.paint(path, Tone::Strong)
        );
    }

    /// A file `init` left alone.
    pub fn skipped(&self, path: &str, reason: &str) {
        println!(
            "  {} {} {}",
            self.tag("○", "SKIPPED", Tone::Warn),
            self.paint(path, Tone::Muted),
            self.paint(&format!("({reason})"), Tone::Warn)
        );
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {title} ===");
        }
    }

    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {title} ---");
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        println!("    {}: {}", self.paint(key, Tone::Muted), self.paint(value, Tone::Strong));
    }

    pub fn list_item(&self, item: &str) {
        let bullet = if self.colored {
            self.paint("•", Tone::Note)
        } else {
            "-".to_string()
        };
        println!("    {bullet} {item}");
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {message}");
        }
    }

    /// A shell command the user can run next.
    pub fn command(&self, cmd: &str) {
        println!("     {}", self.paint(&format!("$ {cmd}"), Tone::Accent));
    }

    pub fn complete(&self, message: &str) {
        println!("\n  {} {}", self.tag("🚀", "DONE", Tone::Good), self.paint(message, Tone::Good));
    }

    /// Chat prompt for `agent`, flushed without a newline.
    pub fn prompt(&self, agent: &str) {
        print!("{} ", self.paint(&format!("{agent}>"), Tone::Accent));
        io::stdout().flush().ok();
    }

    pub fn reply(&self, text: &str) {
        println!("{text}\n");
    }

    /// One `/history` entry.
    pub fn turn(&self, turn: &ConversationTurn) {
        let stamp = turn.timestamp.format("%H:%M:%S").to_string();
        let (speaker, tone) = match turn.role {
            Role::User => ("you", Tone::Strong),
            Role::Assistant => ("agent", Tone::Accent),
        };
        if self.colored {
            println!(
                "  {} {}: {}",
                self.paint(&stamp, Tone::Muted),
                self.paint(speaker, tone),
                turn.content
            );
        } else {
            println!("  [{stamp}] {speaker}: {}", turn.content);
        }
    }

    pub fn table_header(&self, columns: &[&str]) {
        let rule = if self.colored { "─" } else { "-" };
        println!("    {}", self.paint(&row(columns), Tone::Strong));
        println!("    {}", self.paint(&rule.repeat(columns.len() * 16), Tone::Muted));
    }

    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", row(values));
    }

    pub fn newline(&self) {
        println!();
    }
}

fn row(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|c| format!("{c:<15}"))
        .collect::<Vec<_>>()
        .join(" ")
}
