//! Message list, pending indicator and suggestion set, plus their terminal rendering.

use colored::*;
use nittany_core::{ChatMessage, Role};

/// Text of the transient placeholder shown while a reply is outstanding
pub const PENDING_TEXT: &str = "Thinking...";

pub const GREETING: &str = "Hi! I'm your internet resource guide mascot, here to help you \
with DSA topics and learning resources. What would you like to explore today?";

pub const DEFAULT_SUGGESTIONS: [&str; 4] = [
    "Where do I start with DSA?",
    "How should I practice on LeetCode?",
    "Explain Big-O notation briefly",
    "Which resources cover graph algorithms?",
];

/// One row of the rendered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(ChatMessage),
    Pending,
}

/// Ordered list of rendered turns. At most one pending placeholder exists at a time.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.entries.push(Entry::Message(message));
    }

    pub fn show_pending(&mut self) {
        if !self.has_pending() {
            self.entries.push(Entry::Pending);
        }
    }

    pub fn clear_pending(&mut self) {
        self.entries.retain(|entry| *entry != Entry::Pending);
    }

    pub fn has_pending(&self) -> bool {
        self.entries.contains(&Entry::Pending)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// Canned prompts offered before the first message. Once hidden they stay hidden.
#[derive(Debug, Clone)]
pub struct Suggestions {
    items: Vec<String>,
    visible: bool,
}

impl Suggestions {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            visible: true,
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible && !self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// 1-based lookup, matching the numbers shown on screen. `None` once hidden.
    pub fn pick(&self, number: usize) -> Option<&str> {
        if !self.is_visible() || number == 0 {
            return None;
        }
        self.items.get(number - 1).map(String::as_str)
    }
}

impl Default for Suggestions {
    fn default() -> Self {
        Self::new(DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect())
    }
}

fn speaker(role: Role) -> ColoredString {
    match role {
        Role::User => "You".green().bold(),
        Role::Assistant => "NittanyBot".blue().bold(),
    }
}

/// Terminal line for a single entry
pub fn render_entry(entry: &Entry) -> String {
    match entry {
        Entry::Message(message) => format!("{}: {}", speaker(message.role()), message.text()),
        Entry::Pending => format!("{}: {}", speaker(Role::Assistant), PENDING_TEXT.dimmed()),
    }
}

/// Entries worth printing after an exchange settles. The pending placeholder
/// is never printed, and user turns only when `echo_user` is set since the
/// terminal already shows what was typed.
pub fn printable_entries(entries: &[Entry], echo_user: bool) -> impl Iterator<Item = &Entry> {
    entries.iter().filter(move |entry| match entry {
        Entry::Pending => false,
        Entry::Message(message) => echo_user || message.role() != Role::User,
    })
}

pub fn print_entry(entry: &Entry) {
    println!("{}", render_entry(entry));
}

pub fn print_greeting() {
    print_entry(&Entry::Message(ChatMessage::assistant(GREETING)));
}

pub fn print_suggestions(suggestions: &Suggestions) {
    if !suggestions.is_visible() {
        return;
    }
    println!("{}", "Try one of these (type /N to send it):".cyan());
    for (i, item) in suggestions.items().iter().enumerate() {
        println!("  {} {}", format!("/{}", i + 1).yellow(), item);
    }
}

/// Show usage instructions when no prompt or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "nittany-chat \"your question\"".green().bold());
    println!("    Send a single question through the relay");
    println!();
    println!("  {}", "nittany-chat -i".green().bold());
    println!("    Start an interactive chat session");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --relay-url <URL>  Relay endpoint (or NITTANY_RELAY_URL)");
    println!("  --help             Show this help message");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_unique_and_removable() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("hi"));
        transcript.show_pending();
        transcript.show_pending();

        assert_eq!(transcript.entries().len(), 2);
        assert!(transcript.has_pending());

        transcript.clear_pending();
        transcript.push(ChatMessage::assistant("X"));

        assert!(!transcript.has_pending());
        assert_eq!(
            transcript.entries(),
            &[
                Entry::Message(ChatMessage::user("hi")),
                Entry::Message(ChatMessage::assistant("X")),
            ]
        );
    }

    #[test]
    fn test_printable_entries_echo_rule() {
        let entries = vec![
            Entry::Message(ChatMessage::user("What is a heap?")),
            Entry::Pending,
            Entry::Message(ChatMessage::assistant("A tree.")),
        ];

        let typed: Vec<&Entry> = printable_entries(&entries, false).collect();
        assert_eq!(typed, vec![&entries[2]]);

        let picked: Vec<&Entry> = printable_entries(&entries, true).collect();
        assert_eq!(picked, vec![&entries[0], &entries[2]]);
    }

    #[test]
    fn test_suggestions_pick_and_hide() {
        let mut suggestions = Suggestions::default();
        assert!(suggestions.is_visible());
        assert_eq!(suggestions.pick(1), Some(DEFAULT_SUGGESTIONS[0]));
        assert_eq!(suggestions.pick(0), None);
        assert_eq!(suggestions.pick(99), None);

        suggestions.hide();
        assert!(!suggestions.is_visible());
        assert_eq!(suggestions.pick(1), None);
    }

    #[test]
    fn test_empty_suggestion_set_is_never_visible() {
        assert!(!Suggestions::new(Vec::new()).is_visible());
    }

    #[test]
    fn test_render_entry_contains_text() {
        colored::control::set_override(false);
        assert_eq!(
            render_entry(&Entry::Message(ChatMessage::user("hi"))),
            "You: hi"
        );
        assert_eq!(render_entry(&Entry::Pending), "NittanyBot: Thinking...");
    }
}
