//! Terminal chat loop: slash commands plus a sink that prints streamed replies as they arrive.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chat_runtime::ChatService;
use rhea_core::{ChatEvent, ChatSink, RheaError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// One line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Plain text sent to the model.
    Say(String),
    /// `/key <event>`
    AddKeyEvent(String),
    /// `/events`
    ListEvents,
    /// `/status`
    Status,
    /// `/trim [percentage]`
    Trim(Option<f64>),
    /// `/clear`
    Clear,
    /// `/exit` or `/quit`
    Exit,
    /// `/help`
    Help,
    Empty,
    /// Unknown command or bad argument; carries the message to show.
    Invalid(String),
}

pub const HELP: &str = "Commands: /key <event>, /events, /status, /trim [percent], /clear, /exit";

/// Plain text is kept as typed; commands are matched on the trimmed line.
pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Say(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "key" if arg.is_empty() => ReplCommand::Invalid("Usage: /key <event>".to_string()),
        "key" => ReplCommand::AddKeyEvent(arg.to_string()),
        "events" => ReplCommand::ListEvents,
        "status" => ReplCommand::Status,
        "trim" if arg.is_empty() => ReplCommand::Trim(None),
        "trim" => match arg.parse::<f64>() {
            Ok(pct) if pct.is_finite() => ReplCommand::Trim(Some(pct)),
            _ => ReplCommand::Invalid(format!("Not a percentage: {}", arg)),
        },
        "clear" => ReplCommand::Clear,
        "exit" | "quit" => ReplCommand::Exit,
        "help" => ReplCommand::Help,
        other => ReplCommand::Invalid(format!("Unknown command: /{}. {}", other, HELP)),
    }
}

/// Word wrapping over a stream of fragments. A word is held back until the whitespace after it
/// arrives, then placed on the current line or the next one.
#[derive(Debug, Default)]
pub struct StreamWrap {
    width: usize,
    column: usize,
    pending_space: bool,
    word: String,
}

impl StreamWrap {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            ..Self::default()
        }
    }

    /// Starts a line that already holds `column` characters (a speaker label).
    pub fn start_at(&mut self, column: usize) {
        self.column = column;
        self.pending_space = false;
        self.word.clear();
    }

    /// Feeds one fragment and returns the text that is ready to print.
    pub fn push(&mut self, fragment: &str) -> String {
        let mut out = String::new();
        for ch in fragment.chars() {
            if ch == '\n' {
                self.flush_word(&mut out);
                out.push('\n');
                self.column = 0;
                self.pending_space = false;
            } else if ch.is_whitespace() {
                self.flush_word(&mut out);
                self.pending_space = self.column > 0;
            } else {
                self.word.push(ch);
            }
        }
        out
    }

    /// Flushes the held-back word and resets to column zero.
    pub fn finish(&mut self) -> String {
        let mut out = String::new();
        self.flush_word(&mut out);
        self.start_at(0);
        out
    }

    fn flush_word(&mut self, out: &mut String) {
        if self.word.is_empty() {
            return;
        }
        let len = self.word.chars().count();
        let space = usize::from(self.pending_space);
        if self.column > 0 && self.column + space + len > self.width {
            out.push('\n');
            self.column = 0;
        } else if self.pending_space {
            out.push(' ');
            self.column += 1;
        }
        out.push_str(&self.word);
        self.column += len;
        self.pending_space = false;
        self.word.clear();
    }
}

/// Prints chat events to stdout. Streamed chunks are wrapped at `max_width` and flushed at once.
pub struct TerminalSink {
    max_width: usize,
    wrap: Mutex<StreamWrap>,
}

impl TerminalSink {
    pub fn new(max_width: usize) -> Self {
        Self {
            max_width,
            wrap: Mutex::new(StreamWrap::new(max_width)),
        }
    }

    /// Prints the speaker label that opens an assistant reply.
    fn start_reply(&self, name: &str) -> std::io::Result<()> {
        let label = format!("{}: ", name);
        self.wrap_state().start_at(label.chars().count());
        self.write(&label)
    }

    fn wrap_state(&self) -> std::sync::MutexGuard<'_, StreamWrap> {
        self.wrap.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, text: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

#[async_trait]
impl ChatSink for TerminalSink {
    async fn send(&self, event: ChatEvent) -> rhea_core::Result<()> {
        let text = match event {
            ChatEvent::Chunk { chunk, .. } => self.wrap_state().push(&chunk),
            ChatEvent::Response { .. } => format!("{}\n\n", self.wrap_state().finish()),
            ChatEvent::Error { error } => {
                let pending = self.wrap_state().finish();
                format!("{}\n[error] {}\n\n", pending, wrap(&error, self.max_width))
            }
            ChatEvent::System { system } => {
                format!("[system] {}\n", wrap(&system, self.max_width))
            }
        };
        self.write(&text).map_err(RheaError::from)
    }
}

/// Runs the interactive loop until `/exit` or end of input.
pub async fn run(service: Arc<ChatService>, session_id: &str, max_width: usize) -> Result<()> {
    let sink = Arc::new(TerminalSink::new(max_width));
    sink.send(service.greeting(session_id).await).await?;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt_marker()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Say(text) => {
                let name = {
                    let handle = service.session(session_id).await;
                    let session = handle.lock().await;
                    session.assistant_name().to_string()
                };
                sink.start_reply(&name)?;
                if let Err(e) = service.run_turn(session_id, &text, sink.clone(), true).await {
                    debug!(error = %e, "Turn failed");
                }
            }
            ReplCommand::AddKeyEvent(event) => {
                let events = service.add_key_event(session_id, &event).await?;
                println!("Key event added ({} total)", events.len());
            }
            ReplCommand::ListEvents => {
                let events = service.key_events(session_id).await;
                if events.is_empty() {
                    println!("{}", prompt::NO_EVENTS_TEXT);
                }
                for (i, event) in events.iter().enumerate() {
                    println!("{}", wrap(&format!("{}. {}", i + 1, event), sink.max_width));
                }
            }
            ReplCommand::Status => {
                let status = service.context_status(session_id).await;
                println!(
                    "Context: {} / {} words ({:.1}%)",
                    status.total_tokens, status.context_limit, status.usage_percentage
                );
            }
            ReplCommand::Trim(pct) => {
                let report = service.trim_context(session_id, pct).await;
                println!(
                    "Context trimmed: {} messages left, {:.1}% used",
                    report.remaining_messages, report.current_usage_percentage
                );
            }
            ReplCommand::Clear => {
                service.clear(session_id).await;
                println!("Conversation history cleared");
            }
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Invalid(message) => println!("{}", message),
            ReplCommand::Exit => break,
        }
    }
    Ok(())
}

fn prompt_marker() -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(b"> ")?;
    out.flush()
}

/// Greedy word wrap at `width` columns; words longer than `width` stay whole.
pub fn wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse_line("hello there"), ReplCommand::Say("hello there".to_string()));
        assert_eq!(parse_line("    indented"), ReplCommand::Say("    indented".to_string()));
        assert_eq!(parse_line("   "), ReplCommand::Empty);
    }

    #[test]
    fn test_parse_key_event() {
        assert_eq!(
            parse_line("/key met at the library"),
            ReplCommand::AddKeyEvent("met at the library".to_string())
        );
        assert!(matches!(parse_line("/key"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_trim() {
        assert_eq!(parse_line("/trim"), ReplCommand::Trim(None));
        assert_eq!(parse_line("/trim 30"), ReplCommand::Trim(Some(30.0)));
        assert!(matches!(parse_line("/trim lots"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_line("/events"), ReplCommand::ListEvents);
        assert_eq!(parse_line("/status"), ReplCommand::Status);
        assert_eq!(parse_line("/clear"), ReplCommand::Clear);
        assert_eq!(parse_line("/exit"), ReplCommand::Exit);
        assert_eq!(parse_line("/quit"), ReplCommand::Exit);
        assert!(matches!(parse_line("/dance"), ReplCommand::Invalid(m) if m.contains("/dance")));
    }

    fn feed(wrap: &mut StreamWrap, fragments: &[&str]) -> String {
        let mut out: String = fragments.iter().map(|f| wrap.push(f)).collect();
        out.push_str(&wrap.finish());
        out
    }

    #[test]
    fn test_stream_wrap_across_fragments() {
        let mut w = StreamWrap::new(10);
        assert_eq!(feed(&mut w, &["The qu", "ick brown f", "ox jumps"]), "The quick\nbrown fox\njumps");
    }

    #[test]
    fn test_stream_wrap_after_label_and_newlines() {
        let mut w = StreamWrap::new(12);
        w.start_at("Rhea: ".len());
        assert_eq!(feed(&mut w, &["Hello there\nfriend"]), "Hello\nthere\nfriend");

        let mut w = StreamWrap::new(3);
        assert_eq!(feed(&mut w, &["abcdef gh"]), "abcdef\ngh");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("aa bb cc", 5), "aa bb\ncc");
        assert_eq!(wrap("abcdefgh ij", 4), "abcdefgh\nij");
        assert_eq!(wrap("", 10), "");
    }
}
