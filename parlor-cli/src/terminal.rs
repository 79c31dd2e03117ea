//! Terminal rendering of the chat log and roster.

use colored::Colorize;
use parlor_websocket::{BufferedView, Presentation};
use std::io::{self, Write};

/// Writes log lines to a terminal as they arrive and keeps the roster for `/who`.
pub struct TerminalView<W: Write> {
    out: W,
    view: BufferedView,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            view: BufferedView::new(),
        }
    }

    /// Print the users currently online.
    pub fn print_roster(&mut self) -> io::Result<()> {
        let roster = self.view.roster();
        if roster.is_empty() {
            writeln!(self.out, "{}", "No one else is here.".dimmed())?;
        } else {
            writeln!(self.out, "{} {}", "Online:".bright_white().bold(), roster.len())?;
            for user in roster.iter() {
                writeln!(self.out, "  {} {}", "•".cyan(), user)?;
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// Write failures are dropped: the router cannot act on them and the
// buffered copy stays authoritative for the roster.
impl<W: Write> Presentation for TerminalView<W> {
    fn append_log_line(&mut self, text: &str) {
        self.view.append_log_line(text);
        let _ = self.out.write_all(text.as_bytes());
    }

    fn add_roster_entry(&mut self, user: &str) {
        self.view.add_roster_entry(user);
    }

    fn remove_roster_entry(&mut self, user: &str) {
        self.view.remove_roster_entry(user);
    }

    fn scroll_to_bottom(&mut self) {
        self.view.scroll_to_bottom();
        let _ = self.out.flush();
    }
}
