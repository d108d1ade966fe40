//! Terminal rendering of projected display lines

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use scibot_chat::{ChatError, DisplayLine, Speaker};
use std::time::Duration;

/// Spinner shown while an exchange is in flight and input is suspended
pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Print the display lines not yet on screen; returns the new rendered count
pub fn print_new_lines(lines: &[DisplayLine], already_rendered: usize) -> usize {
    let start = already_rendered.min(lines.len());
    for line in &lines[start..] {
        print_line(line);
    }
    lines.len()
}

fn print_line(line: &DisplayLine) {
    match line.speaker {
        Speaker::You => println!("{} {}", style("🧑 You:").bold().cyan(), line.text),
        Speaker::Bot => println!("{} {}", style("🤖 Bot:").bold().green(), line.text),
    }
}

/// Show an exchange failure in place of a reply
pub fn print_error(err: &ChatError) {
    eprintln!("{} {}", style("error:").bold().red(), err);
}
