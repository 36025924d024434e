use crate::core::scheduler::RunSummary;
use colored::{Color, Colorize};
use std::io::{self, Write};

pub const PROGRESS_BAR_WIDTH: usize = 20;
const FILLED: char = '█';
const EMPTY: char = '░';

/// What a piece of diagnostic text means, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Info,
    Success,
    Warning,
    Error,
}

impl Role {
    fn color(self) -> Color {
        match self {
            Role::Info => Color::Blue,
            Role::Success => Color::Green,
            Role::Warning => Color::Yellow,
            Role::Error => Color::Red,
        }
    }
}

/// Colors `text` for its role, but only for an interactive destination.
pub fn paint(text: &str, role: Role, interactive: bool) -> String {
    if interactive {
        text.color(role.color()).to_string()
    } else {
        text.to_string()
    }
}

/// Fixed-width glyph bar plus percentage and fraction, e.g.
/// `Progress: ██████████░░░░░░░░░░ 50% (1/2)`.
pub fn render_bar(completed: usize, total: usize, width: usize) -> String {
    let (filled, percent) = if total == 0 {
        (width, 100)
    } else {
        let completed = completed.min(total);
        (completed * width / total, completed * 100 / total)
    };

    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));

    format!("Progress: {} {}% ({}/{})", bar, percent, completed.min(total), total)
}

/// Closing line, e.g. `done: 2 checked, 1 succeeded, 0 errors, 0 failed in 0.4s`.
pub fn summary_line(summary: &RunSummary) -> (String, Role) {
    let collected = &summary.collected;
    let line = format!(
        "done: {} checked, {} succeeded, {} errors, {} failed in {:.1}s",
        collected.completed,
        collected.successes,
        collected.errors,
        collected.failures,
        summary.elapsed.as_secs_f64()
    );
    let role = if collected.errors > 0 {
        Role::Warning
    } else {
        Role::Success
    };
    (line, role)
}

/// Line-oriented diagnostic stream (stderr in production).
pub struct Diagnostics {
    out: Box<dyn Write + Send>,
    interactive: bool,
}

impl Diagnostics {
    pub fn new(out: Box<dyn Write + Send>, interactive: bool) -> Self {
        Self { out, interactive }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()), console::user_attended_stderr())
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn line(&mut self, text: &str, role: Role) -> io::Result<()> {
        writeln!(self.out, "{}", paint(text, role, self.interactive))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::buffer::SharedBuffer;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 2, "Progress: ░░░░░░░░░░░░░░░░░░░░ 0% (0/2)")]
    #[case(1, 2, "Progress: ██████████░░░░░░░░░░ 50% (1/2)")]
    #[case(2, 2, "Progress: ████████████████████ 100% (2/2)")]
    #[case(1, 3, "Progress: ██████░░░░░░░░░░░░░░ 33% (1/3)")]
    #[case(0, 0, "Progress: ████████████████████ 100% (0/0)")]
    fn test_render_bar(#[case] completed: usize, #[case] total: usize, #[case] expected: &str) {
        assert_eq!(render_bar(completed, total, PROGRESS_BAR_WIDTH), expected);
    }

    #[test]
    fn test_render_bar_clamps_overflow() {
        assert!(render_bar(5, 2, 10).ends_with("100% (2/2)"));
    }

    #[test]
    fn test_paint_is_plain_when_not_interactive() {
        assert_eq!(paint("boom", Role::Error, false), "boom");
    }

    #[test]
    fn test_paint_keeps_text_when_interactive() {
        assert!(paint("boom", Role::Error, true).contains("boom"));
    }

    #[test]
    fn test_summary_line() {
        use crate::core::collector::CollectorSummary;
        use std::time::Duration;

        let summary = RunSummary {
            total: 3,
            workers: 2,
            handled_per_worker: vec![2, 1],
            collected: CollectorSummary {
                completed: 3,
                successes: 1,
                errors: 1,
                failures: 0,
            },
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(
            summary_line(&summary),
            (
                "done: 3 checked, 1 succeeded, 1 errors, 0 failed in 1.5s".to_string(),
                Role::Warning
            )
        );
    }

    #[test]
    fn test_diagnostic_lines_are_newline_terminated() {
        let buffer = SharedBuffer::new();
        let mut diagnostics = Diagnostics::new(Box::new(buffer.clone()), false);
        diagnostics.line("first", Role::Error).unwrap();
        diagnostics.line("second", Role::Info).unwrap();
        assert_eq!(buffer.contents(), "first\nsecond\n");
    }
}
