use super::printer::{Diagnostics, PROGRESS_BAR_WIDTH, Role, render_bar};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;

/// Plain mode prints one line per this many percent.
const LINE_STEP_PERCENT: usize = 10;

const BAR_TEMPLATE: &str = "{prefix:.blue} {bar:20.blue} {pos}/{len} ({percent}%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// In-place bar, for a terminal.
    Bar,
    /// Appended lines at every 10% step.
    Lines,
    Hidden,
}

impl ProgressMode {
    pub fn detect(diagnostics: &Diagnostics, quiet: bool) -> Self {
        if quiet {
            ProgressMode::Hidden
        } else if diagnostics.is_interactive() {
            ProgressMode::Bar
        } else {
            ProgressMode::Lines
        }
    }
}

/// Everything the collector shows on the diagnostic stream: progress plus
/// error, warning and summary lines, kept from trampling each other.
pub struct ProgressDisplay {
    diagnostics: Diagnostics,
    mode: ProgressMode,
    total: usize,
    bar: Option<ProgressBar>,
    last_step: usize,
}

impl ProgressDisplay {
    pub fn new(diagnostics: Diagnostics, mode: ProgressMode, total: usize) -> Self {
        Self::with_target(diagnostics, mode, total, ProgressDrawTarget::stderr())
    }

    fn with_target(
        diagnostics: Diagnostics,
        mode: ProgressMode,
        total: usize,
        target: ProgressDrawTarget,
    ) -> Self {
        let bar = (mode == ProgressMode::Bar && total > 0).then(|| {
            let pb = ProgressBar::with_draw_target(Some(total as u64), target);
            pb.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█░"),
            );
            pb.set_prefix("Progress:");
            pb
        });

        Self {
            diagnostics,
            mode,
            total,
            bar,
            last_step: 0,
        }
    }

    pub fn tick(&mut self, completed: usize) -> io::Result<()> {
        match self.mode {
            ProgressMode::Bar => {
                if let Some(bar) = &self.bar {
                    bar.set_position(completed as u64);
                }
                Ok(())
            }
            ProgressMode::Lines => {
                let percent = if self.total == 0 {
                    100
                } else {
                    completed.min(self.total) * 100 / self.total
                };
                let step = percent / LINE_STEP_PERCENT;
                if step <= self.last_step {
                    return Ok(());
                }
                self.last_step = step;
                let line = render_bar(completed, self.total, PROGRESS_BAR_WIDTH);
                self.diagnostics.line(&line, Role::Info)
            }
            ProgressMode::Hidden => Ok(()),
        }
    }

    /// Prints a line above the bar, or as-is when there is no bar.
    pub fn line(&mut self, text: &str, role: Role) -> io::Result<()> {
        match &self.bar {
            Some(bar) => {
                let diagnostics = &mut self.diagnostics;
                bar.suspend(|| diagnostics.line(text, role))
            }
            None => self.diagnostics.line(text, role),
        }
    }

    /// Leaves the bar at its final position and prints the closing summary
    /// below it, unless hidden.
    pub fn finish(&mut self, summary: &str, role: Role) -> io::Result<()> {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
        if self.mode == ProgressMode::Hidden {
            return Ok(());
        }
        self.diagnostics.line(summary, role)
    }
}
