use colored::Colorize;
use indicatif::ProgressBar;

/// Logging capability handed to the updater instead of printing directly.
pub trait Log {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Colored terminal output. Debug lines only show up in verbose mode.
pub struct ConsoleLog {
    verbose: bool,
    quiet: bool,
    progress: Option<ProgressBar>,
}

impl ConsoleLog {
    /// Prints above `progress` so lines do not tear the bar.
    pub fn with_progress(verbose: bool, progress: ProgressBar) -> Self {
        Self {
            verbose,
            quiet: false,
            progress: Some(progress),
        }
    }

    /// Keeps stdout clean for machine readable output; warnings go to stderr.
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            progress: None,
        }
    }

    fn emit(&self, line: String) {
        if self.quiet {
            return;
        }
        match &self.progress {
            Some(pb) if !pb.is_hidden() => pb.println(line),
            _ => println!("{line}"),
        }
    }
}

impl Log for ConsoleLog {
    fn info(&self, message: &str) {
        self.emit(format!("   {message}"));
    }

    fn debug(&self, message: &str) {
        if self.verbose {
            self.emit(format!("   {} {}", "[VERBOSE]".dimmed(), message.dimmed()));
        }
    }

    fn warn(&self, message: &str) {
        if self.quiet {
            eprintln!("{}", message.yellow());
        } else {
            self.emit(format!("   {}", message.yellow()));
        }
    }
}

#[cfg(test)]
pub use recording::{Level, RecordingLog};
