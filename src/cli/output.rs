//! Styled terminal output for link-globs
//!
//! Messages go to stdout, errors to stderr. Quiet mode silences everything
//! except errors.

use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Only printed with `-v`
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// One document line: path plus the number of rewritten elements
    pub fn document(&self, path: &str, expanded: usize, changed: bool) {
        if self.quiet {
            return;
        }
        let marker = if changed { style("✎").cyan() } else { style("·").dim() };
        println!(
            "  {} {} {}",
            marker,
            style(path).underlined(),
            style(format!("({} expanded)", expanded)).dim()
        );
    }

    pub fn summary_stats(&self, label: &str, value: usize) {
        if !self.quiet {
            println!("  {:<20} {}", style(label).dim(), style(value.to_string()).bold());
        }
    }

    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}
