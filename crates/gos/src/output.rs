//! Terminal output utilities

use console::style;
use gos_projects::{ProgressOutcome, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};

const LOGO: &str = r"
   ______      __                     _____ __             __               ___    ____  ____
  / ____/___  / /___ _____  ____ _   / ___// /_____ ______/ /____  _____   /   |  / __ \/  _/
 / / __/ __ \/ / __ `/ __ \/ __ `/   \__ \/ __/ __ `/ ___/ __/ _ \/ ___/  / /| | / /_/ // /
/ /_/ / /_/ / / /_/ / / / / /_/ /   ___/ / /_/ /_/ / /  / /_/  __/ /     / ___ |/ ____// /
\____/\____/_/\__,_/_/ /_/\__, /   /____/\__/\__,_/_/   \__/\___/_/     /_/  |_/_/   /___/
                         /____/
";

/// Print the banner
pub fn logo() {
    println!("{}", style(LOGO).cyan());
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Progress sink rendering an indicatif spinner
///
/// The spinner advances on reporter ticks rather than its own steady tick.
pub struct SpinnerSink {
    bar: ProgressBar,
    label: String,
}

impl SpinnerSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        bar.set_style(style);
        Self {
            bar,
            label: String::new(),
        }
    }
}

impl ProgressSink for SpinnerSink {
    fn begin(&mut self, label: &str) {
        self.label = label.to_string();
        self.bar.set_message(format!("{}...", label));
    }

    fn tick(&mut self) {
        self.bar.tick();
    }

    fn finish(&mut self, outcome: ProgressOutcome) {
        match outcome {
            ProgressOutcome::Done => self
                .bar
                .finish_with_message(format!("{} {}", self.label, style("done").green())),
            ProgressOutcome::Failed => self
                .bar
                .abandon_with_message(format!("{} {}", self.label, style("failed").red())),
        }
    }
}
