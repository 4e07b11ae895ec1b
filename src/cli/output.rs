//! Terminal output for the hub CLI.
//!
//! Each line is rendered to a `String` first and printed afterwards, so the
//! plain form (`--no-color`) can be asserted on directly.

use crate::types::{RunStatus, Stage};
use crate::utils::toml_config::AgentConfig;
use owo_colors::OwoColorize;

const COLUMN_WIDTH: usize = 15;

/// Marker in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Done,
    Note,
    Warn,
    Fail,
    Skip,
}

impl Mark {
    fn tag(self) -> &'static str {
        match self {
            Mark::Done => "[OK]",
            Mark::Note => "[INFO]",
            Mark::Warn => "[WARN]",
            Mark::Fail => "[ERROR]",
            Mark::Skip => "[SKIPPED]",
        }
    }

    fn paint(self, text: &str) -> String {
        match self {
            Mark::Done => format!("{} {}", "✓".green().bold(), text.green()),
            Mark::Note => format!("{} {}", "•".blue(), text),
            Mark::Warn => format!("{} {}", "⚠".yellow().bold(), text.yellow()),
            Mark::Fail => format!("{} {}", "✗".red().bold(), text.red()),
            Mark::Skip => format!("{} {}", "○".yellow(), text.dimmed()),
        }
    }
}

/// Stage heading used while walking a pipeline.
fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Response => "Responses",
        Stage::Critique => "Critiques",
        Stage::Research => "Research",
        Stage::Conclusion => "Conclusions",
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub colored: bool,
}

impl Output {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn no_color() -> Self {
        Self::new(false)
    }

    pub fn render(&self, mark: Mark, text: &str) -> String {
        if self.colored {
            format!("  {}", mark.paint(text))
        } else {
            format!("  {} {}", mark.tag(), text)
        }
    }

    /// Print a status line. Failures go to stderr.
    pub fn line(&self, mark: Mark, text: &str) {
        let rendered = self.render(mark, text);
        if mark == Mark::Fail {
            eprintln!("{}", rendered);
        } else {
            println!("{}", rendered);
        }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let stages = Stage::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" / ");
        if self.colored {
            println!(
                "\n   {} {}\n   {}\n",
                "Agent Hub".bright_cyan().bold(),
                version.dimmed(),
                stages.blue()
            );
        } else {
            println!("\n   Agent Hub {}\n   {}\n", version, stages);
        }
    }

    pub fn section(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Heading for one stage of a pipeline walk.
    pub fn stage(&self, stage: Stage) {
        let title = stage_title(stage);
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    pub fn field(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// An agent finished its part of the current stage.
    pub fn agent_done(&self, agent_name: &str, action: &str) {
        self.line(Mark::Done, &format!("{} {}", agent_name, action));
    }

    pub fn render_panel_member(&self, agent_name: &str, model: Option<&str>) -> String {
        let model = model.unwrap_or("mock");
        if self.colored {
            format!("    {} {} {}", "•".blue(), agent_name, format!("({})", model).dimmed())
        } else {
            format!("    - {} ({})", agent_name, model)
        }
    }

    pub fn panel_member(&self, agent_name: &str, model: Option<&str>) {
        println!("{}", self.render_panel_member(agent_name, model));
    }

    pub fn render_progress(&self, status: &RunStatus) -> String {
        let percent = format!("[{:>3}%]", status.progress());
        let detail = match status.stage {
            Some(stage) if status.label() != "complete" => format!("{} ({})", status.label(), stage),
            _ => status.label().to_string(),
        };
        if self.colored {
            format!("  {} {}", percent.dimmed(), detail.bright_white())
        } else {
            format!("  {} {}", percent, detail)
        }
    }

    pub fn progress(&self, status: &RunStatus) {
        println!("{}", self.render_progress(status));
    }

    pub fn agent_table(&self, agents: &[AgentConfig]) {
        let header = pad_columns(&["Id", "Provider", "Model"]);
        let rule = 3 * (COLUMN_WIDTH + 1);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(rule).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(rule));
        }
        for agent in agents {
            println!(
                "    {}",
                pad_columns(&[agent.id.as_str(), agent.provider.as_str(), agent.model.as_str()])
            );
        }
    }

    pub fn next_steps(&self, commands: &[&str]) {
        self.section("Next steps");
        for cmd in commands {
            if self.colored {
                println!("     {}", format!("$ {}", cmd).bright_cyan());
            } else {
                println!("     $ {}", cmd);
            }
        }
    }
}

fn pad_columns(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("{:<width$}", v, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}
