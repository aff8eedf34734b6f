//! `taskrank session` — interactive task entry and analysis.
//!
//! The local task store lives as long as the session. Bulk text is kept as
//! loaded and re-parsed on every `analyze`, so editing the file and loading
//! it again takes effect immediately.

use std::io::{BufRead, Write};
use std::path::Path;

use super::{report, write_err};
use crate::context::ServiceContext;
use crate::pipeline::{AnalyzeOutcome, Workbench};
use crate::task::{Task, TaskForm};

const HELP: &str = "\
Commands:
  add                 enter a task field by field
  add <FORM>          add a task as title;due=YYYY-MM-DD;hours=N;importance=N;deps=a,b
  bulk <PATH>         load bulk JSON from a file (parsed at analyze time)
  bulk clear          drop the loaded bulk JSON
  strategy [NAME]     show or change the scoring strategy
  list                show local tasks and loaded bulk input
  analyze             rank all tasks and show the results
  suggest             show the service's top picks
  help                show this help
  quit                leave the session";

/// A command typed at the session prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Prompt for each form field.
    AddInteractive,
    /// Add a task from a one-line form.
    AddLine(String),
    /// Load bulk text from a file.
    LoadBulk(String),
    /// Forget the loaded bulk text.
    ClearBulk,
    /// Change the strategy, or show it when `None`.
    Strategy(Option<String>),
    /// Show local tasks and bulk input.
    List,
    /// Run the analyze action.
    Analyze,
    /// Ask for suggestions.
    Suggest,
    /// Show help.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Empty,
    /// Anything else.
    Unknown(String),
}

/// Parses one prompt line.
#[must_use]
pub fn parse_command(input: &str) -> SessionCommand {
    let input = input.trim();
    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };
    match (word.to_lowercase().as_str(), rest) {
        ("", _) => SessionCommand::Empty,
        ("add", "") => SessionCommand::AddInteractive,
        ("add", line) => SessionCommand::AddLine(line.to_string()),
        ("bulk", "clear") => SessionCommand::ClearBulk,
        ("bulk", path) if !path.is_empty() => SessionCommand::LoadBulk(path.to_string()),
        ("strategy", "") => SessionCommand::Strategy(None),
        ("strategy", name) => SessionCommand::Strategy(Some(name.to_string())),
        ("list" | "ls", _) => SessionCommand::List,
        ("analyze", _) => SessionCommand::Analyze,
        ("suggest", _) => SessionCommand::Suggest,
        ("help" | "?", _) => SessionCommand::Help,
        ("quit" | "exit", _) => SessionCommand::Quit,
        _ => SessionCommand::Unknown(input.to_string()),
    }
}

/// Read-eval loop over a reader and a writer.
pub struct SessionLoop<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    strategy: String,
    bulk_text: String,
}

impl<R: BufRead, W: Write> SessionLoop<R, W> {
    /// Creates a session starting with `strategy` and no bulk input.
    pub fn new(reader: R, writer: W, strategy: &str) -> Self {
        Self { reader, writer, strategy: strategy.to_string(), bulk_text: String::new() }
    }

    /// Runs until `quit` or end of input.
    ///
    /// Pipeline errors are shown and the loop continues; only I/O failures
    /// end it early.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run(mut self, ctx: &ServiceContext) -> Result<(), String> {
        let mut bench = Workbench::new(ctx);
        writeln!(
            self.writer,
            "taskrank session (strategy: {}). Type `help` for commands.",
            self.strategy
        )
        .map_err(write_err)?;

        loop {
            let Some(line) = self.prompt("taskrank> ")? else {
                break;
            };
            match parse_command(&line) {
                SessionCommand::Empty => {}
                SessionCommand::AddInteractive => {
                    if let Some(form) = self.read_form()? {
                        self.add(&mut bench, &form)?;
                    }
                }
                SessionCommand::AddLine(line) => match TaskForm::parse_line(&line) {
                    Ok(form) => self.add(&mut bench, &form)?,
                    Err(e) => report(&mut self.writer, &e)?,
                },
                SessionCommand::LoadBulk(path) => self.load_bulk(Path::new(&path))?,
                SessionCommand::ClearBulk => {
                    self.bulk_text.clear();
                    writeln!(self.writer, "Bulk input cleared.").map_err(write_err)?;
                }
                SessionCommand::Strategy(Some(name)) => {
                    self.strategy = name;
                    writeln!(self.writer, "Strategy set to {}.", self.strategy)
                        .map_err(write_err)?;
                }
                SessionCommand::Strategy(None) => {
                    writeln!(self.writer, "Strategy: {}", self.strategy).map_err(write_err)?;
                }
                SessionCommand::List => self.list(&bench)?,
                SessionCommand::Analyze => self.analyze(&bench).await?,
                SessionCommand::Suggest => self.suggest(&bench).await?,
                SessionCommand::Help => writeln!(self.writer, "{HELP}").map_err(write_err)?,
                SessionCommand::Quit => break,
                SessionCommand::Unknown(input) => {
                    report(&mut self.writer, &format!("unknown command {input:?}; try `help`"))?;
                }
            }
        }
        Ok(())
    }

    /// Writes `label` and reads one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>, String> {
        write!(self.writer, "{label}").map_err(write_err)?;
        self.writer.flush().map_err(write_err)?;
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(|e| format!("read error: {e}"))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompts for each form field. `None` if input ends midway.
    fn read_form(&mut self) -> Result<Option<TaskForm>, String> {
        let title = loop {
            let Some(title) = self.prompt("Title: ")? else {
                return Ok(None);
            };
            if !title.is_empty() {
                break title;
            }
            writeln!(self.writer, "Title is required.").map_err(write_err)?;
        };
        let mut optional = |label: &str| -> Result<Option<Option<String>>, String> {
            Ok(self.prompt(label)?.map(|v| Some(v).filter(|v| !v.is_empty())))
        };
        let Some(due_date) = optional("Due date (YYYY-MM-DD, blank for none): ")? else {
            return Ok(None);
        };
        let Some(estimated_hours) = optional("Estimated hours [1]: ")? else {
            return Ok(None);
        };
        let Some(importance) = optional("Importance 1-10 [5]: ")? else {
            return Ok(None);
        };
        let Some(dependencies) = optional("Dependencies (comma-separated ids): ")? else {
            return Ok(None);
        };
        Ok(Some(TaskForm { title, due_date, estimated_hours, importance, dependencies }))
    }

    fn add(&mut self, bench: &mut Workbench<'_>, form: &TaskForm) -> Result<(), String> {
        let task = bench.add_task(form);
        tracing::debug!(id = task.id.as_deref(), title = %task.title, "task added");
        writeln!(self.writer, "Task added to local list. Run `analyze` to process.")
            .map_err(write_err)
    }

    fn load_bulk(&mut self, path: &Path) -> Result<(), String> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                self.bulk_text = text;
                writeln!(self.writer, "Loaded bulk input from {}.", path.display())
                    .map_err(write_err)
            }
            Err(e) => report(&mut self.writer, &format!("cannot read {}: {e}", path.display())),
        }
    }

    fn list(&mut self, bench: &Workbench<'_>) -> Result<(), String> {
        let out = &mut self.writer;
        match crate::bulk::parse_bulk(&self.bulk_text) {
            Ok(items) if items.is_empty() => {}
            Ok(items) => {
                writeln!(out, "Bulk ({}):", items.len()).map_err(write_err)?;
                for item in &items {
                    let task = Task::from_json(item);
                    let id = task.id.unwrap_or_else(|| "-".to_string());
                    writeln!(out, "  {id}  {}", task.title).map_err(write_err)?;
                }
            }
            Err(e) => writeln!(out, "Bulk input will not parse: {e}").map_err(write_err)?,
        }
        let tasks = bench.store().tasks();
        if tasks.is_empty() {
            return writeln!(out, "No local tasks.").map_err(write_err);
        }
        writeln!(out, "Local ({}):", tasks.len()).map_err(write_err)?;
        for task in tasks {
            let due = task.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
            writeln!(
                out,
                "  {}  {}  due {due}, {}h, importance {}",
                task.id.as_deref().unwrap_or("-"),
                task.title,
                task.estimated_hours,
                task.importance,
            )
            .map_err(write_err)?;
        }
        Ok(())
    }

    async fn analyze(&mut self, bench: &Workbench<'_>) -> Result<(), String> {
        match bench.analyze(&self.bulk_text, &self.strategy).await {
            Ok(AnalyzeOutcome::Rendered { count: 0, .. }) => {
                writeln!(self.writer, "The service returned no ranked tasks.").map_err(write_err)
            }
            Ok(AnalyzeOutcome::Rendered { .. }) => {
                bench.view().write_to(&mut self.writer).map_err(write_err)
            }
            Ok(AnalyzeOutcome::Stale { seq, latest }) => writeln!(
                self.writer,
                "Discarded results of analyze #{seq}; #{latest} is newer."
            )
            .map_err(write_err),
            Err(e) => report(&mut self.writer, &e.to_string()),
        }
    }

    async fn suggest(&mut self, bench: &Workbench<'_>) -> Result<(), String> {
        match bench.suggest(&self.bulk_text, &self.strategy).await {
            Ok(suggestions) => {
                super::suggest::write_suggestions(&suggestions, &mut self.writer)
                    .map_err(write_err)
            }
            Err(e) => report(&mut self.writer, &e.to_string()),
        }
    }
}
