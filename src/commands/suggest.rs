//! `taskrank suggest` command.

use std::io::{self, Write};

use super::{read_bulk, write_err};
use crate::cli::BatchArgs;
use crate::context::ServiceContext;
use crate::pipeline::Workbench;
use crate::ports::prioritizer::Suggestion;
use crate::task::TaskForm;

/// Execute the `suggest` command.
///
/// Builds the batch exactly like `analyze`, then prints the service's top
/// picks with the reason for each.
///
/// # Errors
///
/// Returns the user-facing message of whatever aborted the request.
pub async fn run(
    ctx: &ServiceContext,
    args: &BatchArgs,
    out: &mut impl Write,
) -> Result<(), String> {
    let mut bench = Workbench::new(ctx);
    for line in &args.tasks {
        bench.add_task(&TaskForm::parse_line(line)?);
    }
    let bulk = read_bulk(args.bulk.as_deref())?;

    let suggestions = bench.suggest(&bulk, &args.strategy).await.map_err(|e| e.to_string())?;
    write_suggestions(&suggestions, out).map_err(write_err)
}

pub(crate) fn write_suggestions(
    suggestions: &[Suggestion],
    out: &mut impl Write,
) -> io::Result<()> {
    if suggestions.is_empty() {
        return writeln!(out, "No suggestions.");
    }
    for (rank, suggestion) in suggestions.iter().enumerate() {
        let title = suggestion.title.as_deref().unwrap_or_default();
        let score = suggestion.score.map(|s| s.to_string()).unwrap_or_default();
        match &suggestion.id {
            Some(id) => writeln!(out, "{}. {title} [{id}]  (score: {score})", rank + 1)?,
            None => writeln!(out, "{}. {title}  (score: {score})", rank + 1)?,
        }
        if let Some(why) = &suggestion.why {
            writeln!(out, "   {why}")?;
        }
    }
    Ok(())
}
