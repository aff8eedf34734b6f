//! Command dispatch and handlers.

pub mod analyze;
pub mod session;
pub mod suggest;

use std::io::{self, Read, Write};
use std::path::Path;

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// With `--record`/`TASKRANK_RECORD` set, service interactions are written
/// to a cassette once the command finishes, even if it failed.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = Config::new(&cli.url, cli.record.clone(), cli.replay.clone())?;
    let (ctx, session) = ServiceContext::from_config(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let result = runtime.block_on(dispatch_with_context(&cli.command, &ctx));

    if let Some(session) = session {
        // Adapters hold the recorder; release them first.
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    let stdout = io::stdout();
    match command {
        Command::Analyze(args) => analyze::run(ctx, args, &mut stdout.lock()).await,
        Command::Suggest(args) => suggest::run(ctx, args, &mut stdout.lock()).await,
        Command::Session { strategy } => {
            let stdin = io::stdin();
            let session = session::SessionLoop::new(stdin.lock(), stdout.lock(), strategy);
            session.run(ctx).await
        }
    }
}

/// Finish a recording session and report where the cassette went.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let path = session.finish()?;
    eprintln!("Recording saved to: {}", path.display());
    Ok(())
}

/// Read bulk JSON text from a file, or stdin for `-`. No path means no bulk input.
///
/// # Errors
///
/// Returns an error if the file or stdin cannot be read.
pub fn read_bulk(path: Option<&Path>) -> Result<String, String> {
    match path {
        None => Ok(String::new()),
        Some(p) if p.as_os_str() == "-" => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Failed to read bulk input from stdin: {e}"))?;
            Ok(text)
        }
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| format!("Failed to read bulk input {}: {e}", p.display())),
    }
}

fn write_err(e: io::Error) -> String {
    format!("Failed to write output: {e}")
}

/// Write an error line the way every handler reports user-facing failures.
fn report(out: &mut impl Write, message: &str) -> Result<(), String> {
    writeln!(out, "Error: {message}").map_err(write_err)
}
