reexport!(testing, test);
reexport!(logic);
reexport!(sql);
reexport!(script);
reexport!(execute);
reexport!(config);
reexport!(error);
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Split SQL scripts into statements and run them.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every statement of the script, one block per statement.
    Split {
        /// Script file; standard input when omitted.
        file: Option<PathBuf>,
        /// Only the statement under this byte offset (editor caret).
        #[arg(long)]
        at: Option<usize>,
        /// Selection end; with `--at`, split just the selected text.
        #[arg(long, requires = "at")]
        to: Option<usize>,
    },
    /// Execute the statements of the script in order.
    Run {
        /// Script file; standard input when omitted.
        file: Option<PathBuf>,
        /// Overrides SQLSCRIPT_DATABASE_URL.
        #[arg(long)]
        database_url: Option<String>,
        /// Run the remaining statements after a failure.
        #[arg(long)]
        keep_going: bool,
    },
}

fn read_script(file: Option<PathBuf>) -> Result<Script> {
    match file {
        Some(path) => Script::load(path),
        None => Script::from_stdin(),
    }
}

#[tokio::main]
async fn main() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Split { file, at, to } => {
            let script = read_script(file)?;
            let statements = match at.map(|start| Cursor::new(start, to)) {
                None => script.statements(),
                Some(cursor) => match cursor.selection(&script.text) {
                    Some(selected) => extract(selected),
                    None => statement_at(&script.text, cursor).into_iter().collect(),
                },
            };
            for statement in statements {
                println!("{statement};\n");
            }
        }
        Command::Run {
            file,
            database_url,
            keep_going,
        } => {
            let script = read_script(file)?;
            let url = database_url.or(config.database_url).ok_or_else(|| {
                Error::Config("no database url; pass --database-url or set SQLSCRIPT_DATABASE_URL".into())
            })?;
            let executor = PgExecutor::connect(&url, config.max_connections).await?;
            let report = run_script(&executor, &script.text, config.stop_on_error && !keep_going).await;
            executor.close().await;

            for executed in &report.executed {
                match &executed.outcome {
                    Ok(outcome) => println!("ok    {:>9.2?}  {outcome}", executed.elapsed),
                    Err(e) => println!("error {:>9.2?}  {e}", executed.elapsed),
                }
            }
            if report.skipped > 0 {
                println!("skipped {} statement(s)", report.skipped);
            }
            info!(
                "Ran {} statement(s) in {:.2?}",
                report.executed.len(),
                report.elapsed()
            );
            if !report.is_success() {
                return Err(Error::Internal(format!(
                    "{} statement(s) failed",
                    report.failures().count()
                )));
            }
        }
    }
    Ok(())
}

#[macro_export]
macro_rules! reexport {
    ($module:ident) => {
        $crate::reexport!($module, false);
    };
    ($module:ident, test) => {
        $crate::reexport!($module, true);
    };
    ($module:ident, $is_test:literal) => {
        #[cfg_attr($is_test, cfg(test))]
        mod $module;
        #[cfg_attr($is_test, cfg(test))]
        #[allow(unused_imports)]
        #[allow(ambiguous_glob_reexports)]
        pub use $module::*;
    };
}
