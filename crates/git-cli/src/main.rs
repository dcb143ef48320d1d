use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser};
use git_compare::{CompareConfig, CompareError, Comparison, Console, Log, OutputConfig};
use git_hash::HashAlgorithm;
use git_repository::Repository;
use git_utils::cli::GlobalOptions;

/// Setting this to `1` turns on debug diagnostics when `RUST_LOG` is unset.
const TRACE_ENV: &str = "GIT_COMPARE_TRACE";

#[derive(Parser)]
#[command(
    name = "git-compare",
    about = "Decide whether two git references have the same file contents",
    long_about = "Decide whether two git references (commits, branches, tags, HEAD~2, ...) \
                  materialize to the same file tree, regardless of history.\n\n\
                  Exit status: 0 identical, 1 different, 2 error.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// First reference
    #[arg(value_name = "REF_A", required_unless_present = "list_algorithms")]
    left: Option<String>,

    /// Second reference
    #[arg(value_name = "REF_B", required_unless_present = "list_algorithms")]
    right: Option<String>,

    /// Comparison method: archive, tree, listing or diff [default: archive]
    #[arg(long, short = 'm', value_name = "METHOD")]
    method: Option<String>,

    /// Digest algorithm for the archive and listing methods [default: sha256]
    #[arg(long, short = 'a', value_name = "NAME")]
    algorithm: Option<String>,

    /// Summarize the differences when the references differ
    #[arg(long)]
    show_diff: bool,

    /// Print the supported digest algorithms and exit
    #[arg(long)]
    list_algorithms: bool,

    #[command(flatten)]
    global: GlobalOptions,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(CompareError::EXIT_CODE),
            }
        }
    };

    let default_filter = match std::env::var(TRACE_ENV).as_deref() {
        Ok("1") => "debug",
        _ => "warn",
    };
    if let Err(e) = git_utils::logging::init(default_filter) {
        eprintln!("warning: {e}");
    }

    if let Some(dir) = &cli.global.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("error: cannot change to '{}': {}", dir.display(), e);
            process::exit(CompareError::EXIT_CODE);
        }
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(CompareError::EXIT_CODE);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if cli.list_algorithms {
        for algorithm in HashAlgorithm::ALL {
            println!("{algorithm} ({} bits)", algorithm.bits());
        }
        return Ok(0);
    }

    let output = OutputConfig::from(cli.global.verbosity());
    let mut console = Console::stdio(output);

    let (Some(left), Some(right)) = (cli.left.as_deref(), cli.right.as_deref()) else {
        let err = CompareError::InvalidArguments("two references are required".to_string());
        console.error(&err.to_string());
        return Ok(err.exit_code());
    };

    let start = std::env::current_dir().context("cannot determine the current directory")?;
    let (repo, config) = match configure(&cli, &start, output) {
        Ok(setup) => setup,
        Err(err) => {
            console.error(&err.to_string());
            return Ok(err.exit_code());
        }
    };
    tracing::debug!(
        git_dir = %repo.git_dir().display(),
        work_tree = ?repo.work_tree(),
        method = %config.method,
        algorithm = %config.algorithm,
        "configured"
    );

    let outcome = Comparison::new(&repo, &config, &mut console).run(left, right);
    Ok(outcome.exit_code())
}

/// Locate the repository and layer its config under the command line flags.
fn configure(cli: &Cli, start: &Path, output: OutputConfig) -> Result<(Repository, CompareConfig), CompareError> {
    let repo = Repository::discover(start)?;
    let config = CompareConfig::from_repository(&repo)?
        .with_method(cli.method.as_deref())?
        .with_algorithm(cli.algorithm.as_deref())
        .with_show_diff(cli.show_diff)
        .with_output(output);
    Ok((repo, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_invocation() {
        let cli = Cli::try_parse_from([
            "git-compare",
            "v1",
            "HEAD~2",
            "--method",
            "listing",
            "--algorithm",
            "sha512sum",
            "--show-diff",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.left.as_deref(), Some("v1"));
        assert_eq!(cli.right.as_deref(), Some("HEAD~2"));
        assert_eq!(cli.method.as_deref(), Some("listing"));
        assert!(cli.show_diff);
        assert!(cli.global.verbose);
    }

    #[test]
    fn second_reference_is_required() {
        let err = Cli::try_parse_from(["git-compare", "v1"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn list_algorithms_needs_no_references() {
        let cli = Cli::try_parse_from(["git-compare", "--list-algorithms"]).unwrap();
        assert!(cli.list_algorithms);
        assert!(cli.left.is_none());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let err = Cli::try_parse_from(["git-compare", "a", "b", "-v", "-q"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
