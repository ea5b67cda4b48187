#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `oc-stat` command. Every operand becomes a status
//! request on an [`offload::Offload`]; all requests are dispatched together
//! and their [`metadata::PortableStat`] records are printed in operand order,
//! as text or, with `--json`, as one JSON object per line.
//!
//! # Design
//!
//! [`run`] takes the arguments and the output handles, so tests drive the
//! whole command without spawning a process. Parsing is a small
//! [`clap`](https://docs.rs/clap/) command; rendering lives in a private
//! module.
//!
//! # Exit codes
//!
//! - `0`: every request succeeded.
//! - `1`: at least one request failed; each failure is reported on stderr.
//! - `2`: the command line could not be parsed.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["oc-stat", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("oc-stat "));
//! ```

mod render;

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};
use logging::VerbosityConfig;
use metadata::SizeWidth;
use offload::{Offload, OffloadConfig, StatOp};

pub use render::OutputFormat;

/// Program name used in usage and diagnostics.
pub const PROGRAM_NAME: &str = "oc-stat";

/// Exit status when every request succeeded.
pub const EXIT_OK: i32 = 0;
/// Exit status when at least one request failed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for command-line errors.
pub const EXIT_USAGE: i32 = 2;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

const HELP_TEXT: &str = concat!(
    "Usage: oc-stat [OPTIONS] [PATH]...\n",
    "\n",
    "Reports the portable file status of each PATH and each --fd descriptor.\n",
    "Requests run concurrently on a worker pool; results print in operand order.\n",
    "\n",
    "Options:\n",
    "  -P, --no-dereference  Report symlinks themselves (lstat) instead of their targets.\n",
    "      --fd N            Also report the open descriptor N (fstat). Repeatable.\n",
    "      --narrow          Report sizes in the 32-bit representation.\n",
    "      --json            Print one JSON object per operand.\n",
    "  -j, --jobs N          Number of worker threads (default: OC_STAT_WORKERS or CPU count).\n",
    "  -v, --verbose         Increase diagnostic verbosity. Repeatable.\n",
    "      --info FLAGS      Adjust info categories (stat, summary), e.g. stat2.\n",
    "      --debug FLAGS     Adjust debug categories (job, complete, pool, worker).\n",
    "  -h, --help            Show this help message and exit.\n",
    "  -V, --version         Output version information and exit.\n",
);

/// Parsed command line.
#[derive(Debug, Default)]
struct ParsedArgs {
    show_help: bool,
    show_version: bool,
    no_dereference: bool,
    narrow: bool,
    json: bool,
    jobs: Option<usize>,
    verbose: u8,
    info: Vec<String>,
    debug: Vec<String>,
    descriptors: Vec<i32>,
    paths: Vec<OsString>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-dereference")
                .long("no-dereference")
                .short('P')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fd")
                .long("fd")
                .value_name("N")
                .action(ArgAction::Append)
                .value_parser(value_parser!(i32)),
        )
        .arg(Arg::new("narrow").long("narrow").action(ArgAction::SetTrue))
        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .value_name("N")
                .action(ArgAction::Set)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("paths")
                .action(ArgAction::Append)
                .num_args(0..)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let split_flags = |values: Option<clap::parser::Values<String>>| -> Vec<String> {
        values
            .into_iter()
            .flatten()
            .flat_map(|value| {
                value
                    .split(',')
                    .filter(|token| !token.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect()
    };

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        no_dereference: matches.get_flag("no-dereference"),
        narrow: matches.get_flag("narrow"),
        json: matches.get_flag("json"),
        jobs: matches.remove_one::<usize>("jobs"),
        verbose: matches.get_count("verbose"),
        info: split_flags(matches.remove_many::<String>("info")),
        debug: split_flags(matches.remove_many::<String>("debug")),
        descriptors: matches
            .remove_many::<i32>("fd")
            .map(Iterator::collect)
            .unwrap_or_default(),
        paths: matches
            .remove_many::<OsString>("paths")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

/// Builds the verbosity configuration from `-v`, `--info`, and `--debug`.
fn verbosity(parsed: &ParsedArgs) -> Result<VerbosityConfig, String> {
    let mut config = VerbosityConfig::from_verbose_level(parsed.verbose);
    for token in &parsed.info {
        config.apply_info_flag(token)?;
    }
    for token in &parsed.debug {
        config.apply_debug_flag(token)?;
    }
    Ok(config)
}

fn usage_error<Err: Write>(stderr: &mut Err, message: &str) -> i32 {
    let _ = writeln!(stderr, "{PROGRAM_NAME}: {message}");
    let _ = writeln!(stderr, "{}", HELP_TEXT.lines().next().unwrap_or_default());
    EXIT_USAGE
}

/// Runs the command with the given arguments and output handles.
///
/// Returns the process exit code; see the crate documentation.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let rendered = error.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            let message = first.strip_prefix("error: ").unwrap_or(first);
            usage_error(stderr, message)
        }
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return if stdout.write_all(HELP_TEXT.as_bytes()).is_ok() {
            EXIT_OK
        } else {
            EXIT_FAILURE
        };
    }
    if parsed.show_version {
        return if writeln!(stdout, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION")).is_ok() {
            EXIT_OK
        } else {
            EXIT_FAILURE
        };
    }
    if parsed.paths.is_empty() && parsed.descriptors.is_empty() {
        return usage_error(stderr, "no operands given");
    }

    let config = match verbosity(&parsed) {
        Ok(config) => config,
        Err(message) => return usage_error(stderr, &message),
    };
    // A second installation in the same process keeps the first subscriber.
    let _ = logging::init_tracing(config);

    let format = if parsed.json {
        match OutputFormat::json() {
            Some(format) => format,
            None => return usage_error(stderr, "--json is not available in this build"),
        }
    } else {
        OutputFormat::Text
    };

    let mut offload_config = OffloadConfig::new();
    if let Some(jobs) = parsed.jobs {
        offload_config = offload_config.workers(jobs);
    }
    let mut offload = match Offload::new(&offload_config) {
        Ok(offload) => offload,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            return EXIT_FAILURE;
        }
    };

    let width = SizeWidth::from_wide(!parsed.narrow);
    let operands = operands(&parsed);
    let results = offload.stat_batch(operands.iter().map(|(_, op)| op.clone()), width);

    let mut failed = 0_usize;
    for ((label, op), result) in operands.iter().zip(&results) {
        match result {
            Ok(status) => {
                logging::trace_stat!(operand = %label, kind = %status.kind, "reported");
                if render::write_status(stdout, format, label, op, status).is_err() {
                    return EXIT_FAILURE;
                }
            }
            Err(error) => {
                failed += 1;
                let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
                if format.reports_failures()
                    && render::write_failure(stdout, format, label, op, error).is_err()
                {
                    return EXIT_FAILURE;
                }
            }
        }
    }
    let _ = stdout.flush();

    logging::trace_summary!(
        requests = results.len(),
        failed,
        workers = offload.workers(),
        "done"
    );
    if failed == 0 { EXIT_OK } else { EXIT_FAILURE }
}

/// Pairs each operand's display label with its request, paths first.
fn operands(parsed: &ParsedArgs) -> Vec<(String, StatOp)> {
    let paths = parsed.paths.iter().map(|raw| {
        let path = PathBuf::from(raw);
        let label = path.display().to_string();
        let op = if parsed.no_dereference {
            StatOp::Lstat(path)
        } else {
            StatOp::Stat(path)
        };
        (label, op)
    });
    let descriptors = parsed
        .descriptors
        .iter()
        .map(|&fd| (format!("fd:{fd}"), StatOp::Fstat(fd)));
    paths.chain(descriptors).collect()
}

/// Converts a status returned by [`run`] into an [`std::process::ExitCode`].
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_capture(args: &[&str]) -> (i32, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run(args.iter().copied(), &mut stdout, &mut stderr);
        (
            code,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn parse_args_collects_operands_and_flags() {
        let parsed = parse_args([
            "oc-stat", "-P", "--fd", "3", "--fd", "4", "--narrow", "-j", "2", "-vv", "a", "b",
        ])
        .unwrap();
        assert!(parsed.no_dereference);
        assert!(parsed.narrow);
        assert_eq!(parsed.descriptors, vec![3, 4]);
        assert_eq!(parsed.jobs, Some(2));
        assert_eq!(parsed.verbose, 2);
        assert_eq!(parsed.paths, vec![OsString::from("a"), OsString::from("b")]);
    }

    #[test]
    fn parse_args_splits_flag_lists() {
        let parsed = parse_args(["oc-stat", "--debug", "job2,worker", "--info=stat", "x"]).unwrap();
        assert_eq!(parsed.debug, vec!["job2", "worker"]);
        assert_eq!(parsed.info, vec!["stat"]);
        let config = verbosity(&parsed).unwrap();
        assert_eq!(config.debug.get(logging::DebugFlag::Job), 2);
        assert_eq!(config.debug.get(logging::DebugFlag::Worker), 1);
    }

    #[test]
    fn unknown_debug_flag_is_a_usage_error() {
        let (code, _, stderr) = run_capture(&["oc-stat", "--debug", "bogus", "/"]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stderr.contains("unknown debug flag"), "{stderr}");
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, stdout, stderr) = run_capture(&["oc-stat", "--help"]);
        assert_eq!(code, EXIT_OK);
        assert!(stdout.starts_with("Usage: oc-stat"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn missing_operands_is_a_usage_error() {
        let (code, stdout, stderr) = run_capture(&["oc-stat"]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stdout.is_empty());
        assert!(stderr.contains("Usage:"));
    }

    #[test]
    fn bad_descriptor_value_is_a_usage_error() {
        let (code, _, stderr) = run_capture(&["oc-stat", "--fd", "three"]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stderr.starts_with("oc-stat: "), "{stderr}");
    }

    #[test]
    fn operands_keep_paths_before_descriptors() {
        let parsed = parse_args(["oc-stat", "--fd", "0", "-P", "x"]).unwrap();
        let ops = operands(&parsed);
        assert_eq!(ops[0], ("x".to_owned(), StatOp::Lstat(PathBuf::from("x"))));
        assert_eq!(ops[1], ("fd:0".to_owned(), StatOp::Fstat(0)));
    }

    #[test]
    fn exit_codes_are_clamped() {
        assert_eq!(exit_code_from(0), std::process::ExitCode::SUCCESS);
        assert_eq!(exit_code_from(-3), std::process::ExitCode::from(0));
        assert_eq!(exit_code_from(999), std::process::ExitCode::from(255));
    }
}
