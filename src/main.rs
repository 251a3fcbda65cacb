mod cli;
mod dispatch;
mod edit;
mod model;
mod scan;
mod search;
mod ui;

use std::{
    ffi::OsString,
    io::{self, Write},
    process::ExitCode,
};

use clap::{CommandFactory, Parser};
use cli::{Cli, Mode};
use dispatch::Console;
use edit::{EditorConfig, EditorLauncher, SystemSpawner};
use scan::{DESKTOP_SUFFIX, Locations};
use ui::SkimPicker;

/// Parses and validates `args`. On `Err`, help or usage has already been
/// written and the value is the exit code.
fn parse_args<I, T>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> Result<(Cli, Mode), u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = write!(err, "{}", e.render());
            return Err(1);
        }
        // --help and --version
        Err(e) => {
            let _ = write!(out, "{}", e.render());
            return Err(0);
        }
    };
    match cli.mode() {
        Ok(mode) => Ok((cli, mode)),
        Err(e) => {
            let _ = writeln!(err, "error: {e}\n");
            let _ = write!(err, "{}", Cli::command().render_help());
            Err(1)
        }
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

/// A reader closing stdout early (`deskedit --get | head`) is not a failure.
fn exit_code_for(result: anyhow::Result<()>, err: &mut dyn Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) if is_broken_pipe(&e) => 0,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            1
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let (cli, mode) = match parse_args(std::env::args_os(), &mut io::stdout(), &mut io::stderr()) {
        Ok(parsed) => parsed,
        Err(code) => return ExitCode::from(code),
    };

    // Collect entries
    let suffix = if cli.all { None } else { Some(DESKTOP_SUFFIX) };
    let files = Locations::from_env().scan(suffix);

    let mut picker = SkimPicker::new(cli.color_spec.clone(), !cli.no_seg_colors);
    let config = EditorConfig { editor: cli.resolve_editor(), elevator: cli.elevator.clone() };
    let mut launcher = EditorLauncher::new(config, SystemSpawner);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let mut console = Console { input: &mut input, out: &mut out };

    let result = dispatch::run(&mode, &files, &mut picker, &mut launcher, &mut console)
        .and_then(|()| out.flush().map_err(Into::into));
    ExitCode::from(exit_code_for(result, &mut io::stderr()))
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    fn exit_of(args: &[&str]) -> (u8, String, String) {
        let argv = std::iter::once("deskedit").chain(args.iter().copied());
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let code = match parse_args(argv, &mut out, &mut err) {
            Ok(_) => 0,
            Err(code) => code,
        };
        (code, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn invalid_invocations_exit_one_with_usage() {
        let cases: [&[&str]; 5] =
            [&[], &["--get", "--search", "x"], &["--get", "-u", "-s"], &["--search", ""], &["--bogus"]];
        for args in cases {
            let (code, out, err) = exit_of(args);
            assert_eq!(code, 1, "{args:?}");
            assert!(out.is_empty(), "{args:?}");
            assert!(err.contains("Usage:"), "{args:?}: {err}");
        }
    }

    #[test]
    fn mode_errors_name_the_problem() {
        let (_, _, err) = exit_of(&["--get", "-u", "-s"]);
        assert!(err.contains("-u and -s cannot be used together"));
    }

    #[test]
    fn help_exits_zero_on_stdout() {
        let (code, out, err) = exit_of(&["--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("Usage:") && out.contains("--search"));
        assert!(err.is_empty());
    }

    #[test]
    fn valid_invocation_parses() {
        let argv = ["deskedit", "--search", "office", "-u"];
        let (cli, mode) = parse_args(argv, &mut io::sink(), &mut io::sink()).unwrap();
        assert_eq!(mode, Mode::Search { term: "office".into(), scope: Some(model::Scope::User) });
        assert!(!cli.all);
    }

    #[test]
    fn broken_pipe_exits_quietly() {
        let closed: anyhow::Result<()> =
            Err(io::Error::from(io::ErrorKind::BrokenPipe)).context("listing files");
        let mut err: Vec<u8> = Vec::new();
        assert_eq!(exit_code_for(closed, &mut err), 0);
        assert!(err.is_empty());
    }

    #[test]
    fn other_errors_exit_one() {
        let failed: anyhow::Result<()> = Err(anyhow::anyhow!("selector failed"));
        let mut err: Vec<u8> = Vec::new();
        assert_eq!(exit_code_for(failed, &mut err), 1);
        assert!(String::from_utf8(err).unwrap().contains("selector failed"));
        assert_eq!(exit_code_for(Ok(()), &mut io::sink()), 0);
    }
}
