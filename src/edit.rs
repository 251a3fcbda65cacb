use std::{
    ffi::OsString,
    fs::OpenOptions,
    io::{self, BufRead, Write},
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use log::debug;
use thiserror::Error;

const EDITOR_CHOICES: &[&str] = &["nano", "vi", "pico"];

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no editor command given")]
    EmptyEditor,
    #[error("failed to read editor choice: {0}")]
    Prompt(#[source] io::Error),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with status {code:?}")]
    Exited { program: String, code: Option<i32> },
}

/// A fully built command line. Stdio is always inherited from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub elevated: bool,
}

pub trait Spawner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ExitStatus>;
}

pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ExitStatus> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
    }
}

#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Editor command, possibly with arguments. `None` asks on first use.
    pub editor: Option<String>,
    pub elevator: String,
}

pub struct EditorLauncher<S> {
    config: EditorConfig,
    spawner: S,
}

/// Read-write open without create/truncate; any failure counts as not writable.
pub fn is_writable(path: &Path) -> bool {
    OpenOptions::new().read(true).write(true).open(path).is_ok()
}

/// Numbered editor menu. Anything but a valid number falls back to nano.
pub fn prompt_editor(input: &mut dyn BufRead, out: &mut dyn Write) -> io::Result<String> {
    writeln!(out, "No default text editor set in the environment variables.")?;
    writeln!(out, "Please choose an editor from the following options:")?;
    for (i, editor) in EDITOR_CHOICES.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, editor)?;
    }
    write!(out, "Enter the number of your choice: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let picked = line
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| EDITOR_CHOICES.get(i));
    match picked {
        Some(editor) => Ok(editor.to_string()),
        None => {
            writeln!(out, "Invalid choice. Using 'nano' as the default editor.")?;
            Ok(EDITOR_CHOICES[0].to_string())
        }
    }
}

impl<S: Spawner> EditorLauncher<S> {
    pub fn new(config: EditorConfig, spawner: S) -> Self {
        Self { config, spawner }
    }

    /// Resolves the editor once; later calls reuse the first answer.
    pub fn editor(&mut self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<&str, LaunchError> {
        if self.config.editor.is_none() {
            let chosen = prompt_editor(input, out).map_err(LaunchError::Prompt)?;
            self.config.editor = Some(chosen);
        }
        Ok(self.config.editor.as_deref().unwrap_or_default())
    }

    pub fn invocation(&self, editor: &str, path: &Path) -> Result<Invocation, LaunchError> {
        let mut words = editor.split_whitespace();
        let program = words.next().ok_or(LaunchError::EmptyEditor)?;
        let mut args: Vec<OsString> = words.map(OsString::from).collect();
        args.push(path.as_os_str().to_owned());

        if is_writable(path) {
            return Ok(Invocation { program: program.to_string(), args, elevated: false });
        }
        args.insert(0, OsString::from(program));
        Ok(Invocation { program: self.config.elevator.clone(), args, elevated: true })
    }

    /// Opens `path` and waits for the editor to exit.
    pub fn launch(
        &mut self,
        path: &Path,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<Invocation, LaunchError> {
        let editor = self.editor(input, out)?.to_string();
        let invocation = self.invocation(&editor, path)?;
        if invocation.elevated {
            let _ = writeln!(
                out,
                "'{}' is not writable or does not exist; opening with {}...",
                path.display(),
                invocation.program
            );
        }
        debug!("running {} {:?}", invocation.program, invocation.args);

        let status = self.spawner.run(&invocation).map_err(|source| LaunchError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(LaunchError::Exited { program: invocation.program.clone(), code: status.code() });
        }
        Ok(invocation)
    }
}

#[cfg(test)]
impl<S> EditorLauncher<S> {
    pub fn spawner(&self) -> &S { &self.spawner }
    pub fn spawner_mut(&mut self) -> &mut S { &mut self.spawner }
}

/// Records invocations instead of spawning them.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSpawner {
    pub calls: Vec<Invocation>,
    pub exit_code: i32,
    pub not_found: bool,
}

#[cfg(test)]
impl Spawner for RecordingSpawner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ExitStatus> {
        use std::os::unix::process::ExitStatusExt;

        self.calls.push(invocation.clone());
        if self.not_found {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
        }
        Ok(ExitStatus::from_raw(self.exit_code << 8))
    }
}
