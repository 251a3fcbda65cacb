use std::env;

use clap::Parser;
use thiserror::Error;

use crate::model::Scope;

#[derive(Parser, Debug)]
#[command(
    name = "deskedit",
    version,
    about = "List, search and edit .desktop application launchers"
)]
pub struct Cli {
    /// List application files
    #[arg(long)]
    pub get: bool,

    /// Search application files by name (case-insensitive)
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Restrict to user-specific files
    #[arg(short = 'u')]
    pub user: bool,

    /// Restrict to system-wide files
    #[arg(short = 's')]
    pub system: bool,

    /// Include files without the .desktop suffix
    #[arg(short, long)]
    pub all: bool,

    /// Editor to open the file with (default: $EDITOR, else ask)
    #[arg(long, value_name = "CMD")]
    pub editor: Option<String>,

    /// Command used when the file is not writable
    #[arg(long, value_name = "CMD", default_value = "sudo")]
    pub elevator: String,

    /// Skim color scheme, e.g. "dark", "light", "none", or a custom spec
    /// like: dark,current_bg:24,matched:#00FF00
    #[arg(long = "color", value_name = "SPEC")]
    pub color_spec: Option<String>,

    /// Disable scope/name coloring in the picker
    #[arg(long)]
    pub no_seg_colors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `None` prints both collections without prompting.
    List(Option<Scope>),
    Search { term: String, scope: Option<Scope> },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("one of --get or --search is required")]
    NoMode,
    #[error("--get and --search cannot be used together")]
    ConflictingModes,
    #[error("-u and -s cannot be used together")]
    ConflictingScopes,
    #[error("search term must not be empty")]
    EmptySearchTerm,
}

impl Cli {
    pub fn mode(&self) -> Result<Mode, UsageError> {
        if !self.get && self.search.is_none() {
            return Err(UsageError::NoMode);
        }
        if self.get && self.search.is_some() {
            return Err(UsageError::ConflictingModes);
        }
        if self.user && self.system {
            return Err(UsageError::ConflictingScopes);
        }

        let scope = if self.user {
            Some(Scope::User)
        } else if self.system {
            Some(Scope::System)
        } else {
            None
        };
        match &self.search {
            None => Ok(Mode::List(scope)),
            Some(term) if term.trim().is_empty() => Err(UsageError::EmptySearchTerm),
            Some(term) => Ok(Mode::Search { term: term.clone(), scope }),
        }
    }

    /// `--editor`, then a non-blank `$EDITOR`.
    pub fn resolve_editor(&self) -> Option<String> {
        self.editor_or(env::var("EDITOR").ok())
    }

    fn editor_or(&self, env_editor: Option<String>) -> Option<String> {
        let non_blank = |e: &String| !e.trim().is_empty();
        self.editor.clone().filter(non_blank).or(env_editor.filter(non_blank))
    }
}
