use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    cli::Mode,
    edit::{EditorLauncher, Spawner},
    model::{DesktopEntry, FileCollection, Scope},
    search::filter_by_name,
    ui::Selector,
};

/// Terminal handles the dispatcher talks through.
pub struct Console<'a> {
    pub input: &'a mut dyn BufRead,
    pub out: &'a mut dyn Write,
}

pub fn run<S: Spawner>(
    mode: &Mode,
    files: &FileCollection,
    selector: &mut dyn Selector,
    launcher: &mut EditorLauncher<S>,
    console: &mut Console<'_>,
) -> Result<()> {
    match mode {
        Mode::List(None) => print_listing(files, console.out),
        Mode::List(Some(scope)) => {
            let entries = files.in_scope(*scope);
            if entries.is_empty() {
                writeln!(console.out, "No {} application files found.", scope_label(*scope))?;
                return Ok(());
            }
            pick_and_edit(entries, selector, launcher, console)
        }
        Mode::Search { term, scope } => {
            let matches = match scope {
                Some(s) => filter_by_name(files.in_scope(*s), term),
                None => filter_by_name(files.all(), term),
            };
            info!("{} matches for {term:?}", matches.len());
            if matches.is_empty() {
                writeln!(console.out, "No matches found for '{term}'.")?;
                return Ok(());
            }
            pick_and_edit(&matches, selector, launcher, console)
        }
    }
}

fn scope_label(scope: Scope) -> &'static str {
    match scope {
        Scope::System => "system-wide",
        Scope::User => "user-specific",
    }
}

fn print_listing(files: &FileCollection, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "System-wide application files:")?;
    for e in &files.system {
        writeln!(out, "{}", e.file_name)?;
    }
    writeln!(out)?;
    writeln!(out, "User-specific application files:")?;
    for e in &files.user {
        writeln!(out, "{}", e.file_name)?;
    }
    Ok(())
}

fn pick_and_edit<S: Spawner>(
    entries: &[DesktopEntry],
    selector: &mut dyn Selector,
    launcher: &mut EditorLauncher<S>,
    console: &mut Console<'_>,
) -> Result<()> {
    let Some(idx) = selector.select(entries).context("selector failed")? else {
        info!("no selection made");
        return Ok(());
    };
    let Some(entry) = entries.get(idx) else {
        warn!("selector returned out-of-range index {idx}");
        return Ok(());
    };

    // Editor failures are reported, never fatal
    match launcher.launch(&entry.path, console.input, console.out) {
        Ok(inv) => {
            let editor = if inv.elevated { inv.args[0].to_string_lossy().into_owned() } else { inv.program };
            writeln!(console.out, "Opened {} with {editor}", entry.path.display())?;
        }
        Err(err) => writeln!(console.out, "Error opening the editor: {err}")?,
    }
    Ok(())
}
