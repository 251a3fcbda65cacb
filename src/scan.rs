use std::{env, fs, path::{Path, PathBuf}};

use log::{debug, info, warn};

use crate::model::{DesktopEntry, FileCollection, Scope};

pub const DESKTOP_SUFFIX: &str = ".desktop";

const SYSTEM_DIRS: &[&str] = &["/usr/share/applications/", "/usr/local/share/applications/"];

/// Non-directory entries directly inside `dir`, in iteration order.
///
/// Listing is advisory: a missing or unreadable directory yields whatever was
/// read before the failure (usually nothing) and is only logged.
pub fn scan_dir(dir: &Path, suffix: Option<&str>) -> Vec<PathBuf> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(err) => {
            warn!("skipping {}: {err}", dir.display());
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("error while reading {}: {err}", dir.display());
                break;
            }
        };
        let Ok(file_type) = entry.file_type() else { continue };
        if file_type.is_dir() {
            continue;
        }
        if let Some(suffix) = suffix
            && !entry.file_name().to_string_lossy().ends_with(suffix)
        {
            continue;
        }
        out.push(entry.path());
    }
    debug!("{}: {} entries", dir.display(), out.len());
    out
}

#[derive(Debug, Clone)]
pub struct Locations {
    pub system: Vec<PathBuf>,
    pub user: Option<PathBuf>,
}

impl Locations {
    pub fn from_env() -> Self {
        let user = match env::var("HOME") {
            Ok(home) if !home.trim().is_empty() => {
                Some(PathBuf::from(home).join(".local").join("share").join("applications"))
            }
            _ => {
                warn!("HOME not set; user-specific files will not be listed");
                None
            }
        };
        Self {
            system: SYSTEM_DIRS.iter().map(PathBuf::from).collect(),
            user,
        }
    }

    pub fn scan(&self, suffix: Option<&str>) -> FileCollection {
        let system = self
            .system
            .iter()
            .flat_map(|dir| scan_dir(dir, suffix))
            .map(|p| DesktopEntry::new(p, Scope::System))
            .collect::<Vec<_>>();
        let user = self
            .user
            .as_deref()
            .map(|dir| scan_dir(dir, suffix))
            .unwrap_or_default()
            .into_iter()
            .map(|p| DesktopEntry::new(p, Scope::User))
            .collect::<Vec<_>>();
        info!("found {} system and {} user files", system.len(), user.len());
        FileCollection { system, user }
    }
}
