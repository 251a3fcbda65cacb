use std::{fmt, path::PathBuf};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Scope {
    System,
    User,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::System => write!(f, "system"),
            Scope::User => write!(f, "user"),
        }
    }
}

/// A `.desktop` file identified by its path. Contents are never parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DesktopEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub scope: Scope,
}

impl DesktopEntry {
    pub fn new(path: PathBuf, scope: Scope) -> Self {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name, scope }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    pub system: Vec<DesktopEntry>,
    pub user: Vec<DesktopEntry>,
}

impl FileCollection {
    pub fn in_scope(&self, scope: Scope) -> &[DesktopEntry] {
        match scope {
            Scope::System => &self.system,
            Scope::User => &self.user,
        }
    }

    /// System entries first, then user entries.
    pub fn all(&self) -> impl Iterator<Item = &DesktopEntry> {
        self.system.iter().chain(self.user.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_taken_from_path() {
        let entry = DesktopEntry::new(PathBuf::from("/usr/share/applications/firefox.desktop"), Scope::System);
        assert_eq!(entry.file_name, "firefox.desktop");
    }

    #[test]
    fn all_lists_system_before_user() {
        let files = FileCollection {
            system: vec![DesktopEntry::new("/s/a.desktop".into(), Scope::System)],
            user: vec![DesktopEntry::new("/u/b.desktop".into(), Scope::User)],
        };
        let names: Vec<&str> = files.all().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, ["a.desktop", "b.desktop"]);
        assert_eq!(files.in_scope(Scope::User).len(), 1);
    }
}
