use crate::model::DesktopEntry;

/// Entries whose file name contains `term`, ignoring case. Input order is kept.
pub fn filter_by_name<'a, I>(entries: I, term: &str) -> Vec<DesktopEntry>
where
    I: IntoIterator<Item = &'a DesktopEntry>,
{
    let needle = term.to_lowercase();
    entries
        .into_iter()
        .filter(|e| e.file_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scope;

    fn entries(names: &[&str]) -> Vec<DesktopEntry> {
        names
            .iter()
            .map(|n| DesktopEntry::new(format!("/usr/share/applications/{n}").into(), Scope::System))
            .collect()
    }

    fn names(found: &[DesktopEntry]) -> Vec<&str> {
        found.iter().map(|e| e.file_name.as_str()).collect()
    }

    #[test]
    fn match_ignores_case() {
        let all = entries(&["firefox.desktop", "vim.desktop"]);
        assert_eq!(names(&filter_by_name(&all, "FIREFOX")), ["firefox.desktop"]);
        assert_eq!(names(&filter_by_name(&all, "firefox")), ["firefox.desktop"]);
        assert!(filter_by_name(&all, "zz").is_empty());
    }

    #[test]
    fn input_order_is_preserved() {
        let all = entries(&["b-term.desktop", "a-term.desktop", "c.desktop"]);
        assert_eq!(names(&filter_by_name(&all, "term")), ["b-term.desktop", "a-term.desktop"]);
    }

    #[test]
    fn upper_case_file_names_match_lower_case_terms() {
        let all = entries(&["org.KDE.Konsole.desktop"]);
        assert_eq!(filter_by_name(&all, "konsole").len(), 1);
    }
}
