use std::borrow::Cow;

use anyhow::{Result, anyhow};
use log::debug;
use skim::prelude::*;
use skim_tuikit::prelude::{Attr, Color, Effect};

use crate::model::{DesktopEntry, Scope};

/// Rows of entries shown at once; longer lists scroll.
pub const VISIBLE_ROWS: usize = 15;

pub trait Selector {
    /// Index of the chosen entry, or `None` if the user aborted.
    /// Never called with an empty slice.
    fn select(&mut self, entries: &[DesktopEntry]) -> Result<Option<usize>>;
}

pub struct SkimPicker {
    pub color_spec: Option<String>,
    pub seg_colors: bool,
}

struct EntryItem {
    text: String,
    display: AnsiString<'static>,
    position: String,
    index: usize,
}

impl SkimItem for EntryItem {
    fn text(&self) -> Cow<str> { Cow::Borrowed(&self.text) }
    fn output(&self) -> Cow<str> { Cow::Borrowed(&self.position) }
    fn get_index(&self) -> usize { self.index }
    fn set_index(&mut self, index: usize) { self.index = index; }

    fn display<'a>(&'a self, context: DisplayContext<'a>) -> AnsiString<'a> {
        let attr = context.highlight_attr;
        let highlights = matched_spans(context.matches, context.text)
            .into_iter()
            .map(|span| (attr, span))
            .collect();
        let mut line = self.display.clone();
        line.override_attrs(highlights);
        line
    }
}

/// Matched text as `(start, end)` character spans, whichever form skim reports.
fn matched_spans(matches: Matches, text: &str) -> Vec<(u32, u32)> {
    let char_at = |byte: usize| text[..byte].chars().count() as u32;
    match matches {
        Matches::None => Vec::new(),
        Matches::CharIndices(indices) => merge_runs(indices.iter().copied()),
        Matches::CharRange(start, end) => vec![(start as u32, end as u32)],
        Matches::ByteRange(start, end) => vec![(char_at(start), char_at(end))],
    }
}

/// Collapses ascending character indices into contiguous spans.
fn merge_runs(indices: impl IntoIterator<Item = usize>) -> Vec<(u32, u32)> {
    let mut spans: Vec<(u32, u32)> = Vec::new();
    for idx in indices.into_iter().map(|i| i as u32) {
        match spans.last_mut() {
            Some((_, end)) if *end == idx => *end += 1,
            _ => spans.push((idx, idx + 1)),
        }
    }
    spans
}

impl SkimPicker {
    pub fn new(color_spec: Option<String>, seg_colors: bool) -> Self {
        Self { color_spec, seg_colors }
    }
}

impl Selector for SkimPicker {
    fn select(&mut self, entries: &[DesktopEntry]) -> Result<Option<usize>> {
        let (tx, rx): (SkimItemSender, SkimItemReceiver) = unbounded();

        let enable_seg_colors = self.seg_colors && std::env::var("NO_COLOR").is_err();
        for (i, e) in entries.iter().enumerate() {
            let (text, display) = build_colored_line(e, enable_seg_colors);
            let item = EntryItem { text, display, position: i.to_string(), index: i };
            let _ = tx.send(Arc::new(item));
        }
        drop(tx);

        let mut builder = SkimOptionsBuilder::default();
        builder
            .height((VISIBLE_ROWS + 2).to_string())
            .multi(false)
            .reverse(true)
            .prompt("> ".to_string());
        let mut options = builder.build().map_err(|e| anyhow!("invalid picker options: {e}"))?;

        // Prefer the CLI color scheme, else dark unless NO_COLOR is set
        if let Some(spec) = &self.color_spec {
            options.color = Some(spec.clone());
        } else if std::env::var("NO_COLOR").is_err() {
            options.color = Some("dark".to_string());
        }

        let Some(out) = Skim::run_with(&options, Some(rx)) else {
            return Ok(None);
        };
        if out.is_abort {
            debug!("selection aborted");
            return Ok(None);
        }
        let chosen = out
            .selected_items
            .first()
            .and_then(|item| item.output().parse::<usize>().ok())
            .filter(|&i| i < entries.len());
        Ok(chosen)
    }
}

/// `[scope] file_name (path)`, with optional colors on the scope tag and name.
pub fn build_colored_line(e: &DesktopEntry, seg_colors: bool) -> (String, AnsiString<'static>) {
    let scope = e.scope.to_string();
    let base = format!("[{scope}] {name} ({path})", name = e.file_name, path = e.path.display());

    if !seg_colors {
        return (base.clone(), base.into());
    }

    let mut fragments: Vec<(Attr, (u32, u32))> = Vec::new();
    let mut idx: usize = "[".chars().count();

    let scope_len = scope.chars().count();
    let scope_fg = match e.scope {
        Scope::System => Color::AnsiValue(3), // yellow
        Scope::User => Color::AnsiValue(6),   // cyan
    };
    let scope_attr = Attr { fg: scope_fg, bg: Color::Default, effect: Effect::empty() };
    fragments.push((scope_attr, (idx as u32, (idx + scope_len) as u32)));
    idx += scope_len + "] ".chars().count();

    let name_len = e.file_name.chars().count();
    let name_attr = Attr { fg: Color::Rgb(0xDA, 0x68, 0xEC), bg: Color::Default, effect: Effect::BOLD };
    fragments.push((name_attr, (idx as u32, (idx + name_len) as u32)));
    idx += name_len + " ".chars().count();

    let path_len = base.chars().count() - idx;
    let path_attr = Attr { fg: Color::AnsiValue(8), bg: Color::Default, effect: Effect::empty() };
    fragments.push((path_attr, (idx as u32, (idx + path_len) as u32)));

    let ansi = AnsiString::new_string(base.clone(), fragments);
    (base, ansi)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn line_shows_scope_name_and_path() {
        let e = DesktopEntry::new(PathBuf::from("/usr/share/applications/vim.desktop"), Scope::System);
        let (text, _) = build_colored_line(&e, false);
        assert_eq!(text, "[system] vim.desktop (/usr/share/applications/vim.desktop)");

        let (colored_text, _) = build_colored_line(&e, true);
        assert_eq!(colored_text, text);
    }

    #[test]
    fn fuzzy_hits_merge_into_runs() {
        assert_eq!(merge_runs([0, 1, 2, 5, 6, 9]), vec![(0, 3), (5, 7), (9, 10)]);
        assert!(merge_runs([]).is_empty());
    }

    #[test]
    fn byte_ranges_become_char_spans() {
        // "é" is two bytes
        let text = "[user] café.desktop";
        let start = text.find("fé").unwrap();
        let end = start + "fé".len();
        assert_eq!(matched_spans(Matches::ByteRange(start, end), text), vec![(9, 11)]);
        assert_eq!(matched_spans(Matches::CharRange(1, 5), text), vec![(1, 5)]);
        assert!(matched_spans(Matches::None, text).is_empty());
    }
}
