//! Markdown rendering for the pull request summary comment.
//!
//! The body always starts with [`MARKER`], an HTML comment that lets the
//! publisher find the comment again regardless of which account posted it.

use crate::classify::{FileRow, Warning};

/// Hidden marker identifying the action's comment.
pub const MARKER: &str = "<!-- lunaria-action-comment -->";

pub const OVERVIEW_TRACKED: &str = "
🌕 **This pull request will trigger status changes.**

<details>
<summary>Learn more</summary>

By default, every PR changing files present in the [Lunaria configuration's `files` property](https://lunaria.dev/reference/configuration/#files-required) will be considered and trigger status changes accordingly.

You can change this by adding one of the keywords present in the [`ignoreKeywords` property in your Lunaria configuration file](https://lunaria.dev/reference/configuration/#ignorekeywords) in the PR's title (ignoring all files) or by [including a tracker directive](https://lunaria.dev/guides/tracking/#tracker-directives) in the merged commit's description.
</details>";

/// Overview shown when the title carries an ignore keyword.
pub fn overview_untracked(keyword: &str) -> String {
    format!(
        "
🌑 **This pull request will _not_ trigger status changes.**

<details>
<summary>Learn more</summary>

Lunaria automatically ignores changes on specific PRs by adding a ignored keyword in its title. Found: `{keyword}`.

You can change this by either removing the keyword above from the PR's title, or modifying the [`ignoreKeywords` property in your Lunaria configuration file](https://lunaria.dev/reference/configuration/#ignorekeywords).
</details>"
    )
}

/// Render rows as an aligned markdown table; the first row is the header.
pub fn markdown_table(rows: &[Vec<String>]) -> String {
    let Some(header) = rows.first() else {
        return String::new();
    };
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(header.len());
    let mut widths = vec![3usize; cols];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |row: &[String]| -> String {
        let cells: Vec<String> = (0..cols)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let pad = widths[i] - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        format!("| {} |", cells.join(" | "))
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render(header.as_slice()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(format!("| {} |", rule.join(" | ")));
    for row in &rows[1..] {
        lines.push(render(row.as_slice()));
    }
    lines.join("\n")
}

/// Table of tracked files: locale, linked display path, note.
pub fn files_table(rows: &[FileRow]) -> String {
    let mut table = vec![vec![
        "Locale".to_string(),
        "File".to_string(),
        "Note".to_string(),
    ]];
    for r in rows {
        table.push(vec![
            r.lang.clone(),
            format!("[{}]({})", r.display_path, r.blob_url),
            r.note_cell(),
        ]);
    }
    markdown_table(&table)
}

pub fn warnings_table() -> String {
    let mut table = vec![vec!["Icon".to_string(), "Description".to_string()]];
    for w in Warning::ALL {
        table.push(vec![w.icon().to_string(), w.description().to_string()]);
    }
    markdown_table(&table)
}

/// Files table followed by the collapsible warnings reference.
pub fn tracked_files_details(files_table: &str, warnings_table: &str) -> String {
    format!(
        "
{files_table}

<details>
<summary>Warnings reference</summary>

{warnings_table}

</details>"
    )
}

/// Full comment body.
pub fn body(overview: &str, tracked_files: &str) -> String {
    format!(
        "
{MARKER}

## Lunaria Status Overview

{overview}

### Tracked Files

{tracked_files}"
    )
}

/// Render the complete comment for classified rows.
pub fn render(overview: &str, rows: &[FileRow]) -> String {
    body(
        overview,
        &tracked_files_details(&files_table(rows), &warnings_table()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Outcome;

    fn row(lang: &str, path: &str, outcome: Outcome, warnings: Vec<Warning>) -> FileRow {
        FileRow {
            lang: lang.into(),
            display_path: path.into(),
            blob_url: format!("https://github.com/o/r/blob/sha/{}", path),
            outcome,
            warnings,
        }
    }

    #[test]
    fn test_markdown_table_is_aligned() {
        let t = markdown_table(&[
            vec!["A".into(), "Long header".into()],
            vec!["value".into(), "x".into()],
        ]);
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines[0], "| A     | Long header |");
        assert_eq!(lines[1], "| ----- | ----------- |");
        assert_eq!(lines[2], "| value | x           |");
    }

    #[test]
    fn test_render_layout_and_marker() {
        let rows = vec![
            row("en", "index.md", Outcome::SourceChanged, vec![]),
            row("fr", "index.md", Outcome::LocalizationChanged, vec![Warning::Outdated]),
        ];
        let out = render(OVERVIEW_TRACKED, &rows);
        assert!(out.contains(MARKER));
        let marker = out.find(MARKER).unwrap();
        let heading = out.find("## Lunaria Status Overview").unwrap();
        let overview = out.find("🌕").unwrap();
        let tracked = out.find("### Tracked Files").unwrap();
        let table = out.find("| Locale").unwrap();
        let warnings = out.find("<summary>Warnings reference</summary>").unwrap();
        assert!(marker < heading && heading < overview && overview < tracked);
        assert!(tracked < table && table < warnings);
        assert!(out.contains("[index.md](https://github.com/o/r/blob/sha/index.md)"));
        assert!(out.contains("Localization changed, will be marked as complete. 🔄️"));
        assert!(out.contains("| Icon"));
    }

    #[test]
    fn test_untracked_overview_reports_keyword() {
        let o = overview_untracked("skip-i18n");
        assert!(o.contains("Found: `skip-i18n`."));
        assert!(o.contains("will _not_ trigger"));
    }
}
