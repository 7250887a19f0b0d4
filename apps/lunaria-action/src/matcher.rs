//! File rule matching for pull request filenames.

use crate::models::lunaria::FileConfig;
use glob::{MatchOptions, Pattern};

/// Always ignored, whether or not a rule lists it.
const DEPENDENCY_DIR_IGNORES: &[&str] = &["node_modules", "node_modules/**", "**/node_modules/**"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

fn is_match(filename: &str, pattern: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches_with(filename, MATCH_OPTIONS))
        .unwrap_or(false)
}

/// First rule whose `location` matches `filename` and whose ignore globs
/// (plus the dependency-directory exclusion) do not.
pub fn find_file_config<'a>(filename: &str, files: &'a [FileConfig]) -> Option<&'a FileConfig> {
    files.iter().find(|file| {
        is_match(filename, &file.location)
            && DEPENDENCY_DIR_IGNORES
                .iter()
                .copied()
                .chain(file.ignore.iter().map(String::as_str))
                .all(|ignored| !is_match(filename, ignored))
    })
}

/// Strip `repository.rootDir` from a repository-relative filename.
///
/// Rule globs are relative to the Lunaria root, not the repository root.
pub fn unroot_filename<'a>(root: &str, filename: &'a str) -> &'a str {
    let root = root.trim_end_matches('/');
    if root == "." || root.is_empty() {
        return filename;
    }
    filename
        .strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(filename)
}

/// Remove the first configured base prefix from a shared path.
pub fn collapse_filename<'a>(filename: &'a str, bases_to_hide: Option<&[String]>) -> &'a str {
    let Some(bases) = bases_to_hide else {
        return filename;
    };
    bases
        .iter()
        .filter(|b| !b.is_empty())
        .find_map(|b| filename.strip_prefix(b.as_str()))
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(location: &str, ignore: &[&str]) -> FileConfig {
        FileConfig {
            location: location.to_string(),
            ignore: ignore.iter().map(|s| s.to_string()).collect(),
            pattern: "@lang/@path".to_string(),
        }
    }

    #[test]
    fn test_location_and_ignore() {
        let files = vec![rule("docs/**/*.md", &["docs/drafts/**"])];
        assert!(find_file_config("docs/en/index.md", &files).is_some());
        assert!(find_file_config("docs/drafts/wip.md", &files).is_none());
        assert!(find_file_config("docs/en/index.mdx", &files).is_none());
        assert!(find_file_config("README.md", &files).is_none());
    }

    #[test]
    fn test_dependency_dir_always_ignored() {
        let files = vec![rule("**/*.md", &[])];
        assert!(find_file_config("node_modules/pkg/README.md", &files).is_none());
        assert!(find_file_config("docs/node_modules/pkg/a.md", &files).is_none());
        assert!(find_file_config("docs/a.md", &files).is_some());
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let files = vec![rule("docs/*.md", &[])];
        assert!(find_file_config("docs/a.md", &files).is_some());
        assert!(find_file_config("docs/fr/a.md", &files).is_none());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let files = vec![
            rule("ui/*.json", &["ui/skip.json"]),
            rule("ui/**", &[]),
        ];
        let first = find_file_config("ui/en.json", &files).unwrap();
        assert_eq!(first.location, "ui/*.json");
        // Ignored by the first rule, picked up by the second.
        let second = find_file_config("ui/skip.json", &files).unwrap();
        assert_eq!(second.location, "ui/**");
    }

    #[test]
    fn test_unroot_filename() {
        assert_eq!(unroot_filename(".", "docs/a.md"), "docs/a.md");
        assert_eq!(unroot_filename("docs", "docs/src/a.md"), "src/a.md");
        assert_eq!(unroot_filename("docs/", "docs/src/a.md"), "src/a.md");
        assert_eq!(unroot_filename("docs", "docsite/a.md"), "docsite/a.md");
        assert_eq!(unroot_filename("docs", "other/a.md"), "other/a.md");
    }

    #[test]
    fn test_collapse_filename() {
        let bases = vec!["src/content/docs/".to_string(), "src/".to_string()];
        assert_eq!(
            collapse_filename("src/content/docs/guide.md", Some(bases.as_slice())),
            "guide.md"
        );
        assert_eq!(collapse_filename("src/i18n/ui.json", Some(bases.as_slice())), "i18n/ui.json");
        assert_eq!(collapse_filename("lib/x.md", Some(bases.as_slice())), "lib/x.md");
        assert_eq!(collapse_filename("src/x.md", None), "src/x.md");
    }
}
