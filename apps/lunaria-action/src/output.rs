//! Output rendering for a finished run.
//!
//! Supports `human` (default) and `json` outputs. The JSON form carries the
//! run status plus the comment id and classified rows when a comment was
//! rendered.

use crate::action::{RunOutcome, SkipReason};
use crate::classify::FileRow;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print the outcome of a run in the requested format.
pub fn print_outcome(outcome: &RunOutcome, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_outcome_json(outcome))
                .unwrap_or_else(|_| "{}".to_string())
        ),
        _ => {
            let color = use_colors(output);
            match outcome {
                // Skips are already announced as notices.
                RunOutcome::Skipped(_) | RunOutcome::NoTrackedFiles => {}
                RunOutcome::Published {
                    action,
                    comment_id,
                    rows,
                    ignored_keyword,
                } => {
                    let verb = match action {
                        crate::publish::PublishAction::Created => "💬 created comment",
                        crate::publish::PublishAction::Updated => "📝 updated comment",
                    };
                    if color {
                        println!("{} {}", verb.green().bold(), comment_id.bold());
                    } else {
                        println!("{} {}", verb, comment_id);
                    }
                    print_rows(rows, color);
                    if let Some(k) = ignored_keyword {
                        println!("untracked: title matches ignore keyword `{}`", k);
                    }
                }
                RunOutcome::DryRun { body, .. } => {
                    if color {
                        println!("{}", "--- comment (dry run)".cyan().bold());
                    } else {
                        println!("--- comment (dry run)");
                    }
                    println!("{}", body.trim_start());
                }
            }
        }
    }
}

fn print_rows(rows: &[FileRow], color: bool) {
    for r in rows {
        let label = if color {
            r.outcome.label().bold().to_string()
        } else {
            r.outcome.label().to_string()
        };
        let icons: Vec<&str> = r.warnings.iter().map(|w| w.icon()).collect();
        println!("  {} {} ❲{}❳ {}", r.lang, r.display_path, label, icons.join(" "));
    }
}

fn skip_code(reason: &SkipReason) -> &'static str {
    match reason {
        SkipReason::NoPullRequest => "no-pull-request",
        SkipReason::NoRepository => "no-repository",
        SkipReason::WrongAction(_) => "wrong-action",
    }
}

/// Compose the outcome JSON object (pure) for testing/snapshot purposes.
pub fn compose_outcome_json(outcome: &RunOutcome) -> JsonVal {
    match outcome {
        RunOutcome::Skipped(reason) => json!({
            "status": "skipped",
            "reason": skip_code(reason),
            "message": reason.message(),
        }),
        RunOutcome::NoTrackedFiles => json!({
            "status": "no-tracked-files",
        }),
        RunOutcome::Published {
            action,
            comment_id,
            rows,
            ignored_keyword,
        } => json!({
            "status": action,
            "commentId": comment_id,
            "trackedFiles": rows,
            "ignoredKeyword": ignored_keyword,
        }),
        RunOutcome::DryRun {
            body,
            rows,
            ignored_keyword,
        } => json!({
            "status": "dry-run",
            "trackedFiles": rows,
            "ignoredKeyword": ignored_keyword,
            "body": body,
        }),
    }
}
