//! Run summary printed after a sync pass

use folio_engine::{AssetReport, CategoryReport, ManifestStatus, SyncReport};
use owo_colors::OwoColorize;

/// Print the headline, per-category breakdown and the list of changed paths
pub fn print_summary(report: &SyncReport, dry_run: bool) {
    let changes = report.changes.len();
    let failures = report.failures();

    if dry_run {
        println!(
            "{} {} would be written",
            "●".bright_green(),
            changes.to_string().bright_white().bold()
        );
    } else if failures > 0 {
        println!(
            "{} {} | {} {}",
            "●".bright_green(),
            changes.to_string().bright_green().bold(),
            "●".bright_red(),
            failures.to_string().bright_red().bold(),
        );
    } else if report.is_unchanged() {
        println!("{} {}", "●".bright_green(), "Backup is up to date".bright_white());
    } else {
        println!(
            "{} {} written",
            "●".bright_green(),
            changes.to_string().bright_green().bold()
        );
    }

    for category in &report.categories {
        if category.missing {
            println!("  {}", format!("{}: source directory missing", category.key).yellow());
        } else {
            println!("  {}", category_line(category).dimmed());
        }
    }
    println!("  {}", asset_line(&report.assets, report.referenced_assets).dimmed());
    println!("  {}", manifest_line(report.manifest).dimmed());

    if !report.changes.is_empty() {
        println!("  {}", change_heading(changes, dry_run).bright_white());
        for path in &report.changes {
            println!("    {} {}", "+".bright_green(), path);
        }
    }
}

/// `3 written:` above the change list, `3 would be written:` for dry runs
pub fn change_heading(count: usize, dry_run: bool) -> String {
    if dry_run {
        format!("{count} would be written:")
    } else {
        format!("{count} written:")
    }
}

/// `posts: 2 updated, 5 unchanged, 1 ignored`
pub fn category_line(category: &CategoryReport) -> String {
    let mut parts = vec![
        format!("{} updated", category.updated),
        format!("{} unchanged", category.skipped),
    ];
    if category.ignored > 0 {
        parts.push(format!("{} ignored", category.ignored));
    }
    if category.failed > 0 {
        parts.push(format!("{} failed", category.failed));
    }
    format!("{}: {}", category.key, parts.join(", "))
}

/// `assets: 2 copied, 1 unchanged of 3 referenced`
pub fn asset_line(assets: &AssetReport, referenced: usize) -> String {
    let mut line = format!(
        "assets: {} copied, {} unchanged of {referenced} referenced",
        assets.copied, assets.skipped
    );

    let extras = [
        (assets.orphans, "unreferenced"),
        (assets.dangling, "dangling"),
        (assets.failed, "failed"),
    ];
    for (count, label) in extras {
        if count > 0 {
            line.push_str(&format!(", {count} {label}"));
        }
    }
    line
}

fn manifest_line(status: ManifestStatus) -> &'static str {
    match status {
        ManifestStatus::Written => "manifest: written",
        ManifestStatus::Unchanged => "manifest: unchanged",
        ManifestStatus::Failed => "manifest: failed",
    }
}
