//! Markdown report generation
//!
//! This module renders recipe statistics, together with the metadata of
//! the most recent scrape run, as a human-readable markdown document.

use crate::output::stats::RecipeStatistics;
use crate::output::OutputResult;
use crate::storage::RunRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report to `output_path`
///
/// # Arguments
///
/// * `stats` - The computed statistics
/// * `run` - The latest scrape run, if any run was recorded
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(
    stats: &RecipeStatistics,
    run: Option<&RunRecord>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(stats, run);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Seconds between the start and end of a finished run
fn run_duration_seconds(run: &RunRecord) -> Option<i64> {
    let started = run.started_at.parse::<chrono::DateTime<chrono::Utc>>().ok()?;
    let finished = run
        .finished_at
        .as_deref()?
        .parse::<chrono::DateTime<chrono::Utc>>()
        .ok()?;
    Some((finished - started).num_seconds())
}

/// Formats statistics as markdown
pub fn format_markdown_report(stats: &RecipeStatistics, run: Option<&RunRecord>) -> String {
    let mut md = String::new();

    md.push_str("# Recipe Harvest Statistics\n\n");

    // Run metadata
    md.push_str("## Latest Scrape Run\n\n");
    match run {
        Some(run) => {
            md.push_str(&format!("- **Run ID**: {}\n", run.id));
            md.push_str(&format!("- **Started**: {}\n", run.started_at));
            if let Some(finished) = &run.finished_at {
                md.push_str(&format!("- **Finished**: {}\n", finished));
            }
            if let Some(duration) = run_duration_seconds(run) {
                md.push_str(&format!("- **Duration**: {} seconds\n", duration));
            }
            md.push_str(&format!("- **Status**: {}\n", run.status.to_db_string()));
            md.push_str(&format!("- **Recipes Saved**: {}\n", run.recipes_saved));
            md.push_str(&format!("- **Failures**: {}\n", run.failures));
            md.push_str(&format!("- **Config Hash**: {}\n\n", run.config_hash));
        }
        None => md.push_str("No scrape runs recorded.\n\n"),
    }

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Recipes**: {}\n", stats.total_recipes));
    md.push_str(&format!(
        "- **Average Ingredients**: {:.2}\n",
        stats.avg_ingredients
    ));
    md.push_str(&format!("- **Average Steps**: {:.2}\n", stats.avg_steps));
    if let Some((author, count)) = &stats.top_author {
        md.push_str(&format!(
            "- **Top Author**: {} ({} recipes)\n",
            author, count
        ));
    }
    if let Some(leader) = &stats.largest_portion {
        md.push_str(&format!(
            "- **Largest Portion**: [{}]({}) ({} servings)\n",
            leader.name, leader.url, leader.portions
        ));
    }
    md.push('\n');

    if !stats.recipes_by_subcategory.is_empty() {
        md.push_str("## Recipes by Subcategory\n\n");
        md.push_str("| Subcategory | Recipes |\n");
        md.push_str("|-------------|---------|\n");

        let mut counts: Vec<_> = stats.recipes_by_subcategory.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (subcategory, count) in counts {
            md.push_str(&format!("| {} | {} |\n", subcategory, count));
        }
        md.push('\n');
    }

    md
}
