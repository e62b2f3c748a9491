//! Console summary of a finished crawl

use crate::output::CrawlReport;

/// Prints the crawl summary to stdout in a formatted manner
pub fn print_summary(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Start URL: {}", report.start_url);
    println!("  Output folder: {}", report.base_folder.display());
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {:.2}s", duration);
    }
    println!();

    println!("Pages:");
    println!("  Saved: {}", report.pages.len());
    println!("  Failed: {}", report.page_failures.len());
    println!("  Off-origin links filtered: {}", report.off_origin_links);
    println!();

    println!("Resources:");
    println!("  Downloaded: {}", report.saved_downloads().count());
    println!("  Failed: {}", report.failed_downloads().count());
    println!(
        "  Duplicates skipped: {}",
        report.duplicate_resources_skipped
    );
    println!();

    if !report.page_failures.is_empty() {
        println!("Failed Pages ({}):", report.page_failures.len());
        for failure in &report.page_failures {
            println!("  - {}: {}", failure.url, failure.reason);
        }
        println!();
    }

    let failed: Vec<_> = report.failed_downloads().collect();
    if !failed.is_empty() {
        println!("Failed Resources ({}):", failed.len());
        for outcome in failed {
            println!(
                "  - {} ({} attempts): {}",
                outcome.url,
                outcome.attempts,
                outcome.error.as_deref().unwrap_or_default()
            );
        }
        println!();
    }

    println!("Success Rate: {:.1}%", report.success_rate());
}
