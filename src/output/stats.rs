//! Final summary reporting.

use console::style;

use crate::dedup::Analysis;

/// Print the closing summary with next steps.
pub fn print_summary(analysis: &Analysis) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Final Summary:").bold());
    println!("  Computers analyzed:     {}", analysis.records_analyzed);
    println!("  Duplicate groups:       {}", analysis.duplicate_groups());
    println!("  Duplicate devices:      {}", analysis.duplicate_devices());
    println!(
        "  To keep (newest):       {}",
        style(analysis.devices_to_keep()).green()
    );
    println!(
        "  To remove (older):      {}",
        style(analysis.devices_to_remove()).red()
    );
    if !analysis.rejected.is_empty() {
        println!(
            "  Skipped (no valid MAC): {}",
            style(analysis.rejected.len()).yellow()
        );
    }
    println!("{}", style("═".repeat(50)).dim());

    if analysis.devices_to_remove() > 0 {
        println!();
        println!("{}", style("Next Steps:").bold());
        println!("  1. Review the detailed report above");
        println!("  2. Remove devices marked 'REMOVE' through the Watchman web interface");
        println!("  3. Keep devices marked 'KEEP' (they have the most recent report dates)");
        println!("  4. Use the computer URLs to navigate directly to each device");
        println!();
        println!(
            "{}",
            style("The Watchman API does not support computer deletion; removal is manual.")
                .dim()
        );
    }
}
