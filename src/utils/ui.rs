use crate::core::models::BuildSummary;
use colored::*;

/// Terminal summary printed after a build
pub struct BuildUI;

impl BuildUI {
    pub fn show_banner() {
        println!(
            "\n  {} {}",
            "DEXI BUILD".bright_cyan().bold(),
            concat!("v", env!("CARGO_PKG_VERSION")).bright_white()
        );
        println!();
    }

    pub fn show_summary(summary: &BuildSummary) {
        println!();
        for artifact in summary.artifacts() {
            let size_kb = artifact.size as f64 / 1024.0;
            let size_str = if size_kb < 1.0 {
                format!("{} B", artifact.size)
            } else {
                format!("{:.2} kB", size_kb)
            };

            println!(
                "  {} {} {}",
                "✓".bright_green(),
                artifact.path.display().to_string().bright_cyan(),
                format!("({}, {} modules)", size_str, artifact.modules).bright_black()
            );
        }

        for id in &summary.skipped {
            println!("  {} {}", "-".bright_black(), format!("{} (skipped)", id).bright_black());
        }

        for error in summary.failures() {
            eprintln!("{}", error.format_detailed().red());
        }

        println!();
        println!(
            "  {} built, {} failed in {}",
            summary.artifacts().count().to_string().bright_white().bold(),
            summary.failures().count().to_string().bright_white().bold(),
            format!("{:.0}ms", summary.build_time.as_secs_f64() * 1000.0)
                .bright_white()
                .bold()
        );
    }
}
