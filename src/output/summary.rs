//! Plain-text summary tables for the terminal.

use crate::aggregator::Analysis;

const NAME_WIDTH: usize = 40;

/// Render the hottest functions and edges as fixed-width tables
///
/// **Public** - printed by `analyze --summary`
pub fn generate_text_summary(analysis: &Analysis, max_lines: usize) -> String {
    let mut lines = Vec::new();
    let rule = "━".repeat(NAME_WIDTH + 58);

    let functions = analysis.aggregator.snapshot_functions();
    lines.push("  HOTTEST FUNCTIONS (by total time)".to_string());
    lines.push(format!("  {}", rule));
    lines.push(format!(
        "  {:<w$} {:>8} {:>14} {:>10} {:>10} {:>10}",
        "Function",
        "Calls",
        "Total (us)",
        "Avg",
        "Min",
        "Max",
        w = NAME_WIDTH
    ));
    lines.push(format!("  {}", rule));
    for (name, stats) in functions.iter().take(max_lines) {
        lines.push(format!(
            "  {:<w$} {:>8} {:>14.3} {:>10.3} {:>10.3} {:>10.3}",
            truncate(name),
            stats.count,
            stats.total_micros,
            stats.average_micros(),
            stats.min_micros,
            stats.max_micros,
            w = NAME_WIDTH
        ));
    }
    if functions.len() > max_lines {
        lines.push(format!(
            "   (Showing top {} of {} functions)",
            max_lines,
            functions.len()
        ));
    }

    let edges = analysis.aggregator.snapshot_edges();
    lines.push(String::new());
    lines.push("  HOTTEST CALL EDGES".to_string());
    lines.push(format!("  {}", rule));
    for (edge, stats) in edges.iter().take(max_lines) {
        let label = format!("{} -> {}", edge.caller, edge.callee);
        lines.push(format!(
            "  {:<w$} {:>8} {:>14.3} {:>10.3}",
            truncate(&label),
            stats.count,
            stats.total_micros,
            stats.average_micros(),
            w = NAME_WIDTH
        ));
    }
    if edges.len() > max_lines {
        lines.push(format!(
            "   (Showing top {} of {} edges)",
            max_lines,
            edges.len()
        ));
    }

    if analysis.unclosed_frames > 0 {
        lines.push(String::new());
        lines.push(format!(
            "  ⚠ {} unclosed call frame(s) at end of log",
            analysis.unclosed_frames
        ));
    }

    lines.join("\n")
}

/// Keep the tail of long names; it is the most specific part
fn truncate(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() > NAME_WIDTH {
        let tail: String = chars[chars.len() - (NAME_WIDTH - 3)..].iter().collect();
        format!("...{}", tail)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::record::TraceRecord;
    use crate::utils::config::TraceConfig;

    #[test]
    fn test_summary_lists_functions_and_edges() {
        let records = vec![
            TraceRecord::call(1, 0, 1.0, "main", "work"),
            TraceRecord::ret(1, 0, 1.5, "work", "main"),
            TraceRecord::call(1, 0, 2.0, "main", "idle"),
        ];
        let analysis = Analysis::run(&records, TraceConfig::default());

        let text = generate_text_summary(&analysis, 10);

        assert!(text.contains("work"));
        assert!(text.contains("main -> work"));
        assert!(text.contains("500000.000"));
        assert!(text.contains("1 unclosed call frame(s)"));
    }

    #[test]
    fn test_truncate_keeps_tail() {
        let long = "x".repeat(60) + "_tail";
        let shown = truncate(&long);

        assert_eq!(shown.chars().count(), NAME_WIDTH);
        assert!(shown.starts_with("..."));
        assert!(shown.ends_with("_tail"));
    }
}
