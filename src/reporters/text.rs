//! Text (terminal) summary of a run

use crate::pipeline::RunResult;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render a short run summary for the terminal
pub fn render_summary(result: &RunResult, color: bool) -> String {
    let (bold, dim, reset) = if color {
        (BOLD, DIM, RESET)
    } else {
        ("", "", "")
    };
    let d = &result.detection;
    let mut out = String::new();

    out.push_str(&format!("\n{bold}Smell Analysis{reset}\n"));
    out.push_str(&format!("{dim}──────────────────────────────────────{reset}\n"));
    out.push_str(&format!(
        "Types: {}  Methods: {}  Smelly types: {}  Smelly methods: {}\n",
        d.types, d.methods, d.smelly_types, d.smelly_methods
    ));
    out.push_str(&format!("Smells: {bold}{}{reset}\n", d.total_smells));

    let mut by_count: Vec<_> = d.by_kind.iter().collect();
    by_count.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (kind, count) in by_count {
        out.push_str(&format!("  {:<28}{:>6}\n", kind.to_string(), count));
    }

    if let Some(report) = &result.agglomerations {
        out.push_str(&format!(
            "Agglomerations: {bold}{}{reset} (of {} components, min size {})\n",
            report.len(),
            report.coverage.total_components,
            report.min_size
        ));
        if let Some(share) = report.coverage.smelly_coverage {
            out.push_str(&format!(
                "{dim}{:.0}% of smelly entities sit in an agglomeration{reset}\n",
                share * 100.0
            ));
        }
    }

    let elapsed = result.finished_at - result.started_at;
    out.push_str(&format!(
        "{dim}Finished in {}ms{reset}\n",
        elapsed.num_milliseconds()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::reporters::tests::raw_types;

    #[test]
    fn test_summary_plain() {
        let result = Pipeline::new()
            .with_workers(1)
            .run(raw_types(), Vec::new())
            .expect("run");
        let text = render_summary(&result, false);

        assert!(text.contains("Types: 2"));
        assert!(text.contains("HighComplexity"));
        assert!(text.contains("Agglomerations: 1"));
        assert!(!text.contains('\x1b'));
    }
}
