//! Markdown report.

use std::fmt::Write as _;

use crate::screen::ScreenReport;

/// Two decimals, or `N/A`.
fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- N/A\n".to_string();
    }
    items.iter().map(|x| format!("- {x}\n")).collect()
}

/// Table cells must not break the row.
fn cell(text: &str) -> String {
    text.replace('|', "/").replace('\n', " ")
}

/// Render the report as Markdown.
pub fn render_markdown(report: &ScreenReport) -> String {
    let mut md = String::with_capacity(4096);

    md.push_str("# Taiwan Sector Screen Report\n\n");
    let _ = writeln!(md, "- Theme: `{}`", report.theme);
    let _ = writeln!(md, "- As of: `{}`", report.as_of);
    if report.synthetic {
        md.push_str("- Data: **SYNTHETIC**\n");
    }
    md.push('\n');

    md.push_str("## Summary\n");
    md.push_str(&report.summary);
    md.push_str("\n\n");

    md.push_str("## Method\n");
    md.push_str(&bullet_list(&report.method_notes));
    md.push('\n');

    md.push_str("## Candidates\n");
    md.push_str("| Rank | Symbol | Name | Market | Score | Close | Reasons |\n");
    md.push_str("|---:|---|---|---|---:|---:|---|\n");
    if report.picks.is_empty() {
        md.push_str("| - | - | - | - | - | - | - |\n");
    }
    for pick in &report.picks {
        let reasons: Vec<&str> = pick.reasons.iter().map(|r| r.text()).collect();
        let reasons = if reasons.is_empty() {
            "-".to_string()
        } else {
            reasons.join(" / ")
        };
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {:.2} | {:.2} | {} |",
            pick.rank,
            pick.symbol,
            cell(&pick.name),
            pick.market,
            pick.total_score,
            pick.close,
            cell(&reasons),
        );
    }
    md.push('\n');

    md.push_str("## Position Sizing\n");
    if report.picks.is_empty() {
        md.push_str("- N/A\n");
    }
    for pick in &report.picks {
        let plan = &pick.plan;
        let _ = writeln!(
            md,
            "- `{}` {}: max {:.2}%, initial {:.2}%, adds {:.2}% + {:.2}%, risk per trade {:.2}%",
            pick.symbol,
            pick.name,
            plan.max_position_pct,
            plan.initial_position_pct,
            plan.add_position_pct_1,
            plan.add_position_pct_2,
            plan.risk_budget_pct,
        );
        if plan.stop_price.is_some() {
            let _ = writeln!(
                md,
                "  stop {} (distance {}%), {}",
                fmt_opt(plan.stop_price),
                fmt_opt(plan.stop_distance_pct),
                plan.share_formula,
            );
        }
        if let Some(shares) = pick.suggested_shares {
            let _ = writeln!(md, "  suggested size: {shares} shares");
        }
    }
    md.push('\n');

    md.push_str("## Risk Notes\n");
    md.push_str(&bullet_list(&report.risk_notes));
    md.push('\n');

    md.push_str("## Data Sources\n");
    md.push_str(&bullet_list(&report.sources));
    if !report.dataset_hash.is_empty() {
        let _ = writeln!(md, "\nDataset hash: `{}`", report.dataset_hash);
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_numbers() {
        assert_eq!(fmt_opt(None), "N/A");
        assert_eq!(fmt_opt(Some(112.0)), "112.00");
    }

    #[test]
    fn empty_lists_render_na() {
        assert_eq!(bullet_list(&[]), "- N/A\n");
        assert_eq!(bullet_list(&["a".into(), "b".into()]), "- a\n- b\n");
    }

    #[test]
    fn pipes_do_not_break_rows() {
        assert_eq!(cell("A|B\nC"), "A/B C");
    }
}
