//! JSON and CSV export.
//!
//! JSON carries `schema_version`; reports written by a newer version are
//! rejected on import. CSV has one row per pick.

use thiserror::Error;

use crate::screen::{ScreenReport, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output: {0}")]
    CsvFlush(String),

    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
}

pub fn export_json(report: &ScreenReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn import_json(json: &str) -> Result<ScreenReport, ExportError> {
    let report: ScreenReport = serde_json::from_str(json)?;
    if report.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: report.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(report)
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// One row per pick: identity, scores, plan.
pub fn export_csv(report: &ScreenReport) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "symbol",
        "name",
        "market",
        "close",
        "total_score",
        "trend",
        "momentum",
        "value",
        "fundamental",
        "risk_control",
        "max_position_pct",
        "initial_position_pct",
        "add_position_pct_1",
        "add_position_pct_2",
        "risk_budget_pct",
        "stop_price",
        "stop_distance_pct",
        "suggested_shares",
        "reasons",
    ])?;

    for p in &report.picks {
        let reasons: Vec<&str> = p.reasons.iter().map(|r| r.text()).collect();
        wtr.write_record([
            p.rank.to_string(),
            p.symbol.clone(),
            p.name.clone(),
            p.market.to_string(),
            format!("{:.2}", p.close),
            format!("{:.2}", p.total_score),
            format!("{:.2}", p.scores.trend),
            format!("{:.2}", p.scores.momentum),
            format!("{:.2}", p.scores.value),
            format!("{:.2}", p.scores.fundamental),
            format!("{:.2}", p.scores.risk_control),
            format!("{:.1}", p.plan.max_position_pct),
            format!("{:.1}", p.plan.initial_position_pct),
            format!("{:.1}", p.plan.add_position_pct_1),
            format!("{:.1}", p.plan.add_position_pct_2),
            format!("{:.1}", p.plan.risk_budget_pct),
            opt(p.plan.stop_price),
            opt(p.plan.stop_distance_pct),
            p.suggested_shares.map(|s| s.to_string()).unwrap_or_default(),
            reasons.join(" / "),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::CsvFlush(e.to_string()))?;
    String::from_utf8(data).map_err(|e| ExportError::CsvFlush(e.to_string()))
}
