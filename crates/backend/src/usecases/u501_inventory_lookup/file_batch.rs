//! Пакетный режим без HTTP: CSV со списком vendorItemId на входе,
//! CSV с остатками на выходе.

use anyhow::Context;
use std::path::Path;

use super::{csv_export::export_csv, executor::LookupExecutor, option_ids::parse_csv};
use crate::shared::marketplaces::coupang::Credentials;

/// Файл со списком vendorItemId по умолчанию
pub const DEFAULT_INPUT_FILE: &str = "option_id.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub async fn run_file_batch(
    executor: &LookupExecutor,
    credentials: &Credentials,
    input: &Path,
    output: &Path,
) -> anyhow::Result<BatchSummary> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Cannot read {}", input.display()))?;
    let option_ids = parse_csv(&bytes)?;
    if option_ids.is_empty() {
        anyhow::bail!("No option ids found in {}", input.display());
    }
    tracing::info!("Read {} option ids from {}", option_ids.len(), input.display());

    let records = executor.run_batch(credentials, &option_ids).await?;

    let body = export_csv(&records)?;
    tokio::fs::write(output, body)
        .await
        .with_context(|| format!("Cannot write {}", output.display()))?;
    tracing::info!("Inventory saved to {}", output.display());

    let failed = records.iter().filter(|r| r.is_error()).count();
    let summary = BatchSummary {
        total: records.len(),
        succeeded: records.len() - failed,
        failed,
    };
    tracing::info!(
        "Summary: total {}, succeeded {}, failed {}",
        summary.total,
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}
