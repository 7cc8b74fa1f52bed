//! The loaded flight dataset and its "solid" state.
//!
//! A dataset becomes solid only once every row has been loaded and enriched
//! without error. Aggregations refuse to run on anything else.

use crate::error::{AnalysisError, AnalysisResult, LoadResult};
use crate::loader::{self, LoadReport};
use crate::types::{FlightRecord, RawRow};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct FlightDataset {
    records: Vec<FlightRecord>,
    solid: bool,
    report: LoadReport,
}

impl FlightDataset {
    /// Load and enrich every CSV file in `dir`.
    pub fn load(dir: &Path) -> LoadResult<Self> {
        let (records, report) = loader::load_and_clean(dir)?;
        Ok(Self {
            records,
            solid: true,
            report,
        })
    }

    /// Load and enrich a single CSV file, fixing up its suffix.
    pub fn load_file(path: &Path) -> LoadResult<Self> {
        let (records, report) = loader::load_file(path)?;
        Ok(Self {
            records,
            solid: true,
            report,
        })
    }

    /// Enrich rows that are already in memory.
    pub fn from_raw_rows(rows: Vec<RawRow>) -> LoadResult<Self> {
        let started = Instant::now();
        let total_rows = rows.len();
        let records = loader::enrich_all(rows)?;
        Ok(Self {
            records,
            solid: true,
            report: LoadReport {
                total_rows,
                elapsed: started.elapsed(),
                ..LoadReport::default()
            },
        })
    }

    pub fn is_solid(&self) -> bool {
        self.solid
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn headers(&self) -> &[String] {
        &self.report.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, or [`AnalysisError::NotSolid`].
    pub fn ensure_solid(&self) -> AnalysisResult<&[FlightRecord]> {
        if !self.solid {
            return Err(AnalysisError::NotSolid);
        }
        Ok(&self.records)
    }

    /// The first `n` records.
    pub fn head(&self, n: usize) -> AnalysisResult<&[FlightRecord]> {
        let records = self.ensure_solid()?;
        Ok(&records[..n.min(records.len())])
    }

    /// Records scheduled to depart in a vacation month.
    pub fn vacation_flights(&self) -> AnalysisResult<Vec<&FlightRecord>> {
        Ok(self
            .ensure_solid()?
            .iter()
            .filter(|r| r.periodo_ferias.is_some())
            .collect())
    }

    /// Distinct vacation periods in order of first appearance; empty when
    /// the dataset is not solid.
    pub fn vacation_periods(&self) -> Vec<String> {
        self.distinct_non_empty("periodo_ferias")
    }

    /// Distinct line types in order of first appearance; empty when the
    /// dataset is not solid.
    pub fn line_types(&self) -> Vec<String> {
        self.distinct_non_empty("codigo_tipo_linha")
    }

    fn distinct_non_empty(&self, column: &str) -> Vec<String> {
        let Ok(records) = self.ensure_solid() else {
            return Vec::new();
        };
        let mut seen: Vec<String> = Vec::new();
        for value in records.iter().filter_map(|r| r.text(column)) {
            if !value.is_empty() && !seen.iter().any(|s| s == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, scheduled: &str, line: &str) -> RawRow {
        RawRow {
            situacao_voo: Some(status.into()),
            codigo_tipo_linha: Some(line.into()),
            partida_prevista: Some(scheduled.into()),
            partida_real: Some(scheduled.into()),
            chegada_prevista: Some(scheduled.into()),
            chegada_real: Some(scheduled.into()),
            ..RawRow::default()
        }
    }

    #[test]
    fn test_default_dataset_is_not_solid() {
        let ds = FlightDataset::default();
        assert!(!ds.is_solid());
        assert!(matches!(ds.ensure_solid(), Err(AnalysisError::NotSolid)));
        assert!(matches!(ds.vacation_flights(), Err(AnalysisError::NotSolid)));
        assert!(matches!(ds.head(5), Err(AnalysisError::NotSolid)));
        assert!(ds.vacation_periods().is_empty());
        assert!(ds.line_types().is_empty());
    }

    #[test]
    fn test_from_raw_rows_marks_solid() {
        let ds = FlightDataset::from_raw_rows(vec![
            row("Realizado", "2015-07-01 10:00:00", "Nacional"),
            row("Realizado", "2015-03-01 10:00:00", "Internacional"),
            row("Cancelado", "2015-01-01 10:00:00", "Nacional"),
        ])
        .unwrap();

        assert!(ds.is_solid());
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.report().total_rows, 3);
        assert_eq!(ds.vacation_flights().unwrap().len(), 2);
        assert_eq!(ds.vacation_periods(), vec!["julho", "janeiro"]);
        assert_eq!(ds.line_types(), vec!["Nacional", "Internacional"]);

        assert_eq!(ds.head(2).unwrap().len(), 2);
        assert_eq!(ds.head(10).unwrap().len(), 3);
        assert_eq!(ds.head(1).unwrap()[0].codigo_tipo_linha, "Nacional");
    }

    #[test]
    fn test_failed_transformation_yields_no_dataset() {
        let mut bad = row("Realizado", "2015-07-01 10:00:00", "Nacional");
        bad.chegada_real = Some("??".into());
        assert!(FlightDataset::from_raw_rows(vec![bad]).is_err());
    }
}
