//! Group-by aggregation over flight records.
//!
//! ```text
//! records ──group_by(keys, specs)──> SummaryTable ──add_percentages──> ...
//!                                                 └─top_k / sort_desc
//! ```
//!
//! Groups come out ordered by their key tuple. Every group has at least one
//! member, so percentage denominators are never zero in practice; if one is,
//! the result is NaN.

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{FlightRecord, NUMERIC_COLUMNS, TEXT_COLUMNS};
use crate::util::{average, round_to};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// One aggregated cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) if v.is_nan() => f.write_str("NaN"),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Rows in the group.
    Size,
    /// Rows whose source column equals the value.
    CountEq(String),
    /// Mean of the present numeric values.
    Mean,
}

/// Output column computed from a source column.
#[derive(Debug, Clone, PartialEq)]
pub struct AggSpec {
    pub output: String,
    pub source: String,
    pub func: Aggregation,
}

impl AggSpec {
    pub fn size(output: &str, source: &str) -> Self {
        Self {
            output: output.to_string(),
            source: source.to_string(),
            func: Aggregation::Size,
        }
    }

    pub fn count_eq(output: &str, source: &str, value: &str) -> Self {
        Self {
            output: output.to_string(),
            source: source.to_string(),
            func: Aggregation::CountEq(value.to_string()),
        }
    }

    pub fn mean(output: &str, source: &str) -> Self {
        Self {
            output: output.to_string(),
            source: source.to_string(),
            func: Aggregation::Mean,
        }
    }

    fn validate(&self) -> AnalysisResult<()> {
        let is_text = TEXT_COLUMNS.contains(&self.source.as_str());
        let is_numeric = NUMERIC_COLUMNS.contains(&self.source.as_str());
        let ok = match self.func {
            Aggregation::Size => is_text || is_numeric,
            Aggregation::CountEq(_) => is_text,
            Aggregation::Mean => is_numeric,
        };
        if ok {
            Ok(())
        } else {
            Err(AnalysisError::UnknownColumn(self.source.clone()))
        }
    }

    fn apply(&self, group: &[&FlightRecord]) -> Value {
        match &self.func {
            Aggregation::Size => Value::Int(group.len() as i64),
            Aggregation::CountEq(expected) => Value::Int(
                group
                    .iter()
                    .filter(|r| r.text(&self.source) == Some(expected.as_str()))
                    .count() as i64,
            ),
            Aggregation::Mean => {
                let values: Vec<f64> = group
                    .iter()
                    .filter_map(|r| r.number(&self.source).flatten())
                    .collect();
                Value::Float(average(&values))
            }
        }
    }
}

/// Counts of on-time, delayed and cancelled flights.
pub fn status_counts() -> Vec<AggSpec> {
    vec![
        AggSpec::count_eq("realizados_s_atraso", "situacao_voo", "Realizado Sem Atraso"),
        AggSpec::count_eq("realizados_c_atraso", "situacao_voo", "Realizado Com Atraso"),
        AggSpec::count_eq("cancelados", "situacao_voo", "Cancelado"),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub keys: Vec<String>,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub key_columns: Vec<String>,
    pub value_columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

/// Group `records` by the `keys` columns and compute one value per spec.
///
/// With no keys, all records form a single group (none at all when there
/// are no records).
pub fn group_by<'a, I>(
    records: I,
    keys: &[&str],
    specs: &[AggSpec],
) -> AnalysisResult<SummaryTable>
where
    I: IntoIterator<Item = &'a FlightRecord>,
{
    for key in keys {
        if !TEXT_COLUMNS.contains(key) {
            return Err(AnalysisError::UnknownColumn(key.to_string()));
        }
    }
    for spec in specs {
        spec.validate()?;
    }

    let mut groups: BTreeMap<Vec<String>, Vec<&FlightRecord>> = BTreeMap::new();
    for r in records {
        let key: Vec<String> = keys
            .iter()
            .map(|k| r.text(k).unwrap_or("").to_string())
            .collect();
        groups.entry(key).or_default().push(r);
    }

    let rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|(keys, members)| SummaryRow {
            keys,
            values: specs.iter().map(|s| s.apply(&members)).collect(),
        })
        .collect();
    debug!(keys = ?keys, groups = rows.len(), "grouped flights");

    Ok(SummaryTable {
        key_columns: keys.iter().map(|k| k.to_string()).collect(),
        value_columns: specs.iter().map(|s| s.output.clone()).collect(),
        rows,
    })
}

impl SummaryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key columns followed by value columns.
    pub fn columns(&self) -> Vec<&str> {
        self.key_columns
            .iter()
            .chain(self.value_columns.iter())
            .map(String::as_str)
            .collect()
    }

    fn value_index(&self, column: &str) -> AnalysisResult<usize> {
        self.value_columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| AnalysisError::UnknownColumn(column.to_string()))
    }

    fn key_index(&self, column: &str) -> Option<usize> {
        self.key_columns.iter().position(|c| c == column)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.value_index(column).ok()?;
        self.rows.get(row).map(|r| &r.values[idx])
    }

    pub fn key(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.key_index(column)?;
        self.rows.get(row).map(|r| r.keys[idx].as_str())
    }

    /// Cell of any column rendered as text.
    pub fn cell(&self, row: usize, column: &str) -> Option<String> {
        self.key(row, column)
            .map(str::to_string)
            .or_else(|| self.value(row, column).map(|v| v.to_string()))
    }

    /// For each `(target, source)` pair, `target = round(source / total, precision)`.
    /// An existing target column is overwritten.
    pub fn add_percentages(
        &mut self,
        pairs: &[(&str, &str)],
        total_column: &str,
        precision: u32,
    ) -> AnalysisResult<()> {
        let total_idx = self.value_index(total_column)?;
        for (target, source) in pairs {
            let source_idx = self.value_index(source)?;
            let target_idx = match self.value_index(target) {
                Ok(idx) => idx,
                Err(_) => {
                    self.value_columns.push(target.to_string());
                    for row in &mut self.rows {
                        row.values.push(Value::Float(f64::NAN));
                    }
                    self.value_columns.len() - 1
                }
            };
            for row in &mut self.rows {
                let num = row.values[source_idx].as_f64().unwrap_or(f64::NAN);
                let den = row.values[total_idx].as_f64().unwrap_or(f64::NAN);
                let ratio = if den == 0.0 { f64::NAN } else { num / den };
                row.values[target_idx] = Value::Float(round_to(ratio, precision));
            }
        }
        Ok(())
    }

    /// The `k` rows with the largest `column`, ties keeping group order.
    pub fn top_k(mut self, column: &str, k: usize) -> AnalysisResult<Self> {
        let idx = self.value_index(column)?;
        self.rows
            .sort_by(|a, b| cmp_values(&b.values[idx], &a.values[idx]));
        self.rows.truncate(k);
        Ok(self)
    }

    /// Stable descending sort on several key or value columns.
    pub fn sort_desc(&mut self, columns: &[&str]) -> AnalysisResult<()> {
        enum Col {
            Key(usize),
            Value(usize),
        }
        let cols: Vec<Col> = columns
            .iter()
            .map(|c| match self.key_index(c) {
                Some(i) => Ok(Col::Key(i)),
                None => self.value_index(c).map(Col::Value),
            })
            .collect::<AnalysisResult<_>>()?;

        self.rows.sort_by(|a, b| {
            cols.iter()
                .map(|c| match c {
                    Col::Key(i) => b.keys[*i].cmp(&a.keys[*i]),
                    Col::Value(i) => cmp_values(&b.values[*i], &a.values[*i]),
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(())
    }

    /// Replace every value of `column` with `f(value)`.
    pub fn map_column<F>(&mut self, column: &str, f: F) -> AnalysisResult<()>
    where
        F: Fn(&Value) -> Value,
    {
        let idx = self.value_index(column)?;
        for row in &mut self.rows {
            row.values[idx] = f(&row.values[idx]);
        }
        Ok(())
    }
}

// NaN and text sort below every number.
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64().filter(|v| !v.is_nan()), b.as_f64().filter(|v| !v.is_nan())) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => match (a, b) {
            (Value::Text(x), Value::Text(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    }
}
