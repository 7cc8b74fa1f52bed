use crate::aggregate::{SummaryTable, Value};
use crate::util::{format_int, format_number};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn write_csv(path: &Path, table: &SummaryTable) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(table.columns())?;
    for row in &table.rows {
        let values = row.values.iter().map(|v| v.to_string());
        wtr.write_record(row.keys.iter().cloned().chain(values))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Table rows as JSON objects keyed by column name.
pub fn table_to_json(table: &SummaryTable) -> serde_json::Value {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for (col, key) in table.key_columns.iter().zip(&row.keys) {
                obj.insert(col.clone(), serde_json::Value::String(key.clone()));
            }
            for (col, value) in table.value_columns.iter().zip(&row.values) {
                let v = match value {
                    Value::Float(f) if !f.is_finite() => serde_json::Value::Null,
                    other => serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
                };
                obj.insert(col.clone(), v);
            }
            serde_json::Value::Object(obj)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn render(value: &Value) -> String {
    match value {
        Value::Int(v) => format_int(*v),
        Value::Float(v) => format_number(*v, 2),
        Value::Text(s) => s.clone(),
    }
}

pub fn preview_table<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn preview_summary(table: &SummaryTable, max_rows: usize) {
    if table.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(table.columns().into_iter().map(String::from));
    for row in table.rows.iter().take(max_rows) {
        builder.push_record(row.keys.iter().cloned().chain(row.values.iter().map(render)));
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
