use crate::aggregate::{group_by, status_counts, AggSpec, SummaryTable, Value};
use crate::dataset::FlightDataset;
use crate::error::AnalysisResult;
use crate::rules::seconds_to_duration;
use crate::types::{FlightRecord, FlightStatus, SummaryStats};
use crate::util::{average, round_to};
use std::collections::HashSet;

/// Rate columns computed by the reports: `(target, source)` over `voos`.
pub const STATUS_RATES: [(&str, &str); 3] = [
    ("tx_realizados", "realizados_s_atraso"),
    ("tx_atrasos", "realizados_c_atraso"),
    ("tx_cancelados", "cancelados"),
];

#[derive(Debug, Clone)]
pub struct OverviewQuery<'a> {
    pub only_vacation: bool,
    pub group_by: Vec<&'a str>,
    pub percentages: Vec<(&'a str, &'a str)>,
    pub precision: u32,
}

#[derive(Debug, Clone)]
pub struct RankingQuery<'a> {
    pub group_by: Vec<&'a str>,
    pub percentages: Vec<(&'a str, &'a str)>,
    pub precision: u32,
    pub ranking: usize,
    pub line: Option<&'a str>,
    pub period: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ReasonQuery<'a> {
    /// The first column is also the one counted.
    pub group_by: Vec<&'a str>,
    pub period: Option<&'a str>,
    pub line: Option<&'a str>,
    /// Render mean delays as `HH:MM:SS` instead of seconds.
    pub as_duration: bool,
}

fn matches_filters(r: &FlightRecord, line: Option<&str>, period: Option<&str>) -> bool {
    line.map_or(true, |l| r.codigo_tipo_linha == l)
        && period.map_or(true, |p| r.text("periodo_ferias") == Some(p))
}

/// Flight counts by status, over all flights or vacation flights only.
pub fn flights_overview(ds: &FlightDataset, q: &OverviewQuery) -> AnalysisResult<SummaryTable> {
    let records: Vec<&FlightRecord> = if q.only_vacation {
        ds.vacation_flights()?
    } else {
        ds.ensure_solid()?.iter().collect()
    };

    let mut specs = status_counts();
    specs.push(AggSpec::size("voos", "distancia_km"));

    let mut table = group_by(records, &q.group_by, &specs)?;
    if !q.percentages.is_empty() {
        table.add_percentages(&q.percentages, "voos", q.precision)?;
    }
    Ok(table)
}

/// Busiest groups (typically routes) for an optional line type and period.
pub fn route_ranking(ds: &FlightDataset, q: &RankingQuery) -> AnalysisResult<SummaryTable> {
    let records = ds
        .ensure_solid()?
        .iter()
        .filter(|r| matches_filters(r, q.line, q.period));

    let mut specs = status_counts();
    specs.push(AggSpec::mean("distancia_media_km", "distancia_km"));
    specs.push(AggSpec::size("voos", "distancia_km"));

    let mut table = group_by(records, &q.group_by, &specs)?;
    table.add_percentages(&q.percentages, "voos", q.precision)?;
    table.top_k("voos", q.ranking)
}

/// Delayed vacation flights grouped by reason, with mean delays.
pub fn delays_by_reason(ds: &FlightDataset, q: &ReasonQuery) -> AnalysisResult<SummaryTable> {
    let records = ds
        .vacation_flights()?
        .into_iter()
        .filter(|r| r.is_delayed())
        .filter(|r| matches_filters(r, q.line, q.period));

    let counted = q.group_by.first().copied().unwrap_or("situacao_voo");
    let specs = [
        AggSpec::size("total_atrasos", counted),
        AggSpec::mean("media_atrasos_partida", "tempo_atraso_partida"),
        AggSpec::mean("media_atrasos_chegada", "tempo_atraso_chegada"),
    ];

    let mut table = group_by(records, &q.group_by, &specs)?;
    if q.as_duration {
        for col in ["media_atrasos_partida", "media_atrasos_chegada"] {
            table.map_column(col, |v| {
                Value::Text(seconds_to_duration(v.as_f64().unwrap_or(f64::NAN)))
            })?;
        }
    }
    sort_by_period(&mut table, "total_atrasos")?;
    Ok(table)
}

/// Cancelled vacation flights grouped by reason.
pub fn cancellations_by_reason(
    ds: &FlightDataset,
    q: &ReasonQuery,
) -> AnalysisResult<SummaryTable> {
    let records = ds
        .vacation_flights()?
        .into_iter()
        .filter(|r| r.situacao_voo == FlightStatus::Cancelado)
        .filter(|r| matches_filters(r, q.line, q.period));

    let counted = q.group_by.first().copied().unwrap_or("situacao_voo");
    let specs = [AggSpec::size("total_cancelamentos", counted)];

    let mut table = group_by(records, &q.group_by, &specs)?;
    sort_by_period(&mut table, "total_cancelamentos")?;
    Ok(table)
}

/// Vacation flights by status with rate columns.
pub fn vacation_summary(
    ds: &FlightDataset,
    group_by_columns: &[&str],
    rates: &[(&str, &str)],
    precision: u32,
) -> AnalysisResult<SummaryTable> {
    let mut specs = vec![AggSpec::size("voos", "situacao_voo")];
    specs.extend(status_counts());

    let mut table = group_by(ds.vacation_flights()?, group_by_columns, &specs)?;
    table.add_percentages(rates, "voos", precision)?;
    Ok(table)
}

// Newest-looking period first, then by count; only when grouped by period.
fn sort_by_period(table: &mut SummaryTable, count_column: &str) -> AnalysisResult<()> {
    if table.key_columns.iter().any(|c| c == "periodo_ferias") {
        table.sort_desc(&["periodo_ferias", count_column])
    } else {
        table.sort_desc(&[count_column])
    }
}

/// Headline numbers for the JSON export.
pub fn dataset_summary(ds: &FlightDataset) -> AnalysisResult<SummaryStats> {
    let records = ds.ensure_solid()?;
    let total = records.len();

    let airlines: HashSet<&str> = records.iter().map(|r| r.companhia_aerea.as_str()).collect();
    let routes: HashSet<&str> = records.iter().map(|r| r.rota.as_str()).collect();
    let distances: Vec<f64> = records.iter().filter_map(|r| r.distancia_km).collect();
    let delayed = records
        .iter()
        .filter(|r| r.situacao_voo == FlightStatus::RealizadoComAtraso)
        .count();
    let cancelled = records
        .iter()
        .filter(|r| r.situacao_voo == FlightStatus::Cancelado)
        .count();
    let pct = |n: usize| {
        if total == 0 {
            0.0
        } else {
            round_to(n as f64 / total as f64 * 100.0, 2)
        }
    };

    Ok(SummaryStats {
        total_files: ds.report().total_files,
        total_records: total,
        vacation_records: records.iter().filter(|r| r.periodo_ferias.is_some()).count(),
        total_airlines: airlines.len(),
        total_routes: routes.len(),
        avg_distance_km: if distances.is_empty() {
            0.0
        } else {
            round_to(average(&distances), 2)
        },
        delayed_pct: pct(delayed),
        cancelled_pct: pct(cancelled),
    })
}
