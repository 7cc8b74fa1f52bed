use crate::error::{LoadError, LoadResult, RuleResult};
use crate::reference::normalize_airline;
use crate::rules::{
    cancellation_justification, delay_duration_for, delay_flag, delay_justification, distance_km,
    route, update_status, vacation_period, weekday,
};
use crate::types::{FlightRecord, FlightStatus, RawRow};
use crate::util::{format_timestamp, normalize_column_name, parse_f64_safe, text_or_empty};
use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_files: usize,
    pub total_rows: usize,
    pub parse_errors: usize,
    /// Normalized headers in first-seen order across all files.
    pub headers: Vec<String>,
    pub elapsed: Duration,
}

/// Load every `.csv` file of `dir`, concatenate the rows and enrich them.
///
/// Rows that cannot be deserialized are counted and skipped; a derivation
/// rule failing on any kept row aborts the whole load.
pub fn load_and_clean(dir: &Path) -> LoadResult<(Vec<FlightRecord>, LoadReport)> {
    let files = csv_files(dir)?;
    if files.is_empty() {
        return Err(LoadError::NoCsvFiles(dir.to_path_buf()));
    }
    load_files(&files)
}

/// Load a single CSV file. A name without the `.csv` suffix gets it, any
/// other suffix is replaced (`voos.txt` -> `voos.csv`).
pub fn load_file(path: &Path) -> LoadResult<(Vec<FlightRecord>, LoadReport)> {
    load_files(&[with_csv_extension(path)])
}

pub fn with_csv_extension(path: &Path) -> PathBuf {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        return path.to_path_buf();
    }
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    path.with_file_name(format!("{}.csv", stem))
}

fn load_files(files: &[PathBuf]) -> LoadResult<(Vec<FlightRecord>, LoadReport)> {
    let started = Instant::now();
    let mut report = LoadReport {
        total_files: files.len(),
        ..LoadReport::default()
    };
    let mut raw_rows: Vec<RawRow> = Vec::new();

    for path in files {
        let file = fs::File::open(path)?;
        let (headers, rows, errors) = read_rows(file)?;
        info!(file = %path.display(), rows = rows.len(), errors, "loaded csv file");

        for h in headers {
            if !report.headers.contains(&h) {
                report.headers.push(h);
            }
        }
        report.total_rows += rows.len() + errors;
        report.parse_errors += errors;
        raw_rows.extend(rows);
    }

    let records = enrich_all(raw_rows)?;
    report.elapsed = started.elapsed();
    info!(
        files = report.total_files,
        records = records.len(),
        parse_errors = report.parse_errors,
        "dataset transformed"
    );
    Ok((records, report))
}

/// `.csv` files of a directory, sorted by name.
pub fn csv_files(dir: &Path) -> LoadResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Read one CSV source with normalized headers.
///
/// Returns the headers, the rows that deserialized, and the number of rows
/// that did not.
pub fn read_rows<R: io::Read>(reader: R) -> LoadResult<(Vec<String>, Vec<RawRow>, usize)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_column_name).collect();
    rdr.set_headers(headers.iter().collect::<StringRecord>());

    let mut rows = Vec::new();
    let mut errors = 0usize;
    for result in rdr.deserialize::<RawRow>() {
        match result {
            Ok(r) => rows.push(r),
            Err(e) => {
                warn!(error = %e, "skipping unreadable row");
                errors += 1;
            }
        }
    }
    Ok((headers, rows, errors))
}

/// Enrich raw rows in order; the error names the 1-based row that failed.
pub fn enrich_all(rows: Vec<RawRow>) -> LoadResult<Vec<FlightRecord>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            enrich(row).map_err(|source| LoadError::Rule {
                row: idx + 1,
                source,
            })
        })
        .collect()
}

/// Derive every analytical column of one row, in the fixed order
/// airline, route, vacation period, weekday, delay flags, delay durations,
/// status, justifications, distance.
pub fn enrich(row: RawRow) -> RuleResult<FlightRecord> {
    let companhia_aerea = normalize_airline(&text_or_empty(row.companhia_aerea));
    let codigo_tipo_linha = text_or_empty(row.codigo_tipo_linha);
    let pais_origem = text_or_empty(row.pais_origem);
    let pais_destino = text_or_empty(row.pais_destino);
    let estado_origem = text_or_empty(row.estado_origem);
    let estado_destino = text_or_empty(row.estado_destino);
    let cidade_origem = text_or_empty(row.cidade_origem);
    let cidade_destino = text_or_empty(row.cidade_destino);

    let partida_prevista = format_timestamp(row.partida_prevista.as_deref().unwrap_or(""));
    let partida_real = format_timestamp(row.partida_real.as_deref().unwrap_or(""));
    let chegada_prevista = format_timestamp(row.chegada_prevista.as_deref().unwrap_or(""));
    let chegada_real = format_timestamp(row.chegada_real.as_deref().unwrap_or(""));
    let situacao = text_or_empty(row.situacao_voo);
    let codigo_justificativa = text_or_empty(row.codigo_justificativa);

    let lat_orig = parse_f64_safe(row.lat_orig.as_deref());
    let long_orig = parse_f64_safe(row.long_orig.as_deref());
    let lat_dest = parse_f64_safe(row.lat_dest.as_deref());
    let long_dest = parse_f64_safe(row.long_dest.as_deref());

    let rota = route(
        &codigo_tipo_linha,
        &pais_origem,
        &pais_destino,
        &estado_origem,
        &estado_destino,
        &cidade_origem,
        &cidade_destino,
    );
    let periodo_ferias = vacation_period(&partida_prevista)?;
    let dia_semana = weekday(&partida_prevista)?;

    let partida_atrasou = delay_flag(&situacao, &partida_prevista, &partida_real)?;
    let chegada_atrasou = delay_flag(&situacao, &chegada_prevista, &chegada_real)?;
    let tempo_atraso_partida =
        delay_duration_for(partida_atrasou, &partida_prevista, &partida_real)?;
    let tempo_atraso_chegada =
        delay_duration_for(chegada_atrasou, &chegada_prevista, &chegada_real)?;

    let situacao_voo =
        update_status(&FlightStatus::from_raw(&situacao), partida_atrasou, chegada_atrasou);
    let justificativa_atraso =
        delay_justification(partida_atrasou, chegada_atrasou, &codigo_justificativa);
    let justificativa_cancelamento =
        cancellation_justification(&situacao_voo, &codigo_justificativa);

    let distancia_km = match (lat_orig, long_orig, lat_dest, long_dest) {
        (Some(lo), Some(go), Some(ld), Some(gd)) => Some(distance_km(lo, go, ld, gd)),
        _ => None,
    };

    debug!(voo = ?row.voos, rota = %rota, status = %situacao_voo, "row enriched");

    Ok(FlightRecord {
        voos: text_or_empty(row.voos),
        companhia_aerea,
        codigo_tipo_linha,
        partida_prevista,
        partida_real,
        chegada_prevista,
        chegada_real,
        situacao_voo,
        codigo_justificativa,
        aeroporto_origem: text_or_empty(row.aeroporto_origem),
        cidade_origem,
        estado_origem,
        pais_origem,
        lat_orig,
        long_orig,
        aeroporto_destino: text_or_empty(row.aeroporto_destino),
        cidade_destino,
        estado_destino,
        pais_destino,
        lat_dest,
        long_dest,
        rota,
        periodo_ferias,
        dia_semana,
        partida_atrasou,
        chegada_atrasou,
        tempo_atraso_partida,
        tempo_atraso_chegada,
        justificativa_atraso,
        justificativa_cancelamento,
        distancia_km,
    })
}
