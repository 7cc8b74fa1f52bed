use anac_flights::aggregate::{group_by, status_counts, AggSpec, Value};
use anac_flights::reports::{self, RankingQuery, ReasonQuery, STATUS_RATES};
use anac_flights::{FlightDataset, FlightStatus, LoadError};
use std::fs;
use std::path::Path;

const HEADER: &str = "Voos,Companhia.Aerea,Codigo.Tipo.Linha,Partida.Prevista,Partida.Real,Chegada.Prevista,Chegada.Real,Situacao.Voo,Codigo.Justificativa,Aeroporto.Origem,Cidade.Origem,Estado.Origem,Pais.Origem,Aeroporto.Destino,Cidade.Destino,Estado.Destino,Pais.Destino,LongDest,LatDest,LongOrig,LatOrig";

const JANUARY: &[&str] = &[
    "4010,GOL,Nacional,2015-01-05T10:00:00Z,2015-01-05T10:00:00Z,2015-01-05T11:00:00Z,2015-01-05T10:55:00Z,Realizado,,SBSP,Sao Paulo,SP,Brasil,SBRJ,Rio De Janeiro,RJ,Brasil,-43.16,-22.91,-46.65,-23.62",
    "4012,GOL,Nacional,2015-01-05T12:00:00Z,2015-01-05T12:45:00Z,2015-01-05T13:00:00Z,2015-01-05T13:40:00Z,Realizado,TROCA DE AERONAVE,SBSP,Sao Paulo,SP,Brasil,SBRJ,Rio De Janeiro,RJ,Brasil,-43.16,-22.91,-46.65,-23.62",
    "8040,AEROLINEAS ARGENTINAS,Internacional,2015-01-09T08:00:00Z,,2015-01-09T11:00:00Z,,Cancelado,PROGRAMADO - FERIADO NACIONAL,SBGR,Guarulhos,SP,Brasil,SAEZ,Buenos Aires,,Argentina,-58.54,-34.82,-46.47,-23.44",
];

const JULY: &[&str] = &[
    "2230,PASSAREDO,Regional,2015-07-03T07:00:00Z,2015-07-03T07:20:00Z,2015-07-03T08:00:00Z,2015-07-03T08:10:00Z,Realizado,DEFEITOS DA AERONAVE,SBKP,Campinas,SP,Brasil,SBST,Santos,SP,Brasil,-46.30,-23.93,-47.13,-23.00",
    "4014,GOL,Nacional,2015-07-04T12:00:00Z,2015-07-04T12:00:00Z,2015-07-04T13:00:00Z,2015-07-04T13:00:00Z,Realizado,,SBSP,Sao Paulo,SP,Brasil,SBRJ,Rio De Janeiro,RJ,Brasil,-43.16,-22.91,-46.65,-23.62",
    "4016,GOL,Nacional,2015-03-04T12:00:00Z,2015-03-04T12:00:00Z,2015-03-04T13:00:00Z,2015-03-04T13:00:00Z,Realizado,,SBSP,Sao Paulo,SP,Brasil,SBRJ,Rio De Janeiro,RJ,Brasil,-43.16,-22.91,-46.65,-23.62",
];

fn write_csv(dir: &Path, name: &str, rows: &[&str]) {
    let mut content = String::from(HEADER);
    for r in rows {
        content.push('\n');
        content.push_str(r);
    }
    content.push('\n');
    fs::write(dir.join(name), content).unwrap();
}

fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "voos_2015_01.csv", JANUARY);
    write_csv(dir.path(), "voos_2015_07.csv", JULY);
    fs::write(dir.path().join("LEIAME.txt"), "not a csv").unwrap();
    dir
}

#[test]
fn test_load_directory_and_enrich() {
    let dir = fixture_dir();
    let ds = FlightDataset::load(dir.path()).expect("dataset loads");

    assert!(ds.is_solid());
    assert_eq!(ds.report().total_files, 2);
    assert_eq!(ds.report().total_rows, 6);
    assert_eq!(ds.report().parse_errors, 0);
    assert_eq!(ds.len(), 6);
    assert!(ds.headers().iter().any(|h| h == "codigo_tipo_linha"));
    assert!(ds.headers().iter().any(|h| h == "long_dest"));

    let records = ds.ensure_solid().unwrap();
    let cancelled = &records[2];
    assert_eq!(cancelled.companhia_aerea, "Aerolineas Argentinas");
    assert_eq!(cancelled.rota, "Brasil - Argentina");
    assert_eq!(cancelled.partida_atrasou.as_str(), "");
    assert_eq!(cancelled.justificativa_cancelamento, "Feriado nacional");

    let delayed = &records[1];
    assert_eq!(delayed.situacao_voo, FlightStatus::RealizadoComAtraso);
    assert_eq!(delayed.tempo_atraso_partida, "00:45:00");
    assert_eq!(delayed.partida_prevista, "05/01/2015 12:00:00");

    assert_eq!(records[0].situacao_voo, FlightStatus::RealizadoSemAtraso);
    assert_eq!(records[3].rota, "Campinas - Santos");
    assert_eq!(ds.vacation_periods(), vec!["janeiro", "julho"]);
}

#[test]
fn test_status_invariants_hold_for_every_record() {
    let dir = fixture_dir();
    let ds = FlightDataset::load(dir.path()).unwrap();

    for r in ds.ensure_solid().unwrap() {
        let cancelled = r.situacao_voo == FlightStatus::Cancelado;
        assert_eq!(cancelled, r.partida_atrasou.as_str().is_empty());
        assert_eq!(cancelled, r.chegada_atrasou.as_str().is_empty());
        let any_delay = r.partida_atrasou.is_delayed() || r.chegada_atrasou.is_delayed();
        assert_eq!(r.situacao_voo == FlightStatus::RealizadoComAtraso, any_delay);
        assert_eq!(any_delay, !r.justificativa_atraso.is_empty());
        assert_eq!(cancelled, !r.justificativa_cancelamento.is_empty());
    }
}

#[test]
fn test_reports_over_loaded_directory() {
    let dir = fixture_dir();
    let ds = FlightDataset::load(dir.path()).unwrap();

    let ranking = reports::route_ranking(
        &ds,
        &RankingQuery {
            group_by: vec!["codigo_tipo_linha", "rota"],
            percentages: STATUS_RATES.to_vec(),
            precision: 2,
            ranking: 1,
            line: None,
            period: None,
        },
    )
    .unwrap();
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking.key(0, "rota"), Some("SP - RJ"));
    assert_eq!(ranking.value(0, "voos"), Some(&Value::Int(4)));
    assert_eq!(ranking.value(0, "tx_realizados"), Some(&Value::Float(0.75)));
    let mean = ranking.value(0, "distancia_media_km").unwrap().as_f64().unwrap();
    assert!(mean > 300.0 && mean < 400.0);

    let delays = reports::delays_by_reason(
        &ds,
        &ReasonQuery {
            group_by: vec!["justificativa_atraso", "periodo_ferias"],
            period: Some("janeiro"),
            line: Some("Nacional"),
            as_duration: true,
        },
    )
    .unwrap();
    assert_eq!(delays.len(), 1);
    assert_eq!(delays.cell(0, "media_atrasos_chegada").as_deref(), Some("00:40:00"));

    let mut specs = vec![AggSpec::size("voos", "situacao_voo")];
    specs.extend(status_counts());
    let by_weekday = group_by(ds.ensure_solid().unwrap(), &["dia_semana"], &specs).unwrap();
    let total: i64 = (0..by_weekday.len())
        .filter_map(|i| by_weekday.value(i, "voos").and_then(|v| v.as_f64()))
        .map(|v| v as i64)
        .sum();
    assert_eq!(total, 6);
}

#[test]
fn test_unreadable_rows_are_counted() {
    let dir = tempfile::tempdir().unwrap();
    let mut content = String::from(HEADER);
    content.push('\n');
    content.push_str(JULY[1]);
    // Invalid UTF-8 cannot become a `String` field.
    let mut bytes = content.into_bytes();
    bytes.extend_from_slice(b"\n4999,\xff\xfe,Nacional\n");
    fs::write(dir.path().join("voos.csv"), bytes).unwrap();

    let ds = FlightDataset::load(dir.path()).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.report().parse_errors, 1);
    assert_eq!(ds.report().total_rows, 2);
}

#[test]
fn test_empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FlightDataset::load(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::NoCsvFiles(_)));
}

#[test]
fn test_bad_timestamp_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let bad = JULY[1].replace(
        "2015-07-04T12:00:00Z,2015-07-04T12:00:00Z",
        "2015-07-04T12:00:00Z,ontem",
    );
    write_csv(dir.path(), "voos.csv", &[bad.as_str()]);

    let err = FlightDataset::load(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Rule { row: 1, .. }));
}

#[test]
fn test_load_single_file_by_name() {
    let dir = fixture_dir();
    let ds = FlightDataset::load_file(&dir.path().join("voos_2015_01")).unwrap();

    assert!(ds.is_solid());
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.report().total_files, 1);
    let head = ds.head(2).unwrap();
    assert_eq!(head.len(), 2);
    assert_eq!(head[0].voos, "4010");
}
