use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// One CSV row after header normalization (`Companhia.Aerea` -> `companhia_aerea`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    pub voos: Option<String>,
    pub companhia_aerea: Option<String>,
    pub codigo_tipo_linha: Option<String>,
    pub partida_prevista: Option<String>,
    pub partida_real: Option<String>,
    pub chegada_prevista: Option<String>,
    pub chegada_real: Option<String>,
    pub situacao_voo: Option<String>,
    pub codigo_justificativa: Option<String>,
    pub aeroporto_origem: Option<String>,
    pub cidade_origem: Option<String>,
    pub estado_origem: Option<String>,
    pub pais_origem: Option<String>,
    pub aeroporto_destino: Option<String>,
    pub cidade_destino: Option<String>,
    pub estado_destino: Option<String>,
    pub pais_destino: Option<String>,
    pub long_dest: Option<String>,
    pub lat_dest: Option<String>,
    pub long_orig: Option<String>,
    pub lat_orig: Option<String>,
}

/// Flight status vocabulary. The `Com`/`Sem Atraso` refinements are only
/// ever produced from `Realizado`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlightStatus {
    Realizado,
    RealizadoComAtraso,
    RealizadoSemAtraso,
    Cancelado,
    Other(String),
}

impl FlightStatus {
    pub fn from_raw(s: &str) -> Self {
        match s.trim() {
            "Realizado" => FlightStatus::Realizado,
            "Realizado Com Atraso" => FlightStatus::RealizadoComAtraso,
            "Realizado Sem Atraso" => FlightStatus::RealizadoSemAtraso,
            "Cancelado" => FlightStatus::Cancelado,
            other => FlightStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FlightStatus::Realizado => "Realizado",
            FlightStatus::RealizadoComAtraso => "Realizado Com Atraso",
            FlightStatus::RealizadoSemAtraso => "Realizado Sem Atraso",
            FlightStatus::Cancelado => "Cancelado",
            FlightStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-valued delay marker, written as `S`/`N`/empty in the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayFlag {
    Delayed,
    OnTime,
    NotApplicable,
}

impl DelayFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            DelayFlag::Delayed => "S",
            DelayFlag::OnTime => "N",
            DelayFlag::NotApplicable => "",
        }
    }

    pub fn is_delayed(self) -> bool {
        self == DelayFlag::Delayed
    }
}

impl fmt::Display for DelayFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-demand months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VacationPeriod {
    Janeiro,
    Julho,
    Dezembro,
}

impl VacationPeriod {
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            1 => Some(VacationPeriod::Janeiro),
            7 => Some(VacationPeriod::Julho),
            12 => Some(VacationPeriod::Dezembro),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VacationPeriod::Janeiro => "janeiro",
            VacationPeriod::Julho => "julho",
            VacationPeriod::Dezembro => "dezembro",
        }
    }
}

/// Columns [`FlightRecord::text`] resolves.
pub const TEXT_COLUMNS: [&str; 26] = [
    "voos",
    "companhia_aerea",
    "codigo_tipo_linha",
    "partida_prevista",
    "partida_real",
    "chegada_prevista",
    "chegada_real",
    "situacao_voo",
    "codigo_justificativa",
    "aeroporto_origem",
    "cidade_origem",
    "estado_origem",
    "pais_origem",
    "aeroporto_destino",
    "cidade_destino",
    "estado_destino",
    "pais_destino",
    "rota",
    "periodo_ferias",
    "dia_semana",
    "partida_atrasou",
    "chegada_atrasou",
    "tempo_atraso_partida",
    "tempo_atraso_chegada",
    "justificativa_atraso",
    "justificativa_cancelamento",
];

/// Columns [`FlightRecord::number`] resolves.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "distancia_km",
    "lat_orig",
    "long_orig",
    "lat_dest",
    "long_dest",
    "tempo_atraso_partida",
    "tempo_atraso_chegada",
];

/// A fully enriched flight. Timestamps keep the `dd/mm/yyyy HH:MM:SS`
/// text form; empty means the source had no value.
#[derive(Debug, Clone)]
pub struct FlightRecord {
    pub voos: String,
    pub companhia_aerea: String,
    pub codigo_tipo_linha: String,
    pub partida_prevista: String,
    pub partida_real: String,
    pub chegada_prevista: String,
    pub chegada_real: String,
    pub situacao_voo: FlightStatus,
    pub codigo_justificativa: String,
    pub aeroporto_origem: String,
    pub cidade_origem: String,
    pub estado_origem: String,
    pub pais_origem: String,
    pub lat_orig: Option<f64>,
    pub long_orig: Option<f64>,
    pub aeroporto_destino: String,
    pub cidade_destino: String,
    pub estado_destino: String,
    pub pais_destino: String,
    pub lat_dest: Option<f64>,
    pub long_dest: Option<f64>,

    pub rota: String,
    pub periodo_ferias: Option<VacationPeriod>,
    pub dia_semana: String,
    pub partida_atrasou: DelayFlag,
    pub chegada_atrasou: DelayFlag,
    pub tempo_atraso_partida: String,
    pub tempo_atraso_chegada: String,
    pub justificativa_atraso: String,
    pub justificativa_cancelamento: String,
    pub distancia_km: Option<f64>,
}

impl FlightRecord {
    /// Text value of a column by its conventional name.
    pub fn text(&self, column: &str) -> Option<&str> {
        let v: &str = match column {
            "voos" => &self.voos,
            "companhia_aerea" => &self.companhia_aerea,
            "codigo_tipo_linha" => &self.codigo_tipo_linha,
            "partida_prevista" => &self.partida_prevista,
            "partida_real" => &self.partida_real,
            "chegada_prevista" => &self.chegada_prevista,
            "chegada_real" => &self.chegada_real,
            "situacao_voo" => self.situacao_voo.as_str(),
            "codigo_justificativa" => &self.codigo_justificativa,
            "aeroporto_origem" => &self.aeroporto_origem,
            "cidade_origem" => &self.cidade_origem,
            "estado_origem" => &self.estado_origem,
            "pais_origem" => &self.pais_origem,
            "aeroporto_destino" => &self.aeroporto_destino,
            "cidade_destino" => &self.cidade_destino,
            "estado_destino" => &self.estado_destino,
            "pais_destino" => &self.pais_destino,
            "rota" => &self.rota,
            "periodo_ferias" => self.periodo_ferias.map(VacationPeriod::as_str).unwrap_or(""),
            "dia_semana" => &self.dia_semana,
            "partida_atrasou" => self.partida_atrasou.as_str(),
            "chegada_atrasou" => self.chegada_atrasou.as_str(),
            "tempo_atraso_partida" => &self.tempo_atraso_partida,
            "tempo_atraso_chegada" => &self.tempo_atraso_chegada,
            "justificativa_atraso" => &self.justificativa_atraso,
            "justificativa_cancelamento" => &self.justificativa_cancelamento,
            _ => return None,
        };
        Some(v)
    }

    /// Numeric value of a column. The outer `None` means the column is not
    /// numeric; the inner one means the value is missing for this row.
    /// Delay durations are exposed in seconds, malformed text counting as 0.
    pub fn number(&self, column: &str) -> Option<Option<f64>> {
        let v = match column {
            "distancia_km" => self.distancia_km,
            "lat_orig" => self.lat_orig,
            "long_orig" => self.long_orig,
            "lat_dest" => self.lat_dest,
            "long_dest" => self.long_dest,
            "tempo_atraso_partida" => {
                Some(crate::rules::duration_to_seconds(&self.tempo_atraso_partida) as f64)
            }
            "tempo_atraso_chegada" => {
                Some(crate::rules::duration_to_seconds(&self.tempo_atraso_chegada) as f64)
            }
            _ => return None,
        };
        Some(v)
    }

    pub fn is_delayed(&self) -> bool {
        self.partida_atrasou.is_delayed()
            || self.chegada_atrasou.is_delayed()
            || self.situacao_voo == FlightStatus::RealizadoComAtraso
    }
}

/// Row of the column description table shown after loading.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ColumnDescriptionRow {
    #[serde(rename = "Coluna")]
    #[tabled(rename = "Coluna")]
    pub column: String,
    #[serde(rename = "Tipo")]
    #[tabled(rename = "Tipo")]
    pub kind: String,
    #[serde(rename = "Descrição")]
    #[tabled(rename = "Descrição")]
    pub description: String,
}

/// Condensed view of a record for the preview after loading.
#[derive(Debug, Tabled, Clone)]
pub struct FlightPreviewRow {
    #[tabled(rename = "Voo")]
    pub voo: String,
    #[tabled(rename = "Companhia")]
    pub companhia: String,
    #[tabled(rename = "Linha")]
    pub linha: String,
    #[tabled(rename = "Rota")]
    pub rota: String,
    #[tabled(rename = "Partida prevista")]
    pub partida_prevista: String,
    #[tabled(rename = "Situação")]
    pub situacao: String,
    #[tabled(rename = "Férias")]
    pub ferias: String,
}

impl From<&FlightRecord> for FlightPreviewRow {
    fn from(r: &FlightRecord) -> Self {
        FlightPreviewRow {
            voo: r.voos.clone(),
            companhia: r.companhia_aerea.clone(),
            linha: r.codigo_tipo_linha.clone(),
            rota: r.rota.clone(),
            partida_prevista: r.partida_prevista.clone(),
            situacao: r.situacao_voo.to_string(),
            ferias: r.periodo_ferias.map(VacationPeriod::as_str).unwrap_or("").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_files: usize,
    pub total_records: usize,
    pub vacation_records: usize,
    pub total_airlines: usize,
    pub total_routes: usize,
    pub avg_distance_km: f64,
    pub delayed_pct: f64,
    pub cancelled_pct: f64,
}

#[cfg(test)]
impl FlightRecord {
    /// Minimal record for aggregation tests; callers override what they need.
    pub(crate) fn sample(status: FlightStatus) -> Self {
        let cancelled = status == FlightStatus::Cancelado;
        let flag = if cancelled {
            DelayFlag::NotApplicable
        } else {
            DelayFlag::OnTime
        };
        FlightRecord {
            voos: "1000".into(),
            companhia_aerea: "Gol".into(),
            codigo_tipo_linha: "Nacional".into(),
            partida_prevista: "05/01/2015 10:00:00".into(),
            partida_real: if cancelled { String::new() } else { "05/01/2015 10:00:00".into() },
            chegada_prevista: "05/01/2015 11:00:00".into(),
            chegada_real: if cancelled { String::new() } else { "05/01/2015 11:00:00".into() },
            situacao_voo: status,
            codigo_justificativa: String::new(),
            aeroporto_origem: "SBSP".into(),
            cidade_origem: "Sao Paulo".into(),
            estado_origem: "SP".into(),
            pais_origem: "Brasil".into(),
            lat_orig: Some(-23.62),
            long_orig: Some(-46.65),
            aeroporto_destino: "SBRJ".into(),
            cidade_destino: "Rio De Janeiro".into(),
            estado_destino: "RJ".into(),
            pais_destino: "Brasil".into(),
            lat_dest: Some(-22.91),
            long_dest: Some(-43.16),
            rota: "SP - RJ".into(),
            periodo_ferias: Some(VacationPeriod::Janeiro),
            dia_semana: "segunda-feira".into(),
            partida_atrasou: flag,
            chegada_atrasou: flag,
            tempo_atraso_partida: String::new(),
            tempo_atraso_chegada: String::new(),
            justificativa_atraso: String::new(),
            justificativa_cancelamento: String::new(),
            distancia_km: Some(366.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_column_resolves() {
        let rec = FlightRecord::sample(FlightStatus::Realizado);
        for col in TEXT_COLUMNS {
            assert!(rec.text(col).is_some(), "{col}");
        }
        for col in NUMERIC_COLUMNS {
            assert!(rec.number(col).is_some(), "{col}");
        }
        assert!(rec.text("distancia_km").is_none());
        assert!(rec.number("rota").is_none());
    }

    #[test]
    fn test_status_round_trips_labels() {
        for label in ["Realizado", "Realizado Com Atraso", "Realizado Sem Atraso", "Cancelado"] {
            assert_eq!(FlightStatus::from_raw(label).as_str(), label);
        }
        assert_eq!(
            FlightStatus::from_raw("Não Informado"),
            FlightStatus::Other("Não Informado".into())
        );
    }

    #[test]
    fn test_delay_numbers_are_seconds() {
        let rec = FlightRecord {
            tempo_atraso_partida: "01:00:30".into(),
            ..FlightRecord::sample(FlightStatus::RealizadoComAtraso)
        };
        assert_eq!(rec.number("tempo_atraso_partida"), Some(Some(3630.0)));
        assert_eq!(rec.number("tempo_atraso_chegada"), Some(Some(0.0)));
    }
}
