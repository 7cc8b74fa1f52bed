//! Column catalog: semantic type and description of every raw and derived
//! column the analysis knows about.

use crate::types::ColumnDescriptionRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Boolean,
    DateTime,
    Integer,
    Float,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Text => "str",
            ColumnKind::Boolean => "bool",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Integer => "int",
            ColumnKind::Float => "float",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub description: &'static str,
}

const fn col(name: &'static str, kind: ColumnKind, description: &'static str) -> ColumnInfo {
    ColumnInfo {
        name,
        kind,
        description,
    }
}

use ColumnKind::*;

static COLUMNS: &[ColumnInfo] = &[
    col("voos", Text, "Número do voo"),
    col("companhia_aerea", Text, "Nome da companhia aérea"),
    col("codigo_tipo_linha", Text, "Código do tipo de linha (internacional)"),
    col("rota", Text, "Origem x Destino"),
    col(
        "periodo_ferias",
        Text,
        "Contém o mês condizente a um período de férias (Janeiro, Julho ou Dezembro)",
    ),
    col("dia_semana", Text, "Contém o dia da semana para data de partida"),
    col("aeroporto_origem", Text, "Código do aeroporto de origem"),
    col("cidade_origem", Text, "Cidade de origem"),
    col("estado_origem", Text, "Estado de origem"),
    col("pais_origem", Text, "País de origem"),
    col("lat_orig", Float, "Latitude do aeroporto de origem"),
    col("long_orig", Float, "Longitude do aeroporto de origem"),
    col("partida_prevista", DateTime, "Horário previsto de partida"),
    col("partida_real", DateTime, "Horário real de partida"),
    col("partida_atrasou", Boolean, "Houve atraso na partida do voo?"),
    col("tempo_atraso_partida", Text, "Tempo total do atraso da partida."),
    col("aeroporto_destino", Text, "Código do aeroporto de destino"),
    col("cidade_destino", Text, "Cidade de destino"),
    col("estado_destino", Text, "Estado de destino"),
    col("pais_destino", Text, "País de destino"),
    col("lat_dest", Float, "Latitude do aeroporto de destino"),
    col("long_dest", Float, "Longitude do aeroporto de destino"),
    col("chegada_prevista", DateTime, "Horário previsto de chegada"),
    col("chegada_real", DateTime, "Horário real de chegada"),
    col("chegada_atrasou", Boolean, "Houve atraso na chegada do voo?"),
    col("tempo_atraso_chegada", Text, "Tempo total do atraso da chegada."),
    col(
        "distancia_km",
        Float,
        "Total em quilômetros entre o local de origem e destino",
    ),
    col("situacao_voo", Text, "Situação do voo (realizado, cancelado, etc)"),
    col(
        "codigo_justificativa",
        Text,
        "Código de justificativa (caso o voo tenha sido cancelado)",
    ),
    col(
        "justificativa_atraso",
        Text,
        "Informação e correlata à justificativa no atraso do voo",
    ),
    col(
        "justificativa_cancelamento",
        Text,
        "Informação e correlata à justificativa do cancelamento do voo",
    ),
];

/// Catalog entry for `name`, or `None` when the column is unknown.
pub fn lookup(name: &str) -> Option<&'static ColumnInfo> {
    COLUMNS.iter().find(|c| c.name == name)
}

pub fn column_kind(name: &str) -> Option<ColumnKind> {
    lookup(name).map(|c| c.kind)
}

pub fn column_description(name: &str) -> Option<&'static str> {
    lookup(name).map(|c| c.description)
}

pub fn column_names() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.name).collect()
}

/// Description table for a set of loaded headers. Uncatalogued headers are
/// listed with `-` placeholders.
pub fn describe_columns<S: AsRef<str>>(headers: &[S]) -> Vec<ColumnDescriptionRow> {
    headers
        .iter()
        .map(|h| {
            let name = h.as_ref();
            let info = lookup(name);
            ColumnDescriptionRow {
                column: name.to_string(),
                kind: info.map(|c| c.kind.label()).unwrap_or("-").to_string(),
                description: info.map(|c| c.description).unwrap_or("-").to_string(),
            }
        })
        .collect()
}
