//! Static lookup tables for airline names, delay/cancellation reasons and
//! weekday names.
//!
//! Airline and reason lookups never fail: an unknown airline comes back
//! unchanged and an unknown reason code maps to a fixed "not specified"
//! label. Only the weekday translation reports a miss.

use crate::error::{RuleError, RuleResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const DELAY_NOT_SPECIFIED: &str = "Atraso não especificado";
pub const CANCELLATION_NOT_SPECIFIED: &str = "Cancelamento não especificado";

static AIRLINES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AEROLINEAS ARGENTINAS", "Aerolineas Argentinas"),
        ("AIR CANADA", "Air Canada"),
        ("AIR CHINA", "Air China"),
        ("AIR EUROPA S/A", "Air Europa"),
        ("AIR FRANCE", "Air France"),
        ("AIRES - LAN COLOMBIA", "Aires"),
        ("ALITALIA", "Alitalia"),
        ("AMERICAN AIRLINES INC", "American Airlines"),
        ("AUSTRAL LINEAS AÉREAS CIELOS DEL SUR S.A", "Austral Lineas Aereas"),
        ("AVIANCA", "Avianca"),
        ("AVIANCA BRASIL", "Avianca Brasil"),
        ("AZUL", "Azul"),
        ("BOLIVIANA DE AVIACION", "Boliviana de Aviacion"),
        ("BRITISH AIRWAYS PLC", "British Airways"),
        ("CONDOR FLUGDINST", "Condor Flugdinst"),
        ("COPA -COMPANIA PANAMENA DE AVIACION", "Copa"),
        ("DELTA AIRLINES", "Delta Airlines"),
        ("EDELWEISS", "Edelweiss"),
        ("EMIRATES", "Emirates"),
        (
            "EMPRESA DE TRANSPORTES AEREOS DE CABO VERDE S.A.",
            "Empresa de Transportes Aereos de Cabo Verde",
        ),
        ("ETHIOPIAN", "Ethiopian"),
        ("ETIHAD", "Etihad"),
        ("FLYWAYS", "Flyways"),
        ("GOL", "Gol"),
        ("IBERIA", "Iberia"),
        ("INSELAIR", "InselAir"),
        ("KLM ROYAL DUTCH AIRLINES", "KLM Royal Dutch Airlines"),
        ("KOREAN AIRLINES", "Korean Airlines"),
        ("LAN ARGENTINA S/A", "LAN Argentina"),
        ("LAN CHILE", "LAN Chile"),
        ("LAN PERU S/A", "LAN Peru"),
        ("LUFTHANSA", "Lufthansa"),
        ("MAP LINHAS AEREAS", "MAP Linhas Aereas"),
        ("MERIDIANA", "Meridiana"),
        ("NAO INFORMADO", "Nao Informado"),
        ("PASSAREDO", "Passaredo"),
        ("QATAR AIRWAYS", "Qatar Airways"),
        ("ROYAL AIR MAROC", "Royal Air Maroc"),
        ("SINGAPORE AIRLINES", "Singapore Airlines"),
        ("SOUTH AFRICAN AIRWAYS", "South African Airways"),
        ("SURINAM AIRWAYS", "Surinam Airways"),
        ("SWISSAIR", "Swissair"),
        ("TAAG LINHAS AEREAS DE ANGOLA", "TAAG Linhas Aereas de Angola"),
        ("TAM", "TAM"),
        ("TAM TRANSP. AR. DEL. MERCOS", "TAM Transp. Ar. Del. Mercos"),
        ("TAP AIR PORTUGAL", "TAP Air Portugal"),
        ("TOTAL", "Total"),
        ("TRASAMERICA  AIRLINES-TACAPERU", "Trasamerica Airlines-TACA Peru"),
        ("TURKISH AIRLINES INC.", "Turkish Airlines"),
        ("UNITED AIRLINES", "United Airlines"),
    ])
});

static DELAY_REASONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AEROPORTO COM RESTRICOES OPERACIONAIS", "Restrições operacionais no aeroporto"),
        ("ALTERNATIVA ABAIXO DOS LIMITES", "Alternativa abaixo dos limites"),
        (
            "ANTECIPACAO DE HORARIO AUTORIZADA - ESPECIFICO VOOS INTERNACIONAIS",
            "Antecipação de horário",
        ),
        (
            "ATRASO AEROPORTO DE ALTERNATIVA - CONDICOES METEOROLOGICAS",
            "Condições meteorológicas",
        ),
        ("ATRASO AEROPORTO DE ALTERNATIVA - ORDEM TECNICA", "Ordem técnica"),
        ("ATRASOS NAO ESPECIFICOS - OUTROS", DELAY_NOT_SPECIFIED),
        (
            "CONEXAO AERONAVE/VOLTA - VOO DE IDA NAO PENALIZADO AEROPORTO INTERDITADO",
            "Interdição do aeroporto",
        ),
        (
            "CONEXAO AERONAVE/VOLTA - VOO DE IDA NAO PENALIZADO CONDICOES METEOROLOGICAS",
            "Condições meteorológicas",
        ),
        ("CONEXAO DE AERONAVE", "Conexão de aeronave"),
        ("DEFEITOS DA AERONAVE", "Defeitos da aeronave"),
        ("DEGELO E REMOCAO DE NEVE E/OU LAMA EM AERONAVE", "Degelo/Limpeza"),
        (
            "INCLUSAO DE ETAPA (AEROPORTO DE ALTERNATIVA) DEVIDO A UM VOO ESPECIAL RETORNO",
            "Inclusão de etapa",
        ),
        (
            "OPERACAO DE VOO COM MAIS DE 04 HORAS DE ATRASO PANE AERONAVE",
            "Pane na aeronave",
        ),
        ("TROCA DE AERONAVE", "Troca de aeronave"),
    ])
});

static CANCELLATION_REASONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "CANCELAMENTO - CONEXAO AERONAVE/VOLTA - VOO DE IDA CANCELADO - AEROPORTO INTERDITADO",
            "Interdição do aeroporto",
        ),
        (
            "CANCELAMENTO - CONEXAO AERONAVE/VOLTA - VOO DE IDA CANCELADO - CONDICOES METEOROLOGICAS",
            "Condições meteorológicas",
        ),
        (
            "CANCELAMENTO POR MOTIVOS TECNICOS - OPERACIONAIS",
            "Motivos técnicos-operacionais",
        ),
        (
            "FALTA PAX COM PASSAGEM MARCADA - ( APENAS PARA AS LINHAS AEREAS DOMESTICAS REGIONAIS)",
            "Falta de passageiros com passagem marcada",
        ),
        ("PROGRAMADO - FERIADO NACIONAL", "Feriado nacional"),
    ])
});

static WEEKDAYS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Monday", "segunda-feira"),
        ("Tuesday", "terça-feira"),
        ("Wednesday", "quarta-feira"),
        ("Thursday", "quinta-feira"),
        ("Friday", "sexta-feira"),
        ("Saturday", "sábado"),
        ("Sunday", "domingo"),
    ])
});

/// Display name for a raw carrier name; unknown names pass through.
pub fn normalize_airline(raw: &str) -> String {
    AIRLINES
        .get(raw)
        .map(|s| s.to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn delay_reason(code: &str) -> &'static str {
    DELAY_REASONS.get(code).copied().unwrap_or(DELAY_NOT_SPECIFIED)
}

pub fn cancellation_reason(code: &str) -> &'static str {
    CANCELLATION_REASONS
        .get(code)
        .copied()
        .unwrap_or(CANCELLATION_NOT_SPECIFIED)
}

/// Portuguese name of an English weekday (`Monday` -> `segunda-feira`).
pub fn weekday_pt(english: &str) -> RuleResult<&'static str> {
    WEEKDAYS
        .get(english)
        .copied()
        .ok_or_else(|| RuleError::UnknownWeekday(english.to_string()))
}
