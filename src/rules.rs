//! Row-level derivation rules.
//!
//! Every rule is a pure function of its explicit inputs and is applied once
//! per record by the loader. Timestamps are text in `dd/mm/yyyy HH:MM:SS`.

use crate::error::{RuleError, RuleResult};
use crate::reference::{cancellation_reason, delay_reason, weekday_pt};
use crate::types::{DelayFlag, FlightStatus, VacationPeriod};
use crate::util::TIMESTAMP_FORMAT;
use chrono::{Datelike, NaiveDateTime};
use std::time::Duration;

const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn parse_timestamp(s: &str) -> RuleResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| RuleError::InvalidTimestamp { value: s.to_string() })
}

/// Great-circle distance in km between two points given in degrees
/// (haversine formula).
pub fn distance_km(lat_orig: f64, long_orig: f64, lat_dest: f64, long_dest: f64) -> f64 {
    let (lat_o, long_o) = (lat_orig.to_radians(), long_orig.to_radians());
    let (lat_d, long_d) = (lat_dest.to_radians(), long_dest.to_radians());

    let dlat = lat_d - lat_o;
    let dlong = long_d - long_o;

    let a = (dlat / 2.0).sin().powi(2)
        + lat_o.cos() * lat_d.cos() * (dlong / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Whether the actual time is strictly later than the scheduled one.
///
/// Cancelled flights (status compared case-insensitively) get
/// [`DelayFlag::NotApplicable`] without their timestamps being read.
pub fn delay_flag(status: &str, scheduled: &str, actual: &str) -> RuleResult<DelayFlag> {
    if status.to_lowercase() == "cancelado" {
        return Ok(DelayFlag::NotApplicable);
    }

    let scheduled = parse_timestamp(scheduled)?;
    let actual = parse_timestamp(actual)?;

    if scheduled >= actual {
        Ok(DelayFlag::OnTime)
    } else {
        Ok(DelayFlag::Delayed)
    }
}

/// Delay length as `HH:MM:SS` (hours not wrapped at 24), or empty when the
/// flag is not `S`.
pub fn delay_duration(flag: &str, scheduled: &str, actual: &str) -> RuleResult<String> {
    if !flag.eq_ignore_ascii_case("S") {
        return Ok(String::new());
    }

    let scheduled = parse_timestamp(scheduled)?;
    let actual = parse_timestamp(actual)?;
    let seconds = (actual - scheduled).num_seconds().abs();

    Ok(format_hms(seconds))
}

pub fn delay_duration_for(flag: DelayFlag, scheduled: &str, actual: &str) -> RuleResult<String> {
    delay_duration(flag.as_str(), scheduled, actual)
}

/// Refine `Realizado` into `Com`/`Sem Atraso`; every other status is kept.
pub fn update_status(
    status: &FlightStatus,
    departure: DelayFlag,
    arrival: DelayFlag,
) -> FlightStatus {
    match status {
        FlightStatus::Realizado if departure.is_delayed() || arrival.is_delayed() => {
            FlightStatus::RealizadoComAtraso
        }
        FlightStatus::Realizado
            if departure == DelayFlag::OnTime && arrival == DelayFlag::OnTime =>
        {
            FlightStatus::RealizadoSemAtraso
        }
        other => other.clone(),
    }
}

pub fn delay_justification(departure: DelayFlag, arrival: DelayFlag, code: &str) -> String {
    if departure.is_delayed() || arrival.is_delayed() {
        return delay_reason(code).to_string();
    }
    String::new()
}

pub fn cancellation_justification(status: &FlightStatus, code: &str) -> String {
    if *status == FlightStatus::Cancelado {
        return cancellation_reason(code).to_string();
    }
    String::new()
}

pub fn vacation_period(timestamp: &str) -> RuleResult<Option<VacationPeriod>> {
    let month = parse_timestamp(timestamp)?.month();
    Ok(VacationPeriod::from_month(month))
}

/// Portuguese weekday name of a timestamp.
pub fn weekday(timestamp: &str) -> RuleResult<String> {
    let english = parse_timestamp(timestamp)?.format("%A").to_string();
    weekday_pt(&english).map(str::to_string)
}

/// Route label whose granularity depends on the line type: countries for
/// `Internacional`, states for `Nacional`, cities otherwise.
pub fn route(
    line_type: &str,
    country_orig: &str,
    country_dest: &str,
    state_orig: &str,
    state_dest: &str,
    city_orig: &str,
    city_dest: &str,
) -> String {
    match line_type {
        "Internacional" => format!("{} - {}", country_orig, country_dest),
        "Nacional" => format!("{} - {}", state_orig, state_dest),
        _ => format!("{} - {}", city_orig, city_dest),
    }
}

/// `HH:MM:SS` to seconds. Anything that is not three integer fields, or
/// that overflows, counts as zero.
pub fn duration_to_seconds(duration: &str) -> i64 {
    let parts: Vec<&str> = duration.trim().split(':').collect();
    if parts.len() != 3 {
        return 0;
    }
    let mut fields = [0i64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        match part.parse::<i64>() {
            Ok(v) => *slot = v,
            Err(_) => return 0,
        }
    }
    fields[0]
        .checked_mul(3600)
        .and_then(|h| fields[1].checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(fields[2]))
        .unwrap_or(0)
}

/// Seconds to `HH:MM:SS`; fractions are truncated and non-finite or
/// negative input renders as `00:00:00`.
pub fn seconds_to_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00:00".to_string();
    }
    format_hms(seconds as i64)
}

/// Wall-clock time of a run as `HH:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format_hms(elapsed.as_secs() as i64)
}

fn format_hms(total: i64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_symmetric_and_zero() {
        let (gru_lat, gru_long) = (-23.4356, -46.4731);
        let (eze_lat, eze_long) = (-34.8222, -58.5358);

        let there = distance_km(gru_lat, gru_long, eze_lat, eze_long);
        let back = distance_km(eze_lat, eze_long, gru_lat, gru_long);
        assert!((there - back).abs() < 1e-9);
        assert!(there > 1600.0 && there < 1800.0);
        assert_eq!(distance_km(gru_lat, gru_long, gru_lat, gru_long), 0.0);
    }

    #[test]
    fn test_distance_quarter_meridian() {
        let d = distance_km(0.0, 0.0, 90.0, 0.0);
        let expected = std::f64::consts::PI / 2.0 * EARTH_RADIUS_KM;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_delay_flag() {
        assert_eq!(
            delay_flag("Realizado", "02/01/2015 06:30:00", "02/01/2015 06:35:15").unwrap(),
            DelayFlag::Delayed
        );
        assert_eq!(
            delay_flag("Realizado", "02/01/2015 06:30:00", "02/01/2015 06:30:00").unwrap(),
            DelayFlag::OnTime
        );
        assert_eq!(
            delay_flag("Realizado", "02/01/2015 06:30:00", "02/01/2015 06:10:00").unwrap(),
            DelayFlag::OnTime
        );
    }

    #[test]
    fn test_delay_flag_cancelled_skips_parsing() {
        assert_eq!(delay_flag("Cancelado", "", "").unwrap(), DelayFlag::NotApplicable);
        assert_eq!(delay_flag("CANCELADO", "x", "y").unwrap(), DelayFlag::NotApplicable);
    }

    #[test]
    fn test_delay_flag_rejects_bad_timestamp() {
        let err =
            delay_flag("Realizado", "2015-01-02 06:30:00", "02/01/2015 06:35:15").unwrap_err();
        assert!(matches!(
            err,
            RuleError::InvalidTimestamp { ref value } if value == "2015-01-02 06:30:00"
        ));
        assert!(delay_flag("Realizado", "02/01/2015 06:30:00", "").is_err());
    }

    #[test]
    fn test_delay_duration() {
        assert_eq!(
            delay_duration("S", "02/01/2015 06:30:00", "02/01/2015 06:35:15").unwrap(),
            "00:05:15"
        );
        assert_eq!(
            delay_duration("s", "02/01/2015 06:30:00", "03/01/2015 08:31:01").unwrap(),
            "26:01:01"
        );
        assert_eq!(delay_duration("N", "bad", "bad").unwrap(), "");
        assert_eq!(delay_duration("", "", "").unwrap(), "");
        assert!(delay_duration("S", "bad", "02/01/2015 06:35:15").is_err());
    }

    #[test]
    fn test_update_status() {
        use DelayFlag::*;
        let realizado = FlightStatus::Realizado;
        assert_eq!(update_status(&realizado, Delayed, OnTime), FlightStatus::RealizadoComAtraso);
        assert_eq!(update_status(&realizado, OnTime, Delayed), FlightStatus::RealizadoComAtraso);
        assert_eq!(update_status(&realizado, OnTime, OnTime), FlightStatus::RealizadoSemAtraso);
        assert_eq!(
            update_status(&FlightStatus::Cancelado, NotApplicable, NotApplicable),
            FlightStatus::Cancelado
        );

        let other = FlightStatus::Other("Não Informado".into());
        assert_eq!(update_status(&other, Delayed, Delayed), other);
    }

    #[test]
    fn test_justifications() {
        use DelayFlag::*;
        let code = "TROCA DE AERONAVE";
        assert_eq!(delay_justification(Delayed, OnTime, code), "Troca de aeronave");
        assert_eq!(delay_justification(OnTime, OnTime, code), "");
        assert_eq!(delay_justification(NotApplicable, NotApplicable, code), "");

        let cancel = "PROGRAMADO - FERIADO NACIONAL";
        assert_eq!(
            cancellation_justification(&FlightStatus::Cancelado, cancel),
            "Feriado nacional"
        );
        assert_eq!(cancellation_justification(&FlightStatus::Realizado, cancel), "");
    }

    #[test]
    fn test_vacation_period() {
        let janeiro = vacation_period("15/01/2023 10:30:00").unwrap();
        assert_eq!(janeiro, Some(VacationPeriod::Janeiro));
        let julho = vacation_period("01/07/2023 00:00:00").unwrap();
        assert_eq!(julho, Some(VacationPeriod::Julho));
        let dezembro = vacation_period("31/12/2023 23:59:59").unwrap();
        assert_eq!(dezembro, Some(VacationPeriod::Dezembro));
        for month in [2, 3, 4, 5, 6, 8, 9, 10, 11] {
            let ts = format!("10/{:02}/2023 15:45:00", month);
            assert_eq!(vacation_period(&ts).unwrap(), None);
        }
        assert!(vacation_period("2023-01-15").is_err());
    }

    #[test]
    fn test_weekday() {
        // 2015-01-05 was a Monday.
        assert_eq!(weekday("05/01/2015 10:00:00").unwrap(), "segunda-feira");
        assert_eq!(weekday("11/01/2015 10:00:00").unwrap(), "domingo");
    }

    #[test]
    fn test_route_by_line_type() {
        assert_eq!(
            route("Internacional", "Brasil", "Argentina", "SP", "-", "São Paulo", "Buenos Aires"),
            "Brasil - Argentina"
        );
        assert_eq!(
            route("Nacional", "Brasil", "Brasil", "SP", "RJ", "São Paulo", "Rio de Janeiro"),
            "SP - RJ"
        );
        assert_eq!(
            route("Regional", "Brasil", "Brasil", "SP", "SP", "Campinas", "Santos"),
            "Campinas - Santos"
        );
    }

    #[test]
    fn test_duration_conversions() {
        assert_eq!(duration_to_seconds("02:30:45"), 9045);
        assert_eq!(duration_to_seconds("00:45:15"), 2715);
        assert_eq!(duration_to_seconds(""), 0);
        assert_eq!(duration_to_seconds("1:2"), 0);
        assert_eq!(duration_to_seconds("aa:bb:cc"), 0);
        assert_eq!(duration_to_seconds("9999999999999999:00:00"), 0);
        assert_eq!(duration_to_seconds("00:00:9223372036854775807"), i64::MAX);
        assert_eq!(duration_to_seconds("00:01:9223372036854775807"), 0);

        assert_eq!(seconds_to_duration(9045.0), "02:30:45");
        assert_eq!(seconds_to_duration(2715.9), "00:45:15");
        assert_eq!(seconds_to_duration(f64::NAN), "00:00:00");

        assert_eq!(format_elapsed(Duration::from_secs(3610)), "01:00:10");
    }
}
