//! Fechas CMEC: `"%b %d %Y %H:%M:%S UTC"`, siempre en UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::{DATE_FORMAT, DATE_SUFFIX};
use crate::errors::{BundleError, BundleResult};

/// Formatea un instante como fecha CMEC (ej. `"Jan 05 2024 13:02:11 UTC"`).
pub fn format_cmec_date(ts: &DateTime<Utc>) -> String {
    format!("{}{}", ts.format(DATE_FORMAT), DATE_SUFFIX)
}

/// Parsea una fecha CMEC. Exige el sufijo literal `" UTC"`.
pub fn parse_cmec_date(s: &str) -> BundleResult<DateTime<Utc>> {
    let body = s.strip_suffix(DATE_SUFFIX)
                .ok_or_else(|| BundleError::invalid(format!("date '{s}' lacks the '{DATE_SUFFIX}' suffix")))?;
    NaiveDateTime::parse_from_str(body, DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| BundleError::invalid(format!("date '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SubsecRound, TimeZone};

    #[test]
    fn formats_with_utc_suffix() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 13, 2, 11).unwrap();
        assert_eq!(format_cmec_date(&ts), "Jan 05 2024 13:02:11 UTC");
    }

    #[test]
    fn parses_back_to_same_instant() {
        let now = Utc::now().trunc_subsecs(0);
        let s = format_cmec_date(&now);
        assert!(s.ends_with(" UTC"));
        assert_eq!(parse_cmec_date(&s).unwrap(), now);
    }

    #[test]
    fn rejects_missing_suffix() {
        let err = parse_cmec_date("Jan 05 2024 13:02:11").unwrap_err();
        assert!(matches!(err, BundleError::InvalidInput(_)));
    }

    #[test]
    fn rejects_garbage_body() {
        assert!(parse_cmec_date("yesterday UTC").is_err());
    }
}
