use sieve_data::logs::SeverityNumber;

static SEVERITIES: &[(&str, &str, SeverityNumber)] = &[
    ("1", "TRACE", SeverityNumber::TRACE),
    ("2", "TRACE2", SeverityNumber::TRACE2),
    ("3", "TRACE3", SeverityNumber::TRACE3),
    ("4", "TRACE4", SeverityNumber::TRACE4),
    ("5", "DEBUG", SeverityNumber::DEBUG),
    ("6", "DEBUG2", SeverityNumber::DEBUG2),
    ("7", "DEBUG3", SeverityNumber::DEBUG3),
    ("8", "DEBUG4", SeverityNumber::DEBUG4),
    ("9", "INFO", SeverityNumber::INFO),
    ("10", "INFO2", SeverityNumber::INFO2),
    ("11", "INFO3", SeverityNumber::INFO3),
    ("12", "INFO4", SeverityNumber::INFO4),
    ("13", "WARN", SeverityNumber::WARN),
    ("14", "WARN2", SeverityNumber::WARN2),
    ("15", "WARN3", SeverityNumber::WARN3),
    ("16", "WARN4", SeverityNumber::WARN4),
    ("17", "ERROR", SeverityNumber::ERROR),
    ("18", "ERROR2", SeverityNumber::ERROR2),
    ("19", "ERROR3", SeverityNumber::ERROR3),
    ("20", "ERROR4", SeverityNumber::ERROR4),
    ("21", "FATAL", SeverityNumber::FATAL),
    ("22", "FATAL2", SeverityNumber::FATAL2),
    ("23", "FATAL3", SeverityNumber::FATAL3),
    ("24", "FATAL4", SeverityNumber::FATAL4),
];

/// Parses a severity given by name (`INFO`, `warn2`) or number (`9`).
///
/// Names are case-insensitive. An empty string is the unspecified severity.
pub fn parse_severity(severity: &str) -> Option<SeverityNumber> {
    if severity.is_empty() {
        return Some(SeverityNumber::UNSPECIFIED);
    }

    SEVERITIES
        .iter()
        .find(|(number, name, _)| *number == severity || name.eq_ignore_ascii_case(severity))
        .map(|(_, _, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_numbers() {
        assert_eq!(parse_severity("INFO"), Some(SeverityNumber::INFO));
        assert_eq!(parse_severity("warn2"), Some(SeverityNumber::WARN2));
        assert_eq!(parse_severity("Fatal4"), Some(SeverityNumber::FATAL4));
        assert_eq!(parse_severity("9"), Some(SeverityNumber::INFO));
        assert_eq!(parse_severity("24"), Some(SeverityNumber::FATAL4));
        assert_eq!(parse_severity(""), Some(SeverityNumber::UNSPECIFIED));
    }

    #[test]
    fn unknown() {
        assert_eq!(parse_severity("0"), None);
        assert_eq!(parse_severity("25"), None);
        assert_eq!(parse_severity("LOUD"), None);
        assert_eq!(parse_severity(" INFO"), None);
    }

    #[test]
    fn table_is_ordered() {
        for (i, (number, _, value)) in SEVERITIES.iter().enumerate() {
            assert_eq!(number.parse::<usize>().unwrap(), i + 1);
            assert_eq!(usize::from(value.value()), i + 1);
        }
    }
}
