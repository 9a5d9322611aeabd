use super::*;

// -- Page size --

#[test]
fn page_size_bounds() {
    assert_eq!(validate_page_size(1).unwrap(), 1);
    assert_eq!(validate_page_size(100).unwrap(), 100);
    assert!(validate_page_size(0).is_err());
    assert!(validate_page_size(101).is_err());
}

// -- Delay --

#[test]
fn delay_bounds() {
    assert_eq!(validate_delay_ms(0).unwrap(), 0);
    assert_eq!(validate_delay_ms(60_000).unwrap(), 60_000);
    assert!(validate_delay_ms(60_001).is_err());
}

// -- Dates --

#[test]
fn submitted_date_valid() {
    assert_eq!(
        validate_submitted_date(" 01/01/2012 ").unwrap(),
        NaiveDate::from_ymd_opt(2012, 1, 1).unwrap()
    );
}

#[test]
fn submitted_date_iso_is_rejected() {
    assert!(validate_submitted_date("2012-01-01").is_err());
}

#[test]
fn submitted_date_impossible_day() {
    assert!(validate_submitted_date("02/30/2020").is_err());
}

// -- Report and filer types --

#[test]
fn report_type_values() {
    assert_eq!(validate_report_type("PTR").unwrap(), ReportType::PeriodicTransaction);
    assert_eq!(validate_report_type("annual").unwrap(), ReportType::Annual);
    assert!(validate_report_type("blind-trust").is_err());
}

#[test]
fn filer_type_values() {
    assert_eq!(validate_filer_type("Senator").unwrap(), FilerType::Senator);
    assert_eq!(
        validate_filer_type("former-senator").unwrap(),
        FilerType::FormerSenator
    );
    assert!(validate_filer_type("judge").is_err());
}

// -- Credentials --

#[test]
fn credential_is_trimmed() {
    assert_eq!(validate_credential("CSRF_TOKEN", " abc\n").unwrap(), "abc");
}

#[test]
fn blank_credential_requires_authentication() {
    assert!(matches!(
        validate_credential("SESSION_ID", "   "),
        Err(DisclosureError::AuthenticationRequired)
    ));
}

#[test]
fn credential_with_separator_is_invalid() {
    assert!(matches!(
        validate_credential("SESSION_ID", "a; b=c"),
        Err(DisclosureError::InvalidInput(_))
    ));
}
