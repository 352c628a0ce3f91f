//! Cross-checks imported spreadsheet rows against stored appointments.
//!
//! Two matching policies exist on purpose. [`lenient_match`] backs the
//! receptionist self-check and compares only patient name and date.
//! [`strict_match`] backs the supervisor audit and additionally demands exact,
//! unnormalized equality of phone, doctor, time and booking user.
//!
//! Classification is recomputed from whatever snapshot of records is passed
//! in; nothing is cached between calls.

use serde::Serialize;

use crate::{models::appointments::Appointment, spreadsheet::ImportedRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    Lenient,
    Strict,
}

impl MatchPolicy {
    pub fn matches(self, row: &ImportedRow, records: &[Appointment]) -> bool {
        match self {
            MatchPolicy::Lenient => lenient_match(row, records),
            MatchPolicy::Strict => strict_match(row, records),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classified {
    pub row: ImportedRow,
    pub matched: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: Vec<ImportedRow>,
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First 10 characters, which strips a `T00:00:00` style suffix.
pub fn date_prefix(date: &str) -> &str {
    match date.char_indices().nth(10) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Name (trimmed, case-insensitive) and date-prefix equality with one record.
/// An empty name or date on either side never matches.
pub fn record_matches_lenient(row: &ImportedRow, record: &Appointment) -> bool {
    let name = normalize_name(field(&row.patient_name));
    let date = date_prefix(field(&row.appointment_date));
    if name.is_empty() || date.is_empty() {
        return false;
    }
    name == normalize_name(&record.patient_name) && date == record.date
}

/// The lenient check plus exact phone, doctor, time and booking user.
pub fn record_matches_strict(row: &ImportedRow, record: &Appointment) -> bool {
    record_matches_lenient(row, record)
        && field(&row.contact_number) == record.phone_number
        && field(&row.resource) == record.doctor
        && field(&row.start_time) == record.time
        && field(&row.booked_user) == record.booked_by
}

pub fn lenient_match(row: &ImportedRow, records: &[Appointment]) -> bool {
    records.iter().any(|r| record_matches_lenient(row, r))
}

pub fn strict_match(row: &ImportedRow, records: &[Appointment]) -> bool {
    records.iter().any(|r| record_matches_strict(row, r))
}

/// Classifies every row against the full record set. O(rows × records).
pub fn reconcile(
    rows: &[ImportedRow],
    records: &[Appointment],
    policy: MatchPolicy,
) -> Vec<Classified> {
    rows.iter()
        .map(|row| Classified {
            row: row.clone(),
            matched: policy.matches(row, records),
        })
        .collect()
}

pub fn summarize(classified: &[Classified]) -> Summary {
    let matched = classified.iter().filter(|c| c.matched).count();
    Summary {
        total: classified.len(),
        matched,
        mismatched: classified
            .iter()
            .filter(|c| !c.matched)
            .map(|c| c.row.clone())
            .collect(),
    }
}

/// Rows whose booking user is `display_name`, compared case-insensitively.
/// Without a display name every row is kept.
pub fn rows_booked_by(rows: Vec<ImportedRow>, display_name: Option<&str>) -> Vec<ImportedRow> {
    match display_name.filter(|n| !n.is_empty()) {
        Some(name) => {
            let name = name.to_lowercase();
            rows.into_iter()
                .filter(|row| field(&row.booked_user).to_lowercase() == name)
                .collect()
        }
        None => rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn row(name: &str, date: &str) -> ImportedRow {
        ImportedRow {
            patient_name: Some(name.to_string()),
            appointment_date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn record(name: &str, date: &str) -> Appointment {
        Appointment {
            id: "a1".to_string(),
            patient_name: name.to_string(),
            date: date.to_string(),
            ..Default::default()
        }
    }

    fn full_row() -> ImportedRow {
        ImportedRow {
            patient_name: Some(" John Smith ".to_string()),
            contact_number: Some("0770123".to_string()),
            resource: Some("Dr. Lee".to_string()),
            appointment_date: Some("2024-05-01T00:00:00".to_string()),
            start_time: Some("09:30".to_string()),
            booked_user: Some("Dana".to_string()),
            ..Default::default()
        }
    }

    fn full_record() -> Appointment {
        Appointment {
            id: "a1".to_string(),
            patient_name: "john smith".to_string(),
            phone_number: "0770123".to_string(),
            doctor: "Dr. Lee".to_string(),
            date: "2024-05-01".to_string(),
            time: "09:30".to_string(),
            booked_by: "Dana".to_string(),
        }
    }

    #[test]
    fn time_suffix_is_ignored() {
        let records = [record("john smith", "2024-05-01")];
        assert!(lenient_match(&row("John Smith", "2024-05-01T00:00:00"), &records));
    }

    #[test]
    fn different_date_does_not_match() {
        let records = [record("john smith", "2024-05-01")];
        assert!(!lenient_match(&row("John Smith", "2024-05-02"), &records));
    }

    #[test]
    fn empty_name_never_matches() {
        let records = [record("john smith", "2024-05-01"), record("", "2024-05-01")];
        assert!(!lenient_match(&row("", "2024-05-01"), &records));
        assert!(!lenient_match(&row("   ", "2024-05-01"), &records));
        assert!(!lenient_match(&ImportedRow::default(), &records));
    }

    #[test]
    fn empty_date_never_matches() {
        let records = [record("ann", "")];
        assert!(!lenient_match(&row("Ann", ""), &records));
    }

    #[test]
    fn no_records_means_no_match() {
        assert!(!lenient_match(&row("Ann", "2024-05-01"), &[]));
        assert!(!strict_match(&full_row(), &[]));
    }

    #[test]
    fn strict_requires_every_field() {
        let records = [full_record()];
        assert!(strict_match(&full_row(), &records));

        let mut other_phone = full_row();
        other_phone.contact_number = Some("0770999".to_string());
        assert!(!strict_match(&other_phone, &records));
        assert!(lenient_match(&other_phone, &records));

        let mut no_time = full_row();
        no_time.start_time = None;
        assert!(!strict_match(&no_time, &records));
    }

    #[test]
    fn strict_does_not_normalize_doctor_or_booked_by() {
        let records = [full_record()];

        let mut doctor_case = full_row();
        doctor_case.resource = Some("dr. lee".to_string());
        assert!(!strict_match(&doctor_case, &records));

        let mut user_case = full_row();
        user_case.booked_user = Some("dana".to_string());
        assert!(!strict_match(&user_case, &records));
    }

    #[test]
    fn reconcile_classifies_each_row() {
        let records = [record("john smith", "2024-05-01")];
        let rows = [
            row("John Smith", "2024-05-01T00:00:00"),
            row("Jane Doe", "2024-05-01"),
        ];
        let classified = reconcile(&rows, &records, MatchPolicy::Lenient);
        let flags: Vec<bool> = classified.iter().map(|c| c.matched).collect();
        assert_eq!(flags, vec![true, false]);

        let summary = summarize(&classified);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.mismatched, vec![rows[1].clone()]);
    }

    #[test]
    fn reconcile_follows_current_records() {
        let rows = [row("Ann", "2024-05-01")];
        let mut records = vec![record("ann", "2024-05-01")];
        assert!(reconcile(&rows, &records, MatchPolicy::Lenient)[0].matched);
        records.clear();
        assert!(!reconcile(&rows, &records, MatchPolicy::Lenient)[0].matched);
    }

    #[test]
    fn own_rows_filter_is_case_insensitive() {
        let mut mine = row("Ann", "2024-05-01");
        mine.booked_user = Some("DANA".to_string());
        let mut theirs = row("Bob", "2024-05-01");
        theirs.booked_user = Some("Sam".to_string());
        let unowned = row("Cy", "2024-05-01");

        let rows = vec![mine.clone(), theirs, unowned];
        assert_eq!(rows_booked_by(rows.clone(), Some("dana")), vec![mine]);
        assert_eq!(rows_booked_by(rows.clone(), None).len(), 3);
        assert_eq!(rows_booked_by(rows, Some("")).len(), 3);
    }

    #[test]
    fn date_prefix_counts_characters() {
        assert_eq!(date_prefix("2024-05-01T00:00:00"), "2024-05-01");
        assert_eq!(date_prefix("2024-05"), "2024-05");
        assert_eq!(date_prefix("٢٠٢٤-٠٥-٠١ extra"), "٢٠٢٤-٠٥-٠١");
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("john smith".to_string()),
            Just(" John Smith".to_string()),
            Just("JANE DOE ".to_string()),
            "[a-zA-Z ]{0,8}",
        ]
    }

    fn date_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("2024-05-01".to_string()),
            Just("2024-05-02".to_string()),
            Just("2024-05-01T00:00:00".to_string()),
        ]
    }

    fn small_strategy() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), Just("a".to_string()), Just("B".to_string())]
    }

    prop_compose! {
        fn arb_record()(
            name in name_strategy(),
            date in prop_oneof![Just(String::new()), Just("2024-05-01".to_string()), Just("2024-05-02".to_string())],
            phone in small_strategy(),
            doctor in small_strategy(),
            time in small_strategy(),
            booked_by in small_strategy(),
        ) -> Appointment {
            Appointment {
                id: "r".to_string(),
                patient_name: name,
                phone_number: phone,
                doctor,
                date,
                time,
                booked_by,
            }
        }
    }

    prop_compose! {
        fn arb_row()(
            name in proptest::option::of(name_strategy()),
            date in proptest::option::of(date_strategy()),
            phone in proptest::option::of(small_strategy()),
            resource in proptest::option::of(small_strategy()),
            start_time in proptest::option::of(small_strategy()),
            booked_user in proptest::option::of(small_strategy()),
        ) -> ImportedRow {
            ImportedRow {
                patient_name: name,
                contact_number: phone,
                resource,
                appointment_date: date,
                start_time,
                booked_user,
                ..Default::default()
            }
        }
    }

    proptest! {
        #[test]
        fn prop_lenient_is_name_and_date_equality(
            row in arb_row(),
            records in proptest::collection::vec(arb_record(), 0..6),
        ) {
            let name = row.patient_name.clone().unwrap_or_default().trim().to_lowercase();
            let date: String = row.appointment_date.clone().unwrap_or_default().chars().take(10).collect();
            let expected = !name.is_empty() && !date.is_empty() && records.iter().any(|r| {
                r.patient_name.trim().to_lowercase() == name && r.date == date
            });
            prop_assert_eq!(lenient_match(&row, &records), expected);
        }

        #[test]
        fn prop_strict_implies_lenient_per_record(
            row in arb_row(),
            record in arb_record(),
        ) {
            if record_matches_strict(&row, &record) {
                prop_assert!(record_matches_lenient(&row, &record));
            }
        }

        #[test]
        fn prop_reconcile_is_idempotent(
            rows in proptest::collection::vec(arb_row(), 0..6),
            records in proptest::collection::vec(arb_record(), 0..6),
        ) {
            for policy in [MatchPolicy::Lenient, MatchPolicy::Strict] {
                let first = reconcile(&rows, &records, policy);
                let second = reconcile(&rows, &records, policy);
                prop_assert_eq!(first, second);
            }
        }
    }
}
