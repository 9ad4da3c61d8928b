//! Roster import from CSV.
//!
//! A roster has a name column (`Full Name` or `Name`) and an admission
//! column (`Admission No` or `Admission Number`). Header matching is trimmed
//! and case-insensitive; other columns are ignored.

use std::io::Read;

use rsc_core::RosterEntry;

use crate::error::StoreError;
use crate::workbook::{COL_ADMISSION_NO, COL_FULL_NAME};

const NAME_HEADERS: &[&str] = &["full name", "name"];
const ADMISSION_HEADERS: &[&str] = &["admission no", "admission number"];

fn find_header(headers: &csv::StringRecord, accepted: &[&str]) -> Option<usize> {
    accepted.iter().find_map(|want| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(want))
    })
}

/// Parse roster entries, skipping rows where either field is blank.
///
/// # Errors
///
/// `MissingColumn` when a required header is absent, `Csv` for malformed input.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing = |column| StoreError::MissingColumn {
        sheet: "roster".into(),
        column,
    };
    let name_idx = find_header(&headers, NAME_HEADERS).ok_or_else(|| missing(COL_FULL_NAME))?;
    let adm_idx =
        find_header(&headers, ADMISSION_HEADERS).ok_or_else(|| missing(COL_ADMISSION_NO))?;

    let mut entries = Vec::new();
    for row in reader.records() {
        let row = row?;
        let full_name = row.get(name_idx).unwrap_or_default();
        let admission_no = row.get(adm_idx).unwrap_or_default();
        if full_name.is_empty() || admission_no.is_empty() {
            continue;
        }
        entries.push(RosterEntry {
            full_name: full_name.to_string(),
            admission_no: admission_no.to_string(),
        });
    }
    tracing::debug!(count = entries.len(), "roster parsed");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Full Name,Admission No\n")]
    #[case(" name , ADMISSION NUMBER \n")]
    #[case("Class,Name,Admission Number,Notes\n")]
    fn accepts_header_variants(#[case] header: &str) {
        let body = if header.starts_with("Class") {
            "JSS 1A,Ada Lovelace,1001,x\n"
        } else {
            "Ada Lovelace,1001\n"
        };
        let entries = parse_roster(format!("{header}{body}").as_bytes()).unwrap();
        assert_eq!(
            entries,
            vec![RosterEntry {
                full_name: "Ada Lovelace".into(),
                admission_no: "1001".into(),
            }]
        );
    }

    #[test]
    fn blank_rows_are_skipped() {
        let csv = "Full Name,Admission No\nAda,1\n,2\nGrace,\n  Alan , 3 \n";
        let entries = parse_roster(csv.as_bytes()).unwrap();
        let adms: Vec<_> = entries.iter().map(|e| e.admission_no.as_str()).collect();
        assert_eq!(adms, vec!["1", "3"]);
        assert_eq!(entries[1].full_name, "Alan");
    }

    #[test]
    fn missing_admission_column_is_reported() {
        let err = parse_roster("Full Name,Class\nAda,JSS 1A\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingColumn { column: COL_ADMISSION_NO, .. }
        ));
    }
}
