//! Record table behavior against workbooks written by other tools.
//!
//! Fixtures are real `.xlsx` files built through `Workbook::save`.

use pretty_assertions::assert_eq;
use rsc_core::{ClassId, GuardPolicy, SubmissionRecord};
use rsc_store::{Cell, GuardVerdict, RecordTable, Sheet, SubmissionGuard, Workbook};

fn record(name: &str, adm: &str, score: f64) -> SubmissionRecord {
    SubmissionRecord {
        timestamp: "2026-03-01 10:00:00".into(),
        full_name: name.into(),
        admission_no: adm.into(),
        score: Some(score),
    }
}

#[test]
fn sibling_sheets_survive_appends_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Project_Results.xlsx");

    let sibling = Sheet {
        name: "Staff Notes".into(),
        columns: vec!["Note".into(), "Weight".into()],
        rows: vec![
            vec![Cell::text("keep me"), Cell::Number(2.5)],
            vec![Cell::Empty, Cell::Bool(true)],
        ],
    };
    Workbook {
        sheets: vec![sibling.clone()],
    }
    .save(&path)
    .unwrap();

    let table = RecordTable::new(path.clone());
    let class = ClassId::parse("JSS 2C").unwrap();
    table.append(&class, &record("Ada", "1", 8.0)).unwrap();
    table.append(&class, &record("Grace", "2", 9.0)).unwrap();

    let book = Workbook::load(&path).unwrap().unwrap();
    assert_eq!(book.sheet("Staff Notes"), Some(&sibling));
    assert_eq!(book.sheet_names(), vec!["Staff Notes", "JSS 2C"]);

    let names: Vec<_> = table
        .read(&class)
        .unwrap()
        .into_iter()
        .map(|r| r.full_name)
        .collect();
    assert_eq!(names, vec!["Ada", "Grace"]);
}

#[test]
fn padded_headers_and_numeric_ids_are_recognized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Project_Results.xlsx");
    Workbook {
        sheets: vec![Sheet {
            name: "SS 1A".into(),
            columns: vec![
                " Timestamp".into(),
                "Full Name ".into(),
                " admission no ".into(),
                "AI Score".into(),
            ],
            rows: vec![vec![
                Cell::text("2026-01-01 08:00:00"),
                Cell::text("Alan Turing"),
                Cell::Number(1001.0),
                Cell::Number(9.0),
            ]],
        }],
    }
    .save(&path)
    .unwrap();

    let table = RecordTable::new(path);
    let class = ClassId::parse("SS 1A").unwrap();
    let guard = SubmissionGuard::new(&table, GuardPolicy::FailOpen);
    assert_eq!(
        guard.check(&class, "1001").unwrap(),
        GuardVerdict::AlreadySubmitted
    );
    assert_eq!(guard.check(&class, "1002").unwrap(), GuardVerdict::Clear);

    let rows = table.read(&class).unwrap();
    assert_eq!(rows[0].admission_no, "1001");
    assert_eq!(rows[0].score, Some(9.0));

    // New rows land under the existing padded columns, not new ones.
    table.append(&class, &record("Ada", "1002", 7.0)).unwrap();
    let book = Workbook::load(table.path()).unwrap().unwrap();
    let sheet = book.sheet("SS 1A").unwrap();
    assert_eq!(sheet.columns.len(), 4);
    assert_eq!(sheet.rows.len(), 2);
}
