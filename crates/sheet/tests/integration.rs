//! End-to-end tests through the calamine backend: xlsx fixtures are written
//! with rust_xlsxwriter into a temp dir and read back through the library.

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xls2json_sheet::{extract_tables, CellValue, SheetError, Workbook};

fn sample_path(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sample.xlsx");
    write_sample(&path);
    path
}

/// One sheet with a label column and one value per type, mirroring the kind
/// of workbook this tool is pointed at.
fn write_sample(path: &Path) {
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").unwrap();

    sheet.write(0, 0, "empty").unwrap();
    sheet.write(1, 0, "String").unwrap();
    sheet.write(1, 1, "hello").unwrap();
    sheet.write(2, 0, "StringNumber").unwrap();
    sheet.write(2, 1, "14.8").unwrap();
    sheet.write(3, 0, "Int").unwrap();
    sheet.write(3, 1, 1234).unwrap();
    sheet.write(4, 0, "bool").unwrap();
    sheet.write(4, 1, true).unwrap();
    sheet.write(5, 0, "bool").unwrap();
    sheet.write(5, 1, false).unwrap();
    sheet.write(6, 0, "float").unwrap();
    sheet.write(6, 1, 23.12345).unwrap();

    // Date cells are written as raw serial numbers with a date number
    // format; that is what triggers calamine's date detection.
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    // 2021-05-18 21:19:53
    let datetime_serial = 44334.0 + 76793.0 / 86400.0;
    sheet.write(7, 0, "datetime").unwrap();
    sheet
        .write_number_with_format(7, 1, datetime_serial, &datetime_format)
        .unwrap();

    let time_format = Format::new().set_num_format("hh:mm");
    // 13:37:00, an intraday fraction
    let time_serial = 49020.0 / 86400.0;
    sheet.write(8, 0, "time").unwrap();
    sheet
        .write_number_with_format(8, 1, time_serial, &time_format)
        .unwrap();

    workbook.save(path).unwrap();
}

fn grid_of<'a>(
    tables: &'a xls2json_sheet::Tables,
    name: &str,
) -> &'a Vec<Vec<CellValue>> {
    tables
        .get(name)
        .and_then(|grid| grid.as_ref())
        .unwrap_or_else(|| panic!("no grid for {name}"))
}

#[test]
fn test_sheet_names_of_sample() {
    let dir = TempDir::new().unwrap();
    let workbook = Workbook::open(sample_path(&dir), None).unwrap();
    assert_eq!(workbook.sheet_names(), ["Sheet1".to_string()]);
}

#[test]
fn test_read_cells_of_sample() {
    let dir = TempDir::new().unwrap();
    let mut workbook = Workbook::open(sample_path(&dir), None).unwrap();
    let tables = extract_tables(&mut workbook, &[], false).unwrap();
    let grid = grid_of(&tables, "Sheet1");

    assert_eq!(grid[0], vec![CellValue::from("empty")]);
    assert_eq!(
        grid[1],
        vec![CellValue::from("String"), CellValue::from("hello")]
    );
    assert_eq!(
        grid[2],
        vec![CellValue::from("StringNumber"), CellValue::from("14.8")]
    );
    assert_eq!(grid[3], vec![CellValue::from("Int"), CellValue::Int(1234)]);
    assert_eq!(grid[4], vec![CellValue::from("bool"), CellValue::Bool(true)]);
    assert_eq!(
        grid[5],
        vec![CellValue::from("bool"), CellValue::Bool(false)]
    );
    assert_eq!(
        grid[6],
        vec![CellValue::from("float"), CellValue::Float(23.12345)]
    );

    match &grid[7][1] {
        CellValue::DateTime(dt) => {
            assert_eq!(dt.date(), chrono::NaiveDate::from_ymd_opt(2021, 5, 18).unwrap());
            assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(21, 19, 53).unwrap());
        }
        other => panic!("expected datetime, got {other:?}"),
    }
    match &grid[8][1] {
        CellValue::Time(t) => {
            assert_eq!(*t, chrono::NaiveTime::from_hms_opt(13, 37, 0).unwrap());
        }
        other => panic!("expected time, got {other:?}"),
    }
}

#[test]
fn test_mixed_valid_and_invalid_sheet_names() {
    let dir = TempDir::new().unwrap();
    let mut workbook = Workbook::open(sample_path(&dir), None).unwrap();
    let tables = extract_tables(
        &mut workbook,
        &["Sheet1".to_string(), "xxx".to_string()],
        false,
    )
    .unwrap();

    assert_eq!(
        tables.keys().collect::<Vec<_>>(),
        ["Sheet1", "xxx"]
    );
    assert!(tables["Sheet1"].is_some());
    assert!(!grid_of(&tables, "Sheet1").is_empty());
    assert!(tables["xxx"].is_none());
}

#[test]
fn test_empty_request_defaults_to_all_sheets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("two.xlsx");
    let mut workbook = XlsxWorkbook::new();
    workbook.add_worksheet().set_name("First").unwrap();
    let second = workbook.add_worksheet();
    second.set_name("Second").unwrap();
    second.write(0, 0, 1).unwrap();
    workbook.save(&path).unwrap();

    let mut workbook = Workbook::open(&path, None).unwrap();
    let tables = extract_tables(&mut workbook, &[], false).unwrap();
    assert_eq!(tables.keys().collect::<Vec<_>>(), ["First", "Second"]);
}

#[test]
fn test_entirely_empty_sheet_yields_empty_grid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.xlsx");
    let mut workbook = XlsxWorkbook::new();
    workbook.add_worksheet().set_name("Blank").unwrap();
    workbook.save(&path).unwrap();

    let mut workbook = Workbook::open(&path, None).unwrap();
    for strip in [false, true] {
        let tables = extract_tables(&mut workbook, &[], strip).unwrap();
        assert_eq!(grid_of(&tables, "Blank"), &Vec::<Vec<CellValue>>::new());
    }
}

#[test]
fn test_sparse_sheet_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sparse.xlsx");
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sparse").unwrap();
    sheet.write(0, 0, "a").unwrap();
    sheet.write(2, 1, "b").unwrap();
    workbook.save(&path).unwrap();

    let mut workbook = Workbook::open(&path, None).unwrap();
    let tables = extract_tables(&mut workbook, &[], false).unwrap();
    assert_eq!(
        grid_of(&tables, "Sparse"),
        &vec![
            vec![CellValue::from("a")],
            vec![],
            vec![CellValue::Null, CellValue::from("b")],
        ]
    );
}

#[test]
fn test_password_on_unencrypted_workbook_fails_to_decrypt() {
    let dir = TempDir::new().unwrap();
    let path = sample_path(&dir);
    // A plain xlsx is a zip, not an encrypted OOXML container, so decryption
    // must fail instead of silently ignoring the password.
    let err = Workbook::open(&path, Some("secret")).unwrap_err();
    assert!(matches!(err, SheetError::Decrypt { .. }));
}

#[test]
fn test_open_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = Workbook::open(dir.path().join("nope.xlsx"), None).unwrap_err();
    assert!(matches!(err, SheetError::Open { .. }));
}

#[test]
fn test_open_empty_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.xlsx");
    std::fs::write(&path, b"").unwrap();
    let err = Workbook::open(&path, None).unwrap_err();
    assert!(matches!(err, SheetError::Open { .. }));
}
