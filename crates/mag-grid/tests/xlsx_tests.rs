//! Workbook persistence tests

use mag_grid::{
    write_grid, CellRef, Document, GridAssembler, SessionStamp, SinkError, XlsxDocument,
    DEFAULT_SHEET,
};
use mag_protocol::{Cell, RowDecoder};

fn sample_grid() -> mag_grid::Grid {
    let decoder = RowDecoder::default();
    let rows = vec![decoder.decode_str("12,OK"), decoder.decode_str("13,1.5")];
    GridAssembler::default()
        .assemble(&rows, &SessionStamp::new("2026-10-19 @ 10:00:00"))
        .unwrap()
}

fn read_value(path: &std::path::Path, a1: &str) -> String {
    let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
    book.get_sheet_by_name(DEFAULT_SHEET).unwrap().get_value(a1)
}

#[test]
fn creates_new_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.xlsx");

    let mut doc = XlsxDocument::open_or_create(&path, DEFAULT_SHEET).unwrap();
    write_grid(&mut doc, &sample_grid()).unwrap();
    doc.save().unwrap();

    assert!(path.exists());
    assert_eq!(read_value(&path, "A1"), "12");
    assert_eq!(read_value(&path, "B1"), "OK");
    assert_eq!(read_value(&path, "B2"), "1.5");
    assert_eq!(read_value(&path, "G1"), "Last Run:");
    assert_eq!(read_value(&path, "H1"), "2026-10-19 @ 10:00:00");
}

#[test]
fn reopening_keeps_unrelated_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.xlsx");

    let mut doc = XlsxDocument::open_or_create(&path, DEFAULT_SHEET).unwrap();
    doc.set_cell(CellRef::new(20, 1), &Cell::Text("operator notes".into()))
        .unwrap();
    doc.save().unwrap();

    let mut doc = XlsxDocument::open_or_create(&path, DEFAULT_SHEET).unwrap();
    write_grid(&mut doc, &sample_grid()).unwrap();
    doc.save().unwrap();

    assert_eq!(read_value(&path, "A20"), "operator notes");
    assert_eq!(read_value(&path, "B1"), "OK");
}

#[test]
fn adds_missing_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.xlsx");

    let mut doc = XlsxDocument::open_or_create(&path, "Capture").unwrap();
    doc.set_cell(CellRef::new(1, 1), &Cell::Text("x".into())).unwrap();
    doc.save().unwrap();

    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    assert!(book.get_sheet_by_name("Capture").is_some());
}

#[test]
fn unreadable_file_is_not_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a workbook").unwrap();

    let result = XlsxDocument::open_or_create(&path, DEFAULT_SHEET);

    assert!(matches!(result, Err(SinkError::Open { .. })));
    assert_eq!(std::fs::read(&path).unwrap(), b"not a workbook");
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("run.xlsx");

    let mut doc = XlsxDocument::open_or_create(&path, DEFAULT_SHEET).unwrap();
    let err = doc.save().unwrap_err();

    assert!(matches!(err, SinkError::Save { .. }));
}
