#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;

use hr_import::import::import_from_path;
use hr_import::intake::excel::{read_excel_from_path, read_excel_workbook_from_path};
use hr_import::intake::{IntakeOptions, SheetSelection};
use hr_import::pipeline::ImportOptions;
use hr_import::records::Colaborator;
use hr_import::schema::{Catalogs, Schema};
use hr_import::store::InMemoryStore;
use hr_import::types::CellValue;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("hr-import-{name}-{nanos}.xlsx"))
}

const HEADERS: [&str; 17] = [
    "Document Type",
    "Document Number",
    "First Name",
    "Last Name",
    "Gender",
    "Birth Date",
    "Personal Email",
    "Corporate Email",
    "Mobile",
    "Phone",
    "Address",
    "Residential City",
    "Education Level",
    "Job Position",
    "Hire Date",
    "Status",
    "Notes",
];

fn write_colaborator_sheet(ws: &mut rust_xlsxwriter::Worksheet, document_number: f64, email: &str) {
    use rust_xlsxwriter::{ExcelDateTime, Format};

    for (col, h) in HEADERS.iter().enumerate() {
        ws.write_string(0, col as u16, *h).unwrap();
    }

    let date_fmt = Format::new().set_num_format("yyyy-mm-dd");
    let birth = ExcelDateTime::from_ymd(1990, 5, 14).unwrap();

    ws.write_string(1, 0, "cc").unwrap();
    ws.write_number(1, 1, document_number).unwrap();
    ws.write_string(1, 2, "ana").unwrap();
    ws.write_string(1, 3, "perez").unwrap();
    ws.write_string(1, 4, "F").unwrap();
    ws.write_datetime_with_format(1, 5, &birth, &date_fmt).unwrap();
    ws.write_string(1, 6, email).unwrap();
    ws.write_number(1, 8, 3001234567.0).unwrap();
    ws.write_string(1, 10, "calle 1").unwrap();
    ws.write_string(1, 11, "bogota").unwrap();
    ws.write_string(1, 12, "Profesional").unwrap();
    ws.write_string(1, 13, "Analista").unwrap();
    // Plain serial without a date format.
    ws.write_number(1, 14, 45292).unwrap();
    ws.write_number(1, 15, 1).unwrap();
}

fn write_colaborators_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();
    write_colaborator_sheet(ws, 1001234567.0, "ana@example.com");
    wb.save(path).unwrap();
}

fn write_two_sheet_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws1 = wb.add_worksheet();
    ws1.set_name("Bogota").unwrap();
    write_colaborator_sheet(ws1, 1001.0, "ana@example.com");

    let ws2 = wb.add_worksheet();
    ws2.set_name("Cali").unwrap();
    write_colaborator_sheet(ws2, 2002.0, "eva@example.com");

    wb.save(path).unwrap();
}

fn schema() -> Schema {
    Schema::colaborators(&Catalogs::default())
}

#[test]
fn excel_cells_keep_numbers_and_dates_numeric() {
    let path = tmp_file("cells");
    write_colaborators_xlsx(&path);

    let rows = read_excel_from_path(&path, None, &schema()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row, 2);
    assert_eq!(rows[0].get("document_number"), &CellValue::Number(1001234567.0));
    assert_eq!(rows[0].get("hire_date"), &CellValue::Number(45292.0));
    assert!(matches!(rows[0].get("birth_date"), CellValue::Number(_)));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn excel_import_converts_serial_dates() {
    let path = tmp_file("import");
    write_colaborators_xlsx(&path);

    let schema = schema();
    let mut store: InMemoryStore<Colaborator> = InMemoryStore::new(&schema.unique_keys);
    let summary = import_from_path(
        &path,
        &schema,
        &mut store,
        &IntakeOptions::default(),
        &ImportOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.to_string(), "1 row imported, 0 rows failed");
    let c = &store.records()[0];
    assert_eq!(c.document_type, "CC");
    assert_eq!(c.document_number, "1001234567");
    assert_eq!(c.birth_date, NaiveDate::from_ymd_opt(1990, 5, 14).unwrap());
    assert_eq!(c.hire_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(c.education_level, "PROFESIONAL");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn excel_sheet_selection() {
    let path = tmp_file("sheets");
    write_two_sheet_xlsx(&path);
    let schema = schema();

    let all = read_excel_workbook_from_path(&path, None, &schema).unwrap();
    assert_eq!(all.len(), 2);

    let cali = read_excel_from_path(&path, Some("Cali"), &schema).unwrap();
    assert_eq!(cali.len(), 1);
    assert_eq!(cali[0].get("personal_email"), &CellValue::Text("eva@example.com".to_string()));

    let mut store: InMemoryStore<Colaborator> = InMemoryStore::new(&schema.unique_keys);
    let intake = IntakeOptions {
        sheet_selection: SheetSelection::AllSheets,
        ..Default::default()
    };
    let summary = import_from_path(&path, &schema, &mut store, &intake, &ImportOptions::default()).unwrap();
    assert_eq!(summary.imported, 2);

    let _ = std::fs::remove_file(&path);
}
