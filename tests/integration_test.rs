//! Integration Tests for dbmlsheet
//!
//! End-to-end scenarios: a parsed schema object goes in, CSV files and an
//! Excel workbook come out. Workbook output is verified by re-opening the
//! produced bytes with calamine.

use std::io::Cursor;
use std::str::FromStr;

use calamine::{Data, Reader, Xlsx};
use serde_json::json;

use dbmlsheet::{
    convert_file, CsvExporter, Database, DbmlSheetError, ExcelExporter, Format,
    OVERVIEW_FILE_NAME, OVERVIEW_SHEET_NAME,
};

/// Two-table schema used by the end-to-end scenarios: `users` with 4 fields
/// and `products` with 1 field, both with Japanese notes.
fn two_table_schema() -> serde_json::Value {
    json!({
        "tables": [
            {
                "name": "users",
                "note": "ユーザー情報テーブル",
                "fields": [
                    { "name": "id", "type": "bigint", "pk": true, "increment": true },
                    { "name": "email", "type": { "type_name": "varchar", "args": [255] },
                      "not_null": true, "unique": true, "note": "メールアドレス" },
                    { "name": "age", "type": "int" },
                    { "name": "status", "type": "text", "default": "active" }
                ]
            },
            {
                "name": "products",
                "note": "商品情報テーブル",
                "fields": [
                    { "name": "id", "type": "bigint", "pk": true }
                ]
            }
        ]
    })
}

fn open_workbook(buffer: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
    Xlsx::new(Cursor::new(buffer)).expect("produced workbook should be readable")
}

fn cell_str(range: &calamine::Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// --- CSV end-to-end -------------------------------------------------------

#[test]
fn csv_export_produces_overview_and_per_table_files() {
    let db = Database::normalize(&two_table_schema());
    let export = CsvExporter::new().export(&db);

    assert_eq!(export.len(), 3);

    let overview = export.get(OVERVIEW_FILE_NAME).unwrap();
    let lines: Vec<&str> = overview.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "テーブル名,説明,フィールド数");
    assert_eq!(lines[1], "users,ユーザー情報テーブル,4");
    assert_eq!(lines[2], "products,商品情報テーブル,1");

    // users.csv: header + 4 data rows
    let users = export.get("users.csv").unwrap();
    assert_eq!(users.split('\n').count(), 5);

    // products.csv: header + 1 data row
    let products = export.get("products.csv").unwrap();
    assert_eq!(products.split('\n').count(), 2);
}

#[test]
fn csv_detail_rows_follow_marker_conventions() {
    let db = Database::normalize(&two_table_schema());
    let export = CsvExporter::new().export(&db);

    let users = export.get("users.csv").unwrap();
    let lines: Vec<&str> = users.split('\n').collect();

    assert_eq!(lines[1], "id,bigint,○,,○,,○,");
    assert_eq!(lines[2], "email,varchar(255),×,,,○,,メールアドレス");
    assert_eq!(lines[3], "age,int,○,,,,,");
    assert_eq!(lines[4], "status,text,○,active,,,,");
}

// --- Workbook end-to-end --------------------------------------------------

#[test]
fn workbook_export_produces_ordered_sheets() {
    let db = Database::normalize(&two_table_schema());
    let mut exporter = ExcelExporter::new();
    let summary = exporter.export(&db).unwrap();

    assert_eq!(summary.worksheets, vec![OVERVIEW_SHEET_NAME, "users", "products"]);

    let workbook = open_workbook(exporter.save_to_buffer().unwrap());
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec![
            OVERVIEW_SHEET_NAME.to_string(),
            "users".to_string(),
            "products".to_string()
        ]
    );
}

#[test]
fn workbook_overview_field_count_is_numeric() {
    let db = Database::normalize(&two_table_schema());
    let mut exporter = ExcelExporter::new();
    exporter.export(&db).unwrap();

    let mut workbook = open_workbook(exporter.save_to_buffer().unwrap());
    let range = workbook.worksheet_range(OVERVIEW_SHEET_NAME).unwrap();

    assert_eq!(cell_str(&range, 0, 0), "テーブル名");
    assert_eq!(cell_str(&range, 1, 0), "users");
    assert_eq!(cell_str(&range, 1, 1), "ユーザー情報テーブル");

    // フィールド数 cell must be a number, not a string
    match range.get_value((1, 2)) {
        Some(Data::Float(n)) => assert_eq!(*n, 4.0),
        Some(Data::Int(n)) => assert_eq!(*n, 4),
        other => panic!("Expected numeric field count, got {:?}", other),
    }
}

#[test]
fn workbook_detail_sheet_values_roundtrip() {
    let db = Database::normalize(&two_table_schema());
    let mut exporter = ExcelExporter::new();
    exporter.export(&db).unwrap();

    let mut workbook = open_workbook(exporter.save_to_buffer().unwrap());
    let range = workbook.worksheet_range("users").unwrap();

    assert_eq!(cell_str(&range, 0, 0), "フィールド名");
    assert_eq!(cell_str(&range, 0, 7), "説明");

    // id: pk + increment, NULL許可
    assert_eq!(cell_str(&range, 1, 0), "id");
    assert_eq!(cell_str(&range, 1, 1), "bigint");
    assert_eq!(cell_str(&range, 1, 2), "○");
    assert_eq!(cell_str(&range, 1, 4), "○");
    assert_eq!(cell_str(&range, 1, 6), "○");

    // email: not_null inverted to ×, parameterized type rendered
    assert_eq!(cell_str(&range, 2, 1), "varchar(255)");
    assert_eq!(cell_str(&range, 2, 2), "×");
    assert_eq!(cell_str(&range, 2, 5), "○");
    assert_eq!(cell_str(&range, 2, 7), "メールアドレス");

    // status: default value carried through
    assert_eq!(cell_str(&range, 4, 3), "active");
}

// --- Empty database -------------------------------------------------------

#[test]
fn empty_database_yields_header_only_outputs() {
    let raw = json!({ "tables": [] });

    let export = CsvExporter::new().export_value(&raw).unwrap();
    assert_eq!(export.len(), 1);
    assert_eq!(
        export.get(OVERVIEW_FILE_NAME).unwrap(),
        "テーブル名,説明,フィールド数"
    );

    let mut exporter = ExcelExporter::new();
    let summary = exporter.export_value(&raw).unwrap();
    assert_eq!(summary.worksheets, vec![OVERVIEW_SHEET_NAME]);

    let mut workbook = open_workbook(exporter.save_to_buffer().unwrap());
    let range = workbook.worksheet_range(OVERVIEW_SHEET_NAME).unwrap();
    assert_eq!(range.height(), 1);
}

// --- Structural errors ----------------------------------------------------

#[test]
fn both_encoders_reject_invalid_structure() {
    let invalid = [
        json!({}),
        json!({ "tables": null }),
        json!({ "tables": "not-an-array" }),
    ];

    for raw in &invalid {
        match CsvExporter::new().export_value(raw) {
            Err(DbmlSheetError::InvalidStructure(msg)) => {
                assert_eq!(msg, "tables array required");
            }
            other => panic!("CSV should reject {:?}, got {:?}", raw, other),
        }

        let mut exporter = ExcelExporter::new();
        match exporter.export_value(raw) {
            Err(DbmlSheetError::InvalidStructure(_)) => {}
            other => panic!("Excel should reject {:?}, got {:?}", raw, other.err()),
        }
    }
}

// --- File-to-file conversion ----------------------------------------------

#[test]
fn convert_file_writes_csv_directory_and_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("schema.json");
    std::fs::write(&input, serde_json::to_string(&two_table_schema()).unwrap()).unwrap();

    let csv_out = dir.path().join("csv_out");
    let report = convert_file(&input, Some(&csv_out), Format::Csv).unwrap();
    assert_eq!(report.tables_count, 2);
    assert_eq!(report.files.len(), 3);
    assert!(csv_out.join("tables_overview.csv").exists());
    assert!(csv_out.join("users.csv").exists());
    assert!(csv_out.join("products.csv").exists());

    let xlsx_out = dir.path().join("schema.xlsx");
    let report = convert_file(&input, Some(&xlsx_out), Format::Xlsx).unwrap();
    assert_eq!(report.worksheets.len(), 3);

    let buffer = std::fs::read(&xlsx_out).unwrap();
    let workbook = open_workbook(buffer);
    assert_eq!(workbook.sheet_names().len(), 3);
}

#[test]
fn convert_file_resolves_default_xlsx_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mydb.json");
    std::fs::write(&input, serde_json::to_string(&two_table_schema()).unwrap()).unwrap();

    let report = convert_file(&input, None, Format::Xlsx).unwrap();
    assert_eq!(report.output, dir.path().join("mydb.xlsx"));
    assert!(report.output.exists());
}

#[test]
fn format_parsing_matches_cli_contract() {
    assert_eq!(Format::from_str("csv").unwrap(), Format::Csv);
    assert_eq!(Format::from_str("Xlsx").unwrap(), Format::Xlsx);
    assert!(Format::from_str("md").is_err());
}
