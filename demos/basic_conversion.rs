//! Basic Conversion Example
//!
//! This example demonstrates the minimal flow: normalize a parsed schema
//! object, export it as CSV text, and write an Excel workbook.
//!
//! Run with: cargo run --example basic_conversion

use dbmlsheet::{CsvExporter, Database, ExcelExporter};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Schema object as produced by an external DBML parser
    let raw = json!({
        "tables": [
            {
                "name": "users",
                "note": "ユーザー情報テーブル",
                "fields": [
                    { "name": "id", "type": "bigint", "pk": true, "increment": true },
                    { "name": "email", "type": { "type_name": "varchar", "args": [255] },
                      "not_null": true, "unique": true, "note": "メールアドレス" },
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
    });

    let db = Database::normalize(&raw);

    // CSV: one text blob per logical table
    let export = CsvExporter::new().export(&db);
    for file in &export.files {
        println!("--- {} ---", file.name);
        println!("{}\n", file.content);
    }

    // Excel: one workbook, one sheet per logical table
    let mut exporter = ExcelExporter::new();
    let summary = exporter.export(&db)?;
    exporter.save("schema.xlsx")?;

    println!("Workbook written: schema.xlsx");
    println!("Sheets: {}", summary.worksheets.join(", "));

    Ok(())
}
