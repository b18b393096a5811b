//! dbmlsheet - DBML schema to CSV and Excel table-definition exporter
//!
//! This crate converts a parsed database-schema description (the JSON output
//! of an external DBML parser) into delimited text tables (CSV) and a
//! multi-sheet Excel-compatible workbook, one sheet per table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dbmlsheet::{CsvExporter, Database};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Schema object produced by an external DBML parser
//!     let raw = json!({
//!         "tables": [{
//!             "name": "users",
//!             "note": "ユーザー情報テーブル",
//!             "fields": [
//!                 { "name": "id", "type": "bigint", "pk": true, "increment": true },
//!                 { "name": "email", "type": { "type_name": "varchar", "args": [255] },
//!                   "not_null": true, "unique": true }
//!             ]
//!         }]
//!     });
//!
//!     // Normalize the untrusted schema, then encode
//!     let db = Database::normalize(&raw);
//!     let export = CsvExporter::new().export(&db);
//!     for file in &export.files {
//!         println!("--- {} ---\n{}", file.name, file.content);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Excel Workbook Output
//!
//! ```rust,no_run
//! use dbmlsheet::{Database, ExcelExporter};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), dbmlsheet::DbmlSheetError> {
//! let db = Database::normalize(&json!({ "tables": [] }));
//!
//! let mut exporter = ExcelExporter::new();
//! let summary = exporter.export(&db)?;
//! exporter.save("schema.xlsx")?;
//!
//! println!("sheets: {:?}", summary.worksheets);
//! # Ok(())
//! # }
//! ```
//!
//! # File-to-File Conversion
//!
//! ```rust,no_run
//! use dbmlsheet::{convert_file, Format};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), dbmlsheet::DbmlSheetError> {
//! // Input is the JSON serialization of the external DBML parser's output
//! let report = convert_file(Path::new("schema.json"), None, Format::Xlsx)?;
//! println!("written: {}", report.output.display());
//! # Ok(())
//! # }
//! ```

mod convert;
mod csv;
mod error;
mod excel;
mod project;
mod schema;
mod types;

// 公開API
pub use convert::{
    convert_file, is_directory_path, resolve_output_path, write_csv_file, write_csv_files,
    ConversionReport, Format,
};
pub use csv::{encode_rowset, CsvExport, CsvExporter, CsvFile, OVERVIEW_FILE_NAME};
pub use error::DbmlSheetError;
pub use excel::{ExcelExportSummary, ExcelExporter, OVERVIEW_SHEET_NAME};
pub use project::{project, Projection, DETAIL_HEADERS, OVERVIEW_HEADERS};
pub use schema::{validate_structure, Database, Field, FieldType, Table};
pub use types::{Cell, RowSet};
