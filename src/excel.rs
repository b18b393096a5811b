//! Workbook Encoder Module
//!
//! 行セットをExcel互換のワークブックへエンコードするモジュール。
//! 論理テーブルごとに1シートを生成し、ヘッダー装飾・列幅調整・罫線を適用する。
//!
//! ワークブックの構築（`export`）と永続化（`save`）は分離されており、
//! `save`は`export`が成功した後にのみ呼び出せる。書き込みは同期的に完了し、
//! 成功を返した時点でファイルは完全な状態で読み取り可能になる。
//! 存在確認のポーリングやリトライは行わない。

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::error::DbmlSheetError;
use crate::project::{project, Projection};
use crate::schema::{validate_structure, Database};
use crate::types::{Cell, RowSet};

/// テーブル一覧シートのシート名
pub const OVERVIEW_SHEET_NAME: &str = "テーブル一覧";

/// ヘッダー背景色（薄いグレー）
const HEADER_FILL: u32 = 0xE0E0E0;

/// 列幅の余白
const COLUMN_PADDING: usize = 2;

/// 列幅の下限（1文字マーカーの列も判読可能な幅を保つ）
const MIN_COLUMN_WIDTH: usize = 12;

/// Excelエクスポートの結果
#[derive(Debug, Clone)]
pub struct ExcelExportSummary {
    /// 生成されたシート名（順序どおり）
    pub worksheets: Vec<String>,

    /// 処理されたテーブル数
    pub tables_count: usize,
}

/// Excel形式でのエクスポート機能を提供する
///
/// ワークブックを生成済みかどうかを内部で追跡し、`export`前の`save`呼び出しを
/// 拒否する。
///
/// # 使用例
///
/// ```rust,no_run
/// use dbmlsheet::{Database, ExcelExporter};
/// use serde_json::json;
///
/// # fn main() -> Result<(), dbmlsheet::DbmlSheetError> {
/// let db = Database::normalize(&json!({
///     "tables": [{ "name": "users", "fields": [] }]
/// }));
///
/// let mut exporter = ExcelExporter::new();
/// let summary = exporter.export(&db)?;
/// exporter.save("schema.xlsx")?;
/// println!("sheets: {:?}", summary.worksheets);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ExcelExporter {
    /// 構築済みワークブック（`export`成功後にのみSome）
    workbook: Option<Workbook>,
}

impl ExcelExporter {
    /// 新しいエクスポーターを生成
    pub fn new() -> Self {
        Self { workbook: None }
    }

    /// 正規化済みデータベースをワークブックへエンコードする
    ///
    /// 先頭にテーブル一覧シート、続いてテーブルごとのシートを、
    /// テーブル名をそのままシート名として生成する。シート名の制約違反
    /// （不正文字・長さ超過・空文字列）はエラーとして呼び出し元へ伝播し、
    /// 暗黙には解決しない。
    pub fn export(&mut self, db: &Database) -> Result<ExcelExportSummary, DbmlSheetError> {
        let Projection { overview, details } = project(db);

        let mut workbook = Workbook::new();
        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_border(FormatBorder::Thin);
        let body_format = Format::new().set_border(FormatBorder::Thin);

        let mut worksheets = Vec::with_capacity(details.len() + 1);

        let sheet = workbook.add_worksheet();
        sheet.set_name(OVERVIEW_SHEET_NAME)?;
        write_rowset(sheet, &overview, &header_format, &body_format)?;
        worksheets.push(OVERVIEW_SHEET_NAME.to_string());

        for (table_name, rowset) in &details {
            let sheet = workbook.add_worksheet();
            sheet.set_name(table_name)?;
            write_rowset(sheet, rowset, &header_format, &body_format)?;
            worksheets.push(table_name.clone());
        }

        self.workbook = Some(workbook);

        Ok(ExcelExportSummary {
            worksheets,
            tables_count: db.tables.len(),
        })
    }

    /// 生のスキーマJSONを検証したうえでエンコードする
    ///
    /// `tables`が欠落・非配列の場合、シートを1つも生成せずに
    /// `InvalidStructure`エラーを返す。
    pub fn export_value(&mut self, raw: &Value) -> Result<ExcelExportSummary, DbmlSheetError> {
        validate_structure(raw)?;
        self.export(&Database::normalize(raw))
    }

    /// ワークブックをファイルへ保存する
    ///
    /// 親ディレクトリが存在しない場合は作成する（他プロセスとの作成競合は
    /// 許容され、既存は成功として扱う）。書き込みは同期的で、成功を返した
    /// 時点で完全なファイルが読み取り可能になる。
    ///
    /// # エラー
    ///
    /// - `WorkbookNotBuilt`: `export`より先に呼び出された場合
    /// - `Save`: 書き込みに失敗した場合（対象パスを保持）
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<PathBuf, DbmlSheetError> {
        let path = path.as_ref();
        let workbook = self
            .workbook
            .as_mut()
            .ok_or(DbmlSheetError::WorkbookNotBuilt)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        workbook.save(path).map_err(|source| DbmlSheetError::Save {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(path.to_path_buf())
    }

    /// ワークブックをメモリ上のバッファへ書き出す
    ///
    /// `save`と同じ前提条件を持つ。主に検証・テスト用途。
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>, DbmlSheetError> {
        let workbook = self
            .workbook
            .as_mut()
            .ok_or(DbmlSheetError::WorkbookNotBuilt)?;
        Ok(workbook.save_to_buffer()?)
    }
}

/// 1つの行セットをシートへ書き込む
///
/// ヘッダー行は太字 + 塗りつぶし、データ領域（ヘッダー + データ行 × 列数）の
/// 全セルに細罫線を適用する。罫線・装飾はデータ領域の外には適用しない。
fn write_rowset(
    sheet: &mut Worksheet,
    rowset: &RowSet,
    header_format: &Format,
    body_format: &Format,
) -> Result<(), XlsxError> {
    for (col, header) in rowset.header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, header_format)?;
    }

    for (row_index, row) in rowset.rows.iter().enumerate() {
        let row_number = (row_index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col_number = col as u16;
            match cell {
                Cell::Number(n) => {
                    sheet.write_number_with_format(row_number, col_number, *n as f64, body_format)?;
                }
                other => {
                    sheet.write_string_with_format(
                        row_number,
                        col_number,
                        cell_to_string(other),
                        body_format,
                    )?;
                }
            }
        }
    }

    for (col, width) in column_widths(rowset).into_iter().enumerate() {
        sheet.set_column_width(col as u16, width as f64)?;
    }

    Ok(())
}

/// 各列の幅を計算する
///
/// 列内の最大表示幅（Unicode表示幅。全角文字・マーカーグリフを2桁として
/// 数える）に余白を加え、下限値を適用する。
fn column_widths(rowset: &RowSet) -> Vec<usize> {
    let mut widths: Vec<usize> = rowset.header.iter().map(|h| h.width()).collect();

    for row in &rowset.rows {
        for (col, cell) in row.iter().enumerate() {
            if col >= widths.len() {
                break;
            }
            let cell_width = display_width(cell);
            if cell_width > widths[col] {
                widths[col] = cell_width;
            }
        }
    }

    widths
        .into_iter()
        .map(|w| (w + COLUMN_PADDING).max(MIN_COLUMN_WIDTH))
        .collect()
}

fn display_width(cell: &Cell) -> usize {
    match cell {
        Cell::Number(n) => n.to_string().len(),
        other => cell_to_string(other).width(),
    }
}

/// セル値をワークブック向けの表示文字列へ変換する
///
/// マーカー規約はCSVエンコーダーと同一: `Flag`は`○` / 空文字列、
/// `NotNull`はNULL許可列として反転され`×`（NULL不許可）/ `○`（NULL許可）。
fn cell_to_string(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => n.to_string(),
        Cell::Flag(true) => "○".to_string(),
        Cell::Flag(false) => String::new(),
        Cell::NotNull(true) => "×".to_string(),
        Cell::NotNull(false) => "○".to_string(),
    }
}
