//! CSV Encoder Module
//!
//! 行セットをRFC 4180準拠の区切りテキストへエンコードするモジュール。
//! 論理テーブルごとに1つのテキストを生成する。

use serde_json::Value;

use crate::error::DbmlSheetError;
use crate::project::{project, Projection};
use crate::schema::{validate_structure, Database};
use crate::types::{Cell, RowSet};

/// テーブル一覧CSVのファイル名
pub const OVERVIEW_FILE_NAME: &str = "tables_overview.csv";

/// 生成された1つのCSVファイル
#[derive(Debug, Clone, PartialEq)]
pub struct CsvFile {
    /// ファイル名（例: `tables_overview.csv`、`users.csv`）
    pub name: String,

    /// UTF-8のCSVコンテンツ
    pub content: String,
}

/// CSVエクスポートの結果
///
/// ファイル名からコンテンツへの順序付きマッピング。同名テーブルが複数ある
/// 場合は後勝ちで上書きされる（位置は最初の挿入位置を保持）。
#[derive(Debug, Clone, Default)]
pub struct CsvExport {
    /// 生成されたファイル列（挿入順）
    pub files: Vec<CsvFile>,

    /// 処理されたテーブル数
    pub tables_count: usize,
}

impl CsvExport {
    /// ファイル名でコンテンツを検索
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.as_str())
    }

    /// ファイル数
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// ファイルが1つもないか
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn insert(&mut self, name: String, content: String) {
        match self.files.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.content = content,
            None => self.files.push(CsvFile { name, content }),
        }
    }
}

/// CSV形式でのエクスポート機能を提供する
#[derive(Debug, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// 新しいエクスポーターを生成
    pub fn new() -> Self {
        Self
    }

    /// 正規化済みデータベースをCSVファイル群へエンコードする
    ///
    /// テーブル一覧（`tables_overview.csv`）と、テーブルごとの詳細CSV
    /// （`{テーブル名}.csv`）を生成する。テーブル0件でも一覧ファイルは
    /// 必ず生成される。
    pub fn export(&self, db: &Database) -> CsvExport {
        let Projection { overview, details } = project(db);

        let mut result = CsvExport {
            files: Vec::new(),
            tables_count: db.tables.len(),
        };

        result.insert(OVERVIEW_FILE_NAME.to_string(), encode_rowset(&overview));
        for (table_name, rowset) in &details {
            result.insert(format!("{}.csv", table_name), encode_rowset(rowset));
        }

        result
    }

    /// 生のスキーマJSONを検証したうえでエンコードする
    ///
    /// `tables`が欠落・非配列の場合は、出力を一切生成せずに
    /// `InvalidStructure`エラーを返す。
    pub fn export_value(&self, raw: &Value) -> Result<CsvExport, DbmlSheetError> {
        validate_structure(raw)?;
        Ok(self.export(&Database::normalize(raw)))
    }
}

/// 行セットを1つのCSV文字列へエンコードする
///
/// ヘッダー行に続いてデータ行を出力する。行は`\n`で結合し、
/// 末尾に改行は付けない。
pub fn encode_rowset(rowset: &RowSet) -> String {
    let mut lines = Vec::with_capacity(rowset.total_rows());
    lines.push(encode_row(rowset.header.iter().map(|h| escape_csv(h))));
    for row in &rowset.rows {
        lines.push(encode_row(row.iter().map(|c| escape_csv(&cell_to_string(c)))));
    }
    lines.join("\n")
}

fn encode_row(values: impl Iterator<Item = String>) -> String {
    values.collect::<Vec<_>>().join(",")
}

/// セル値をCSV向けの表示文字列へ変換する
///
/// マーカー規約: `Flag`は`○`（true）/ 空文字列（false）。
/// `NotNull`はNULL許可列として反転され、`×`（NULL不許可）/ `○`（NULL許可）
/// となる。この列のマーカーは「NULLを許可するか」に答える。
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

/// CSV文字列をエスケープする
///
/// カンマ、ダブルクォート、改行を含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープする。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
