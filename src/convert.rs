//! Conversion Orchestration Module
//!
//! 入力スキーマの読み込みからエンコーダーの選択、出力先の解決、
//! ファイル書き込みまでの変換処理全体を調整するモジュール。
//!
//! 入力ファイルは外部DBMLパーサーの出力をJSONとして直列化したものを想定する。
//! コア（正規化・射影・エンコード）は設定値を持たず、出力パス・形式の選択は
//! すべてこの層の責務である。

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;

use crate::csv::{CsvExport, CsvExporter, OVERVIEW_FILE_NAME};
use crate::error::DbmlSheetError;
use crate::excel::ExcelExporter;
use crate::schema::{validate_structure, Database};

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// 区切りテキスト（テーブルごとに1ファイル）
    Csv,

    /// Excel互換ワークブック（テーブルごとに1シート、単一ファイル）
    Xlsx,
}

impl FromStr for Format {
    type Err = DbmlSheetError;

    /// 形式名を解決する（大文字小文字は区別しない）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "xlsx" => Ok(Format::Xlsx),
            other => Err(DbmlSheetError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => write!(f, "csv"),
            Format::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// 1回の変換の結果
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// 使用された出力形式
    pub format: Format,

    /// 解決された出力パス（CSVのディレクトリ出力時はディレクトリ）
    pub output: PathBuf,

    /// 書き込まれたCSVファイル名（CSV形式のみ）
    pub files: Vec<String>,

    /// 生成されたシート名（xlsx形式のみ）
    pub worksheets: Vec<String>,

    /// 処理されたテーブル数
    pub tables_count: usize,
}

/// スキーマJSONファイルを指定された形式へ変換する
///
/// 入力を読み込み、構造検証と正規化を行ったうえで形式別の変換に委譲する。
/// 構造エラーが検出された場合、出力は一切生成されない。
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    format: Format,
) -> Result<ConversionReport, DbmlSheetError> {
    let content = fs::read_to_string(input)?;
    let raw: Value = serde_json::from_str(&content)?;
    validate_structure(&raw)?;
    let db = Database::normalize(&raw);

    let resolved = resolve_output_path(input, output, format);
    match format {
        Format::Csv => convert_to_csv(&db, &resolved),
        Format::Xlsx => convert_to_excel(&db, &resolved),
    }
}

/// CSV形式への変換
///
/// 出力先がディレクトリ（拡張子なし、または末尾が区切り文字）の場合は
/// 一覧 + テーブルごとの複数ファイルを書き込む。単一ファイルパスの場合は
/// テーブル一覧のみをそのファイルへ書き込む。
fn convert_to_csv(db: &Database, output: &Path) -> Result<ConversionReport, DbmlSheetError> {
    let export = CsvExporter::new().export(db);

    if is_directory_path(output) {
        let files = write_csv_files(output, &export)?;
        Ok(ConversionReport {
            format: Format::Csv,
            output: output.to_path_buf(),
            files,
            worksheets: Vec::new(),
            tables_count: export.tables_count,
        })
    } else {
        let overview = export.get(OVERVIEW_FILE_NAME).unwrap_or_default();
        write_csv_file(output, overview)?;
        Ok(ConversionReport {
            format: Format::Csv,
            output: output.to_path_buf(),
            files: vec![OVERVIEW_FILE_NAME.to_string()],
            worksheets: Vec::new(),
            tables_count: export.tables_count,
        })
    }
}

/// Excel形式への変換
fn convert_to_excel(db: &Database, output: &Path) -> Result<ConversionReport, DbmlSheetError> {
    let mut exporter = ExcelExporter::new();
    let summary = exporter.export(db)?;
    let written = exporter.save(output)?;

    Ok(ConversionReport {
        format: Format::Xlsx,
        output: written,
        files: Vec::new(),
        worksheets: summary.worksheets,
        tables_count: summary.tables_count,
    })
}

/// 出力パスを解決する
///
/// 出力が明示されていればそのまま使用する。未指定の場合は入力と同じ
/// ディレクトリに、CSVは`{入力名}_csv`ディレクトリ、xlsxは`{入力名}.xlsx`
/// として出力する。
pub fn resolve_output_path(input: &Path, output: Option<&Path>, format: Format) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }

    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match format {
        Format::Csv => dir.join(format!("{}_csv", stem)),
        Format::Xlsx => dir.join(format!("{}.xlsx", stem)),
    }
}

/// パスをディレクトリとして扱うかを判定する
///
/// 拡張子がない、または末尾がパス区切り文字の場合にディレクトリとみなす。
pub fn is_directory_path(path: &Path) -> bool {
    let as_str = path.to_string_lossy();
    path.extension().is_none() || as_str.ends_with('/') || as_str.ends_with('\\')
}

/// 単一のCSVファイルを書き込む（親ディレクトリは存在しなければ作成）
pub fn write_csv_file(path: &Path, content: &str) -> Result<(), DbmlSheetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

/// エクスポート結果の全ファイルをディレクトリへ書き込む
///
/// 書き込んだファイル名の一覧を返す。
pub fn write_csv_files(dir: &Path, export: &CsvExport) -> Result<Vec<String>, DbmlSheetError> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(export.len());
    for file in &export.files {
        fs::write(dir.join(&file.name), &file.content)?;
        written.push(file.name.clone());
    }
    Ok(written)
}
