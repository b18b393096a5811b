//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// dbmlsheetクレート全体で使用するエラー型
///
/// スキーマの読み込み、検証、エンコード、永続化の各段階で発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `InvalidStructure`: データベース構造が不正（`tables`が存在しない、配列でない）
/// - `WorkbookNotBuilt`: ワークブック生成前に保存が要求された（呼び出し順序の誤り）
/// - `Xlsx`: ワークブック構築中のエラー（シート名の重複・不正文字など）
/// - `Save`: ワークブックのファイル書き込みに失敗（対象パスを保持）
/// - `Io`: I/O操作中に発生したエラー
/// - `Json`: スキーマJSONの読み込み・解析エラー
///
/// # 使用例
///
/// ```rust,no_run
/// use dbmlsheet::DbmlSheetError;
///
/// fn read_schema(path: &str) -> Result<serde_json::Value, DbmlSheetError> {
///     let content = std::fs::read_to_string(path)?; // Ioエラーが自動的に変換される
///     let value = serde_json::from_str(&content)?;  // Jsonエラーが自動的に変換される
///     Ok(value)
/// }
/// ```
#[derive(Error, Debug)]
pub enum DbmlSheetError {
    /// データベース構造が不正なエラー
    ///
    /// エンコーダーの入口で`tables`が存在しない、または配列でない場合に
    /// 発生します。内部で回復されることはなく、常に呼び出し元へそのまま
    /// 伝播されます。
    #[error("Invalid database structure: {0}")]
    InvalidStructure(String),

    /// ワークブック生成前に保存が要求されたエラー
    ///
    /// `ExcelExporter::save()`を`export()`より先に呼び出した場合に発生する
    /// プログラミングエラーです。
    #[error("No workbook to save. Call export() first.")]
    WorkbookNotBuilt,

    /// ワークブック構築中に発生したエラー
    ///
    /// シート名の重複、シート名の不正文字・長さ超過など、xlsx形式の
    /// 制約違反が原因となります。`#[from]`属性により、
    /// `rust_xlsxwriter::XlsxError`から自動的に変換されます。
    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// ワークブックのファイル書き込みに失敗したエラー
    ///
    /// 対象パスをコンテキストとして保持します。リトライは行いません。
    #[error("Failed to write Excel file '{path}': {source}")]
    Save {
        /// 書き込み対象のパス
        path: PathBuf,
        /// 根本原因となったエラー
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// サポートされていない出力形式が指定されたエラー
    ///
    /// 変換オーケストレーターが未知の形式名を受け取った場合に発生します。
    #[error("Unsupported format: {0}. Supported formats: csv, xlsx")]
    UnsupportedFormat(String),

    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スキーマJSONの解析エラー
    ///
    /// 入力ファイルがJSONとして不正な場合に発生します。
    #[error("Failed to parse schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}
