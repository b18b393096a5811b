//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! スキーマと各エンコーダーの間に立つ、フォーマット非依存の中間表現を提供する。

/// 行セット内の1セルの表示値
///
/// プロジェクターはブール属性を生の値のまま出力し、テキストマーカーへの
/// 変換（`○` / `×` / 空文字列）は各エンコーダーに委ねる。これにより
/// CSVとワークブックが異なるマーカー規約を採用できる構造を保っている。
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// 文字列値
    Text(String),

    /// 数値（ワークブックでは数値型セルとして出力される）
    Number(u64),

    /// 属性フラグ（主キー・ユニーク・自動増分）。true = 設定あり
    Flag(bool),

    /// NOT NULL制約の生の値。NULL許可列への変換時に反転される
    /// （true = NULL不許可）
    NotNull(bool),
}

impl Cell {
    /// 文字列からテキストセルを生成
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

/// フォーマット非依存の行セット
///
/// 固定ヘッダー行と、順序付きのデータ行の列。スキーマから各出力形式への
/// 変換の中間表現であり、1回の変換ごとに生成・破棄される。
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    /// ヘッダー行（固定・順序付き）
    pub header: Vec<String>,

    /// データ行（挿入順を保持）
    pub rows: Vec<Vec<Cell>>,
}

impl RowSet {
    /// ヘッダーのみの空の行セットを生成
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// データ行を追加
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// ヘッダーを含む総行数
    pub fn total_rows(&self) -> usize {
        self.rows.len() + 1
    }

    /// 列数（ヘッダーの列数で決まる）
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}
