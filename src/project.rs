//! Tabular Projection Module
//!
//! 正規化済みデータベースをフォーマット非依存の行セットへ射影するモジュール。
//! スキーマから行への純粋関数であり、CSVエンコーダーとワークブック
//! エンコーダーの両方がこの射影結果を入力とする。

use crate::schema::{Database, Field, Table};
use crate::types::{Cell, RowSet};

/// テーブル一覧（概要）のヘッダー定義
pub const OVERVIEW_HEADERS: [&str; 3] = ["テーブル名", "説明", "フィールド数"];

/// テーブル詳細のヘッダー定義（全テーブル共通）
pub const DETAIL_HEADERS: [&str; 8] = [
    "フィールド名",
    "データ型",
    "NULL許可",
    "デフォルト値",
    "主キー",
    "ユニーク",
    "自動増分",
    "説明",
];

/// 射影結果
///
/// 概要行セットが常に1つと、テーブルごとの詳細行セット（テーブル名をキーに、
/// 挿入順を保持）で構成される。テーブルが0件の場合、詳細は空になる。
#[derive(Debug, Clone)]
pub struct Projection {
    /// テーブル一覧の行セット（テーブルごとに1行）
    pub overview: RowSet,

    /// テーブルごとの詳細行セット（フィールドごとに1行）
    pub details: Vec<(String, RowSet)>,
}

/// 正規化済みデータベースを行セットへ射影する
///
/// 順序は常にデータベースの挿入順に従う。ソート・名前の重複排除は行わない
/// （スキーマの妥当性検証は外部の関心事であり、重複名はそのまま別々の行と
/// して通過させる）。
///
/// # 戻り値
///
/// 概要行セット1つと、テーブルごとの詳細行セットを持つ`Projection`。
/// フィールド0件のテーブルもヘッダーのみの詳細行セットを持つ。
pub fn project(db: &Database) -> Projection {
    let mut overview = RowSet::new(OVERVIEW_HEADERS.iter().map(|h| h.to_string()).collect());
    let mut details = Vec::with_capacity(db.tables.len());

    for table in &db.tables {
        overview.push_row(vec![
            Cell::text(&table.name),
            Cell::text(&table.note),
            Cell::Number(table.fields.len() as u64),
        ]);
        details.push((table.name.clone(), project_table(table)));
    }

    Projection { overview, details }
}

/// 1テーブルの詳細行セットを生成する
fn project_table(table: &Table) -> RowSet {
    let mut rowset = RowSet::new(DETAIL_HEADERS.iter().map(|h| h.to_string()).collect());
    for field in &table.fields {
        rowset.push_row(field_row(field));
    }
    rowset
}

/// 1フィールドを詳細行へ変換する
///
/// ブール属性は生の値のまま`Cell::Flag` / `Cell::NotNull`として出力し、
/// マーカー文字列への変換は各エンコーダーが行う。
fn field_row(field: &Field) -> Vec<Cell> {
    vec![
        Cell::text(&field.name),
        Cell::text(field.field_type.render()),
        Cell::NotNull(field.not_null),
        Cell::text(field.default_value.as_deref().unwrap_or("")),
        Cell::Flag(field.pk),
        Cell::Flag(field.unique),
        Cell::Flag(field.increment),
        Cell::text(&field.note),
    ]
}
