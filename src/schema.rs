//! Schema Module
//!
//! 外部DBMLパーサーが生成したスキーマオブジェクトを正規化するモジュール。
//! 入力は信頼できないJSONオブジェクトグラフとして扱い、欠落・不正な属性を
//! デフォルト値で補った正規形（`Database`）へ変換する。
//!
//! 正規化を一箇所に集約することで、下流のエンコーダー（CSV / Excel）は
//! `fields`が常に配列であることを前提にでき、防御的チェックの重複を避けられる。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DbmlSheetError;

/// フィールドのデータ型
///
/// 外部パーサーの出力では、型は素の文字列（例: `"bigint"`）と
/// パラメータ付きの型記述子（例: `{"type_name": "varchar", "args": [100]}`）の
/// 2形態を取る。実行時の形状検査ではなく、タグ付き列挙型として表現する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    /// 素の型名（例: `bigint`）
    Plain(String),

    /// パラメータ付きの型記述子（例: `varchar(100)`）
    Parameterized {
        /// 型名
        type_name: String,
        /// 型引数（表示用に文字列化済み）
        #[serde(default)]
        args: Vec<String>,
    },

    /// 型情報が欠落、または解釈できない形状だった場合
    Unknown,
}

impl FieldType {
    /// 生のJSON値から型を解決する
    ///
    /// 文字列・`type_name`を持つオブジェクト以外の形状（欠落・null・数値など）は
    /// すべて`Unknown`に落とす。全域関数であり失敗しない。
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(name)) => FieldType::Plain(name.clone()),
            Some(Value::Object(map)) => match map.get("type_name").and_then(Value::as_str) {
                Some(type_name) => {
                    let args = map
                        .get("args")
                        .and_then(Value::as_array)
                        .map(|args| args.iter().map(value_to_display).collect())
                        .unwrap_or_default();
                    FieldType::Parameterized {
                        type_name: type_name.to_string(),
                        args,
                    }
                }
                None => FieldType::Unknown,
            },
            _ => FieldType::Unknown,
        }
    }

    /// 表示用の型文字列を生成する
    ///
    /// 引数は`", "`（カンマ + 空白）で結合する。引数が空の場合は型名のみを返す。
    ///
    /// # 例
    ///
    /// - `Plain("bigint")` → `"bigint"`
    /// - `Parameterized("varchar", ["100"])` → `"varchar(100)"`
    /// - `Parameterized("decimal", ["10", "2"])` → `"decimal(10, 2)"`
    /// - `Unknown` → `"unknown"`
    pub fn render(&self) -> String {
        match self {
            FieldType::Plain(name) => name.clone(),
            FieldType::Parameterized { type_name, args } => {
                if args.is_empty() {
                    type_name.clone()
                } else {
                    format!("{}({})", type_name, args.join(", "))
                }
            }
            FieldType::Unknown => "unknown".to_string(),
        }
    }
}

/// 正規化済みのフィールド定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// フィールド名
    #[serde(default)]
    pub name: String,

    /// データ型
    #[serde(rename = "type", default = "unknown_type")]
    pub field_type: FieldType,

    /// NOT NULL制約（false = NULL許可）
    #[serde(default)]
    pub not_null: bool,

    /// ユニーク制約
    #[serde(default)]
    pub unique: bool,

    /// 主キー
    #[serde(default)]
    pub pk: bool,

    /// 自動増分
    #[serde(default)]
    pub increment: bool,

    /// デフォルト値（表示用に文字列化済み）
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// 説明（欠落時は空文字列）
    #[serde(default)]
    pub note: String,
}

fn unknown_type() -> FieldType {
    FieldType::Unknown
}

impl Field {
    /// 生のJSON値からフィールドを構築する
    ///
    /// 属性の欠落・型不一致はすべてデフォルト値に落とす（全域関数）。
    pub fn from_value(value: &Value) -> Self {
        Field {
            name: string_attr(value, "name"),
            field_type: FieldType::from_value(value.get("type")),
            not_null: bool_attr(value, "not_null"),
            unique: bool_attr(value, "unique"),
            pk: bool_attr(value, "pk"),
            increment: bool_attr(value, "increment"),
            default_value: value
                .get("default")
                .filter(|v| !v.is_null())
                .map(value_to_display),
            note: string_attr(value, "note"),
        }
    }
}

/// 正規化済みのテーブル定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// テーブル名（ファイル名・シート名としても使用される）
    #[serde(default)]
    pub name: String,

    /// 説明（欠落時は空文字列）
    #[serde(default)]
    pub note: String,

    /// フィールド列（不変条件: 常に配列。生入力がnull・非配列でも空配列に正規化）
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Table {
    /// 生のJSON値からテーブルを構築する
    ///
    /// `fields`が配列でない場合（null・欠落・非配列）は空配列に置き換える。
    /// それ以外の属性はデフォルト値で補う。
    pub fn from_value(value: &Value) -> Self {
        let fields = value
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().map(Field::from_value).collect())
            .unwrap_or_default();

        Table {
            name: string_attr(value, "name"),
            note: string_attr(value, "note"),
            fields,
        }
    }
}

/// 正規化済みのデータベース定義
///
/// 不変条件: `tables`は常に順序付きの列。1回の変換ごとに生成され、
/// 変換パイプラインが排他的に所有し、エンコード後に破棄される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// テーブル列（挿入順を保持）
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Database {
    /// 生のスキーマオブジェクトを正規化する
    ///
    /// `tables`が欠落・null・非配列の場合は空のテーブル列とする。
    /// 入力を変更せず、新しいオブジェクトを返す。エラー条件はない。
    pub fn normalize(raw: &Value) -> Self {
        let tables = raw
            .get("tables")
            .and_then(Value::as_array)
            .map(|tables| tables.iter().map(Table::from_value).collect())
            .unwrap_or_default();

        Database { tables }
    }
}

/// エンコーダー入口で適用する構造検証
///
/// `tables`が存在し、かつ配列であることを要求する。正規化（欠落を空配列に
/// 補う）とは異なり、欠落・null・非配列を構造エラーとして拒否する。
pub fn validate_structure(raw: &Value) -> Result<(), DbmlSheetError> {
    match raw.get("tables") {
        Some(Value::Array(_)) => Ok(()),
        _ => Err(DbmlSheetError::InvalidStructure(
            "tables array required".to_string(),
        )),
    }
}

/// JSONプリミティブを表示用文字列に変換する
///
/// 数値はデフォルトの文字列形式、nullは空文字列とする。
fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_attr(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn bool_attr(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}
