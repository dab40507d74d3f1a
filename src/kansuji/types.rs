//! 変換層の型定義

use serde::{Deserialize, Serialize};

/// 置換を行ったルールの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// 分数（三分の二 → 2/3）
    Fraction,
    /// 助数詞付き（千二百三十四円 → 1,234円）
    Unit,
    /// パーセント（三・五パーセント → 3.5%）
    Percentage,
    /// 箇月 → か月
    MonthCounter,
    /// 第〜（条番号など、区切りなし）
    Ordinal,
    /// 前〜（前二条など）
    Preceding,
    /// 枝番号（条の二の三）
    ClauseBranch,
    /// 単位なしの大きな数（二十万）
    LargeNumber,
    /// 残った「箇月」の書き換え
    MonthCounterCleanup,
}

/// 置換記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    /// 元のテキスト
    pub original: String,
    /// 置換後のテキスト
    pub replaced: String,
    /// 開始位置（そのルールが受け取ったテキスト上のバイト位置）
    pub start: usize,
    /// 終了位置（含まない）
    pub end: usize,
    pub rule: RuleKind,
}

/// 変換結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// 変換後のテキスト
    pub text: String,
    /// 変更があったか
    pub changed: bool,
    /// 適用順の置換記録
    pub applied: Vec<Replacement>,
    /// 処理時間（マイクロ秒）
    pub elapsed_us: u64,
}

impl ConversionResult {
    /// 変更なしの結果
    pub fn unchanged(text: String, elapsed_us: u64) -> Self {
        Self {
            text,
            changed: false,
            applied: Vec::new(),
            elapsed_us,
        }
    }
}
