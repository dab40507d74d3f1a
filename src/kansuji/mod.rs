//! 漢数字変換層
//!
//! 法令文中の漢数字を算用数字に置き換える。
//!
//! ## 処理の流れ
//! 1. 分数（三分の二）
//! 2. 助数詞付きの数（円・年・月・日・人 …）
//! 3. パーセント
//! 4. 箇月
//! 5. 第〜・前〜（条番号、区切りなし）
//! 6. 枝番号（条の二の三）
//! 7. 単位なしの大きな数（二十万）
//! 8. 残った「箇月」の書き換え

mod engine;
mod numeral;
pub(crate) mod rules;
mod render;
mod types;

pub use engine::{default_converter, Converter};
pub use numeral::{
    group_thousands, is_numeral_char, parse_named, parse_value, NumeralToken, NumeralValue,
};
pub use render::{to_full_width, to_japanese_numeral};
pub use rules::{Rule, TrailingGuard};
pub use types::{ConversionResult, Replacement, RuleKind};
