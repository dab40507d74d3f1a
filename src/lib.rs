//! 法令文の漢数字を算用数字に変換するライブラリ
//!
//! ```
//! assert_eq!(egov_kansuji::convert("第十五条"), "第15条");
//! assert_eq!(egov_kansuji::convert("千二百三十四円"), "1,234円");
//! ```

pub mod article;
pub mod config;
pub mod kansuji;

pub use article::{ArticleMatch, ArticleQuery};
pub use config::ConverterConfig;
pub use kansuji::{
    parse_named, parse_value, to_full_width, to_japanese_numeral, ConversionResult, Converter,
    NumeralValue, Replacement, RuleKind,
};

/// 既定設定でテキストを変換する
pub fn convert(text: &str) -> String {
    kansuji::default_converter().convert(text)
}
