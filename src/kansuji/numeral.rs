//! 漢数字パーサ
//!
//! 切り出された数字スパンを値に変換する。単位を含まないスパンは位取りの
//! 数字列として、単位を含むスパンは命数法（十・百・千／万・億・兆）として読む。

use std::fmt;

/// 数字トークン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumeralToken {
    /// 〇〜九
    Digit(u64),
    /// 十・百・千（ブロック内の位）
    SmallUnit(u64),
    /// 万・億・兆（ブロックを締める）
    LargeUnit(u64),
    /// 小数点「・」（パーセント表記でのみ現れる）
    DecimalDot,
}

impl NumeralToken {
    /// 文字を分類する
    pub fn classify(ch: char) -> Option<Self> {
        let token = match ch {
            '〇' => Self::Digit(0),
            '一' => Self::Digit(1),
            '二' => Self::Digit(2),
            '三' => Self::Digit(3),
            '四' => Self::Digit(4),
            '五' => Self::Digit(5),
            '六' => Self::Digit(6),
            '七' => Self::Digit(7),
            '八' => Self::Digit(8),
            '九' => Self::Digit(9),
            '十' => Self::SmallUnit(10),
            '百' => Self::SmallUnit(100),
            '千' => Self::SmallUnit(1_000),
            '万' => Self::LargeUnit(10_000),
            '億' => Self::LargeUnit(100_000_000),
            '兆' => Self::LargeUnit(1_000_000_000_000),
            '・' => Self::DecimalDot,
            _ => return None,
        };
        Some(token)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Self::SmallUnit(_) | Self::LargeUnit(_))
    }
}

/// 数字・単位の文字か（小数点は含まない）
pub fn is_numeral_char(ch: char) -> bool {
    matches!(
        NumeralToken::classify(ch),
        Some(NumeralToken::Digit(_) | NumeralToken::SmallUnit(_) | NumeralToken::LargeUnit(_))
    )
}

/// 数字スパンの値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumeralValue {
    /// 位取りの数字列（"二〇二四" → "2024"、"三・五" → "3.5"）
    Digits(String),
    /// 命数法で読んだ値（"二千二十四" → 2024）
    Named(u64),
}

impl NumeralValue {
    /// 素の整数として読めれば返す
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Named(value) => Some(*value),
            Self::Digits(digits) => {
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    digits.parse().ok()
                } else {
                    None
                }
            }
        }
    }

    /// 3 桁区切りの表記
    ///
    /// 整数でない値（小数・桁あふれ）は変換後の数字列をそのまま返す
    pub fn grouped(&self) -> String {
        match self.as_integer() {
            Some(value) => group_thousands(value),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for NumeralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digits(digits) => f.write_str(digits),
            Self::Named(value) => write!(f, "{}", value),
        }
    }
}

/// スパンの値を求める
///
/// 認識できるトークンが一つもなければ `None`
pub fn parse_value(span: &str) -> Option<NumeralValue> {
    let tokens: Vec<NumeralToken> = span.chars().filter_map(NumeralToken::classify).collect();
    if tokens.is_empty() {
        return None;
    }

    if tokens.iter().any(NumeralToken::is_unit) {
        Some(NumeralValue::Named(accumulate_named(&tokens)))
    } else {
        Some(NumeralValue::Digits(read_digit_string(span)))
    }
}

/// 命数法として読む（単位がなくても強制）
pub fn parse_named(span: &str) -> Option<u64> {
    let tokens: Vec<NumeralToken> = span.chars().filter_map(NumeralToken::classify).collect();
    if tokens.is_empty() {
        return None;
    }
    Some(accumulate_named(&tokens))
}

/// 位取り読み：各トークンを 1 桁として並べる
fn read_digit_string(span: &str) -> String {
    span.chars()
        .map(|ch| match NumeralToken::classify(ch) {
            Some(NumeralToken::Digit(d)) => char::from(b'0' + d as u8),
            Some(NumeralToken::DecimalDot) => '.',
            _ => ch,
        })
        .collect()
}

/// 命数法の累算
fn accumulate_named(tokens: &[NumeralToken]) -> u64 {
    let mut total: u64 = 0;
    let mut current_block: u64 = 0;
    let mut pending_digit: Option<u64> = None;

    for token in tokens {
        match *token {
            NumeralToken::Digit(d) => {
                // 単位を挟まない連続した数字：前の数字を一の位として畳む
                if let Some(prev) = pending_digit {
                    current_block = current_block.saturating_add(prev);
                }
                pending_digit = Some(d);
            }
            NumeralToken::SmallUnit(factor) => {
                let coefficient = pending_digit.take().unwrap_or(1);
                current_block = current_block.saturating_add(coefficient.saturating_mul(factor));
            }
            NumeralToken::LargeUnit(factor) => {
                let mut segment = current_block.saturating_add(pending_digit.take().unwrap_or(0));
                // "万" 単独は一万
                if segment == 0 {
                    segment = 1;
                }
                total = total.saturating_add(segment.saturating_mul(factor));
                current_block = 0;
            }
            NumeralToken::DecimalDot => {}
        }
    }

    if let Some(d) = pending_digit {
        current_block = current_block.saturating_add(d);
    }
    total.saturating_add(current_block)
}

/// 3 桁ごとにカンマを入れる
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
