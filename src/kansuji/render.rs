//! 算用数字 → 漢数字
//!
//! 条文見出しの検索語を作るための逆変換。`parse_value` で読み戻せる形で出力する

const DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
const SMALL_UNITS: [&str; 4] = ["", "十", "百", "千"];
const LARGE_UNITS: [&str; 4] = ["", "万", "億", "兆"];

/// 兆の位を超える値は位取りの数字列で書く
const NAMED_LIMIT: u64 = 10_000_000_000_000_000;

/// 整数を漢数字で書く
///
/// 十・百・千の前の「一」は省く（1024 → 千二十四）。万以上の位の「一」は残す（一万）
pub fn to_japanese_numeral(n: u64) -> String {
    if n == 0 {
        return DIGITS[0].to_string();
    }
    if n >= NAMED_LIMIT {
        return n
            .to_string()
            .bytes()
            .map(|b| DIGITS[(b - b'0') as usize])
            .collect();
    }

    let mut groups = Vec::with_capacity(LARGE_UNITS.len());
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 10_000);
        rest /= 10_000;
    }

    let mut result = String::new();
    for (i, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }
        render_group(*group, &mut result);
        result.push_str(LARGE_UNITS[i]);
    }
    result
}

/// 1〜9999 の 1 ブロック
fn render_group(group: u64, out: &mut String) {
    for pos in (0..SMALL_UNITS.len()).rev() {
        let digit = (group / 10u64.pow(pos as u32) % 10) as usize;
        if digit == 0 {
            continue;
        }
        if !(digit == 1 && pos > 0) {
            out.push(DIGITS[digit]);
        }
        out.push_str(SMALL_UNITS[pos]);
    }
}

/// 半角数字を全角にする
pub fn to_full_width(s: &str) -> String {
    s.chars()
        .map(|ch| {
            if ch.is_ascii_digit() {
                char::from_u32(ch as u32 + 0xFEE0).unwrap_or(ch)
            } else {
                ch
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kansuji::numeral::parse_value;

    #[test]
    fn test_small_values() {
        assert_eq!(to_japanese_numeral(0), "〇");
        assert_eq!(to_japanese_numeral(1), "一");
        assert_eq!(to_japanese_numeral(10), "十");
        assert_eq!(to_japanese_numeral(15), "十五");
        assert_eq!(to_japanese_numeral(32), "三十二");
        assert_eq!(to_japanese_numeral(101), "百一");
        assert_eq!(to_japanese_numeral(1024), "千二十四");
        assert_eq!(to_japanese_numeral(2024), "二千二十四");
    }

    #[test]
    fn test_large_groups() {
        assert_eq!(to_japanese_numeral(10_000), "一万");
        assert_eq!(to_japanese_numeral(35_000), "三万五千");
        assert_eq!(to_japanese_numeral(10_000_000), "千万");
        assert_eq!(to_japanese_numeral(100_000_001), "一億一");
        assert_eq!(to_japanese_numeral(120_000_000), "一億二千万");
        assert_eq!(to_japanese_numeral(3_000_000_000_000), "三兆");
    }

    #[test]
    fn test_beyond_named_range() {
        assert_eq!(
            to_japanese_numeral(10_000_000_000_000_000),
            "一〇〇〇〇〇〇〇〇〇〇〇〇〇〇〇〇"
        );
    }

    #[test]
    fn test_parses_back() {
        let values = [
            0,
            7,
            10,
            11,
            19,
            110,
            999,
            1_000,
            1_001,
            9_999,
            10_001,
            12_345_678,
            100_000_000,
            123_456_789_012,
            NAMED_LIMIT - 1,
            NAMED_LIMIT,
            u64::MAX,
        ];
        for n in values {
            let rendered = to_japanese_numeral(n);
            let parsed = parse_value(&rendered).and_then(|v| v.as_integer());
            assert_eq!(parsed, Some(n), "{} → {}", n, rendered);
        }
    }

    #[test]
    fn test_full_width() {
        assert_eq!(to_full_width("12"), "１２");
        assert_eq!(to_full_width("第3条の2"), "第３条の２");
        assert_eq!(to_full_width("abc"), "abc");
    }
}
