//! 変換エンジン
//!
//! ルールを固定順に並べ、前のルールの出力を次のルールの入力にする

use std::time::Instant;

use anyhow::Result;

use crate::config::ConverterConfig;
use crate::kansuji::rules::Rule;
use crate::kansuji::types::ConversionResult;

lazy_static::lazy_static! {
    /// 既定設定のエンジン
    static ref DEFAULT_CONVERTER: Converter = Converter::new(&ConverterConfig::default())
        .expect("既定のルールはコンパイルできる");
}

/// ルール列を繰り返す上限（置換のたびに漢数字が減るので通常 2 回で止まる）
const MAX_PASSES: usize = 4;

/// 既定設定のエンジンを取得
pub fn default_converter() -> &'static Converter {
    &DEFAULT_CONVERTER
}

/// 漢数字変換エンジン（構築後は不変、スレッド間で共有可）
#[derive(Debug)]
pub struct Converter {
    rules: Vec<Rule>,
}

impl Converter {
    /// 設定からルール列を構築する
    ///
    /// 順序：分数 → 助数詞 → パーセント → 箇月 → 第 → 前 → 枝番号 → 大きな数 → 箇月の後始末。
    /// 大きな数のルールは助数詞のルールより後でなければならない
    pub fn new(config: &ConverterConfig) -> Result<Self> {
        // 空の助数詞は数字だけにマッチして序数より先に区切りを入れてしまう
        let mut config = config.clone();
        config.sanitize();

        let mut rules = Vec::with_capacity(config.unit_suffixes.len() + 8);

        rules.push(Rule::fraction()?);
        for suffix in &config.unit_suffixes {
            rules.push(Rule::unit(suffix)?);
        }
        rules.push(Rule::percentage()?);
        rules.push(Rule::month_counter()?);
        rules.push(Rule::ordinal(&config.ordinal_exclusions)?);
        rules.push(Rule::preceding(&config.preceding_exclusions)?);
        rules.push(Rule::clause_branch(&config.branch_exclusions)?);
        rules.push(Rule::large_number()?);
        rules.push(Rule::month_counter_cleanup()?);

        tracing::debug!("変換ルールを構築しました: {} 件", rules.len());
        Ok(Self { rules })
    }

    /// 適用順のルール列
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// テキスト中の漢数字を変換する
    pub fn convert(&self, text: &str) -> String {
        self.convert_detailed(text).text
    }

    /// 置換記録付きで変換する
    ///
    /// 純関数、失敗しない（変換できない部分は原文のまま残る）
    pub fn convert_detailed(&self, text: &str) -> ConversionResult {
        let start = Instant::now();

        if text.is_empty() {
            return ConversionResult::unchanged(String::new(), 0);
        }

        let mut applied = Vec::new();
        let mut current = text.to_string();

        // 大きな数のルールが出した算用数字は枝番号の目印になりうるので、変化がなくなるまで回す
        for _ in 0..MAX_PASSES {
            let pass_start = applied.len();
            for rule in &self.rules {
                let before = applied.len();
                current = rule.apply(&current, &mut applied);
                if applied.len() > before {
                    tracing::debug!(
                        "ルール {:?}({}) を適用: {} 件",
                        rule.kind(),
                        rule.label(),
                        applied.len() - before
                    );
                }
            }
            if applied.len() == pass_start {
                break;
            }
        }

        let elapsed_us = start.elapsed().as_micros() as u64;
        let changed = current != text;

        ConversionResult {
            text: current,
            changed,
            applied,
            elapsed_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kansuji::types::RuleKind;

    fn convert(text: &str) -> String {
        default_converter().convert(text)
    }

    #[test]
    fn test_fraction() {
        assert_eq!(convert("三分の二"), "2/3");
        assert_eq!(convert("二分の一以上"), "1/2以上");
        assert_eq!(convert("千分の五"), "5/1,000");
    }

    #[test]
    fn test_units_with_grouping() {
        assert_eq!(convert("千二百三十四円"), "1,234円");
        assert_eq!(convert("資本金の額が五億円"), "資本金の額が500,000,000円");
        assert_eq!(convert("一年以上十年以下の懲役"), "1年以上10年以下の懲役");
        assert_eq!(convert("十二月三十一日"), "12月31日");
        assert_eq!(convert("四親等内の親族"), "4親等内の親族");
        assert_eq!(convert("二以上の"), "2以上の");
    }

    #[test]
    fn test_unit_rule_takes_priority_over_large_number() {
        assert_eq!(convert("二十万人"), "200,000人");
        let result = default_converter().convert_detailed("二十万人");
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].rule, RuleKind::Unit);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(convert("三・五パーセント"), "3.5%");
        assert_eq!(convert("百分の二十五又は二十パーセント"), "25/100又は20%");
    }

    #[test]
    fn test_month_counter() {
        assert_eq!(convert("三箇月"), "3か月");
        assert_eq!(convert("箇月"), "か月");
        assert_eq!(convert("十二箇月間"), "12か月間");
        assert_eq!(convert("各箇月ごと"), "各か月ごと");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(convert("第十五条"), "第15条");
        assert_eq!(convert("第三者"), "第三者");
        assert_eq!(convert("第三債務者"), "第三債務者");
        assert_eq!(convert("第三条の二第一項"), "第3条の2第1項");
        assert_eq!(convert("第百二十三条"), "第123条");
    }

    #[test]
    fn test_preceding() {
        assert_eq!(convert("前二条の規定"), "前2条の規定");
        assert_eq!(convert("前各号"), "前各号");
        assert_eq!(convert("前一般"), "前一般");
    }

    #[test]
    fn test_clause_branches() {
        assert_eq!(convert("第三十二条の二の三"), "第32条の2の3");
        assert_eq!(convert("第二章の二"), "第2章の2");
    }

    #[test]
    fn test_large_number() {
        assert_eq!(convert("三万五千"), "35,000");
        assert_eq!(convert("一万二千三百四十五"), "12,345");
        assert_eq!(convert("一二三"), "一二三");
    }

    #[test]
    fn test_plain_text_untouched() {
        let result = default_converter().convert_detailed("この法律は、公布の日から施行する。");
        assert!(!result.changed);
        assert!(result.applied.is_empty());

        let empty = default_converter().convert_detailed("");
        assert!(!empty.changed);
        assert_eq!(empty.text, "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "第三条の二第一項に規定する千二百三十四円",
            "三分の二以上の多数",
            "三・五パーセント",
            "二十万人を超える",
            "六箇月以内に第三者に対し",
            "前二条の規定は、一億二千万を超えるときは適用しない。",
            "一億の一",
            "二十万の三",
            "三万五千の二",
        ];
        for sample in samples {
            let once = convert(sample);
            let twice = convert(&once);
            assert_eq!(once, twice, "入力: {}", sample);
        }
    }

    #[test]
    fn test_branch_after_large_number() {
        assert_eq!(convert("一億の一"), "100,000,000の1");
        assert_eq!(convert("二十万の三"), "200,000の3");
        assert_eq!(convert("三万五千の二"), "35,000の2");

        let result = default_converter().convert_detailed("二十万の三");
        let kinds: Vec<RuleKind> = result.applied.iter().map(|r| r.rule).collect();
        assert_eq!(kinds, vec![RuleKind::LargeNumber, RuleKind::ClauseBranch]);
    }

    #[test]
    fn test_empty_unit_suffix_is_ignored() {
        let config = ConverterConfig {
            unit_suffixes: vec![String::new(), "円".to_string()],
            ..ConverterConfig::default()
        };
        let converter = Converter::new(&config).unwrap();
        assert_eq!(converter.convert("第千二百条"), "第1200条");
        assert_eq!(converter.convert("千二百円"), "1,200円");
    }

    #[test]
    fn test_detailed_records_in_order() {
        let result = default_converter().convert_detailed("第三条の二に定める三分の一");
        assert!(result.changed);
        assert_eq!(result.text, "第3条の2に定める1/3");
        let kinds: Vec<RuleKind> = result.applied.iter().map(|r| r.rule).collect();
        assert_eq!(
            kinds,
            vec![RuleKind::Fraction, RuleKind::Ordinal, RuleKind::ClauseBranch]
        );
    }

    #[test]
    fn test_custom_exclusions() {
        let config = ConverterConfig {
            ordinal_exclusions: Vec::new(),
            ..ConverterConfig::default()
        };
        let converter = Converter::new(&config).unwrap();
        assert_eq!(converter.convert("第三者"), "第3者");
    }

    #[test]
    fn test_custom_units() {
        let config = ConverterConfig {
            unit_suffixes: vec!["円".to_string()],
            ..ConverterConfig::default()
        };
        let converter = Converter::new(&config).unwrap();
        assert_eq!(converter.convert("三人に各五円"), "三人に各5円");
        // 助数詞から外すと大きな数のルールで拾われる
        assert_eq!(converter.convert("二十万人"), "200,000人");
    }

    #[test]
    fn test_rule_order() {
        let kinds: Vec<RuleKind> = default_converter().rules().iter().map(|r| r.kind()).collect();
        assert_eq!(kinds.first(), Some(&RuleKind::Fraction));
        assert_eq!(kinds.last(), Some(&RuleKind::MonthCounterCleanup));
        let large = kinds.iter().position(|k| *k == RuleKind::LargeNumber).unwrap();
        let last_unit = kinds.iter().rposition(|k| *k == RuleKind::Unit).unwrap();
        assert!(last_unit < large);
    }
}
