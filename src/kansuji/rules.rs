//! 変換ルール定義
//!
//! 各ルールは「数字スパンのパターン」「後続テキストのガード」「置換動作」の組。
//! ルールはテキスト全体を走査し、置換後のテキストを次のルールに渡す。

use aho_corasick::{AhoCorasick, Anchored, Input, StartKind};
use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::kansuji::numeral::{group_thousands, is_numeral_char, parse_named, parse_value};
use crate::kansuji::types::{Replacement, RuleKind};

/// 数字・単位の文字クラス
pub(crate) const NUMERAL_CLASS: &str = "[〇一二三四五六七八九十百千万億兆]";
/// 小数点付きの文字クラス（パーセント用）
pub(crate) const NUMERAL_DOT_CLASS: &str = "[〇一二三四五六七八九十百千万億兆・]";
/// 枝番号の前に来る文字（条・項・章・節・款・目 または算用数字）
const BRANCH_MARKER_CLASS: &str = "[条項章節款目0-9]";

/// 助数詞（この順に 1 つずつ適用する）
pub const DEFAULT_UNIT_SUFFIXES: &[&str] = &[
    "円", "年", "月", "日", "人", "割", "週", "期", "親等", "個", "歳", "犯", "回", "以上",
];
/// 「第」の直後に来たら変換しない語
pub const DEFAULT_ORDINAL_EXCLUSIONS: &[&str] = &["取得者", "債務者", "者", "方", "般"];
/// 「前」の直後に来たら変換しない語
pub const DEFAULT_PRECEDING_EXCLUSIONS: &[&str] = &["方", "般"];
/// 枝番号の直後に来たら変換しない語
pub const DEFAULT_BRANCH_EXCLUSIONS: &[&str] = &["方", "般"];

/// 後続テキストのガード
///
/// 次の文字が数字でなく、かつ除外語で始まらないときだけ通す
#[derive(Debug)]
pub struct TrailingGuard {
    exclusions: Option<AhoCorasick>,
}

impl TrailingGuard {
    pub fn new(words: &[String]) -> Result<Self> {
        let words: Vec<&str> = words
            .iter()
            .map(|w| w.as_str())
            .filter(|w| !w.is_empty())
            .collect();
        let exclusions = if words.is_empty() {
            None
        } else {
            let automaton = AhoCorasick::builder()
                .start_kind(StartKind::Anchored)
                .build(&words)
                .context("除外語の辞書を構築できません")?;
            Some(automaton)
        };
        Ok(Self { exclusions })
    }

    /// `rest` はマッチ直後からのテキスト
    pub fn allows(&self, rest: &str) -> bool {
        if rest.chars().next().is_some_and(is_numeral_char) {
            return false;
        }
        match &self.exclusions {
            Some(automaton) => automaton
                .find(Input::new(rest).anchored(Anchored::Yes))
                .is_none(),
            None => true,
        }
    }
}

/// 置換動作
#[derive(Debug)]
enum Action {
    /// 分母・分子の順のキャプチャを "分子/分母" にする
    Fraction,
    /// 3 桁区切りの値 + 接尾辞
    Suffix { suffix: String },
    /// 接頭辞 + 区切りなしの値
    Keyword { keyword: String },
    /// 目印 + "の" 区切りの枝番号
    ClauseBranch,
    /// マッチ全体を命数法で読んで 3 桁区切り
    LargeNumber,
    /// 固定文字列に置換
    Literal { replacement: String },
}

/// 変換ルール
#[derive(Debug)]
pub struct Rule {
    kind: RuleKind,
    label: String,
    pattern: Regex,
    guard: Option<TrailingGuard>,
    action: Action,
}

impl Rule {
    fn compile(
        kind: RuleKind,
        label: &str,
        pattern: &str,
        guard: Option<TrailingGuard>,
        action: Action,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("ルール {} のパターンをコンパイルできません", label))?;
        Ok(Self {
            kind,
            label: label.to_string(),
            pattern,
            guard,
            action,
        })
    }

    /// 三分の二 → 2/3
    pub fn fraction() -> Result<Self> {
        Self::compile(
            RuleKind::Fraction,
            "分の",
            &format!("({c}+)分の({c}+)", c = NUMERAL_CLASS),
            None,
            Action::Fraction,
        )
    }

    /// 千二百三十四円 → 1,234円
    pub fn unit(suffix: &str) -> Result<Self> {
        Self::compile(
            RuleKind::Unit,
            suffix,
            &format!("({}+){}", NUMERAL_CLASS, regex::escape(suffix)),
            None,
            Action::Suffix {
                suffix: suffix.to_string(),
            },
        )
    }

    /// 三・五パーセント → 3.5%
    pub fn percentage() -> Result<Self> {
        Self::compile(
            RuleKind::Percentage,
            "パーセント",
            &format!("({}+)パーセント", NUMERAL_DOT_CLASS),
            None,
            Action::Suffix {
                suffix: "%".to_string(),
            },
        )
    }

    /// 三箇月 → 3か月
    pub fn month_counter() -> Result<Self> {
        Self::compile(
            RuleKind::MonthCounter,
            "箇月",
            &format!("({}+)箇月", NUMERAL_CLASS),
            None,
            Action::Suffix {
                suffix: "か月".to_string(),
            },
        )
    }

    /// 第十二条 → 第12条
    pub fn ordinal(exclusions: &[String]) -> Result<Self> {
        Self::keyword(RuleKind::Ordinal, "第", exclusions)
    }

    /// 前二条 → 前2条
    pub fn preceding(exclusions: &[String]) -> Result<Self> {
        Self::keyword(RuleKind::Preceding, "前", exclusions)
    }

    fn keyword(kind: RuleKind, keyword: &str, exclusions: &[String]) -> Result<Self> {
        Self::compile(
            kind,
            keyword,
            &format!("{}({}+)", regex::escape(keyword), NUMERAL_CLASS),
            Some(TrailingGuard::new(exclusions)?),
            Action::Keyword {
                keyword: keyword.to_string(),
            },
        )
    }

    /// 条の二の三 → 条の2の3
    pub fn clause_branch(exclusions: &[String]) -> Result<Self> {
        Self::compile(
            RuleKind::ClauseBranch,
            "の",
            &format!("({})((?:の{}+)+)", BRANCH_MARKER_CLASS, NUMERAL_CLASS),
            Some(TrailingGuard::new(exclusions)?),
            Action::ClauseBranch,
        )
    }

    /// 二十万 → 200,000
    pub fn large_number() -> Result<Self> {
        Self::compile(
            RuleKind::LargeNumber,
            "万億兆",
            &format!("{c}+[万億兆]{c}*", c = NUMERAL_CLASS),
            None,
            Action::LargeNumber,
        )
    }

    /// 数字を伴わない「箇月」も「か月」に揃える
    pub fn month_counter_cleanup() -> Result<Self> {
        Self::compile(
            RuleKind::MonthCounterCleanup,
            "箇月",
            "箇月",
            None,
            Action::Literal {
                replacement: "か月".to_string(),
            },
        )
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// ルールの目印（助数詞やキーワード）
    pub fn label(&self) -> &str {
        &self.label
    }

    /// テキスト全体に適用する
    ///
    /// 置換したものは `applied` に追記する
    pub fn apply(&self, text: &str, applied: &mut Vec<Replacement>) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;
        let mut search_from = 0;

        while search_from < text.len() {
            let Some(caps) = self.pattern.captures_at(text, search_from) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            match self.resolve(text, &caps) {
                Some((end, replaced)) => {
                    result.push_str(&text[last_end..whole.start()]);
                    let original = &text[whole.start()..end];
                    if replaced != original {
                        applied.push(Replacement {
                            original: original.to_string(),
                            replaced: replaced.clone(),
                            start: whole.start(),
                            end,
                            rule: self.kind,
                        });
                    }
                    result.push_str(&replaced);
                    last_end = end;
                    search_from = end;
                }
                None => {
                    // 棄却：開始位置の次の文字から探し直す
                    let skip = text[whole.start()..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    search_from = whole.start() + skip;
                }
            }
        }

        result.push_str(&text[last_end..]);
        result
    }

    fn guard_allows(&self, rest: &str) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard.allows(rest))
    }

    /// マッチを置換に変える。戻り値は（置換範囲の終端, 置換文字列）
    fn resolve(&self, text: &str, caps: &Captures<'_>) -> Option<(usize, String)> {
        let whole = caps.get(0)?;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        if let Action::ClauseBranch = self.action {
            return self.resolve_branches(text, caps);
        }
        if !self.guard_allows(&text[whole.end()..]) {
            return None;
        }

        let replaced = match &self.action {
            Action::Fraction => {
                let denominator = parse_value(group(1))?;
                let numerator = parse_value(group(2))?;
                format!("{}/{}", numerator.grouped(), denominator.grouped())
            }
            Action::Suffix { suffix } => format!("{}{}", parse_value(group(1))?.grouped(), suffix),
            Action::Keyword { keyword } => format!("{}{}", keyword, parse_value(group(1))?),
            Action::LargeNumber => match parse_named(whole.as_str()) {
                Some(value) => group_thousands(value),
                None => whole.as_str().to_string(),
            },
            Action::Literal { replacement } => replacement.clone(),
            Action::ClauseBranch => return None,
        };
        Some((whole.end(), replaced))
    }

    /// 枝番号の列を後ろから縮めながらガードを通る最長の列を探す
    fn resolve_branches(&self, text: &str, caps: &Captures<'_>) -> Option<(usize, String)> {
        let marker = caps.get(1)?;
        let run = caps.get(2)?;
        let branches: Vec<&str> = run.as_str().split('の').skip(1).collect();

        for count in (1..=branches.len()).rev() {
            let end = marker.end()
                + branches[..count]
                    .iter()
                    .map(|b| 'の'.len_utf8() + b.len())
                    .sum::<usize>();
            if !self.guard_allows(&text[end..]) {
                continue;
            }

            let mut replaced = marker.as_str().to_string();
            for branch in &branches[..count] {
                replaced.push('の');
                match parse_value(branch) {
                    Some(value) => replaced.push_str(&value.to_string()),
                    None => replaced.push_str(branch),
                }
            }
            return Some((end, replaced));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn run(rule: &Rule, text: &str) -> String {
        let mut applied = Vec::new();
        rule.apply(text, &mut applied)
    }

    #[test]
    fn test_guard_rejects_numeral_and_exclusions() {
        let guard = TrailingGuard::new(&words(DEFAULT_ORDINAL_EXCLUSIONS)).unwrap();
        assert!(guard.allows("条"));
        assert!(guard.allows(""));
        assert!(!guard.allows("者"));
        assert!(!guard.allows("取得者の"));
        assert!(!guard.allows("三条"));
        // 除外語は先頭一致のみ
        assert!(guard.allows("条の者"));
    }

    #[test]
    fn test_guard_without_words() {
        let guard = TrailingGuard::new(&[]).unwrap();
        assert!(guard.allows("者"));
        assert!(!guard.allows("十"));
    }

    #[test]
    fn test_fraction_rule() {
        let rule = Rule::fraction().unwrap();
        assert_eq!(run(&rule, "三分の二"), "2/3");
        assert_eq!(run(&rule, "議決権の百分の二十五以上"), "議決権の25/100以上");
    }

    #[test]
    fn test_unit_rule() {
        let rule = Rule::unit("円").unwrap();
        assert_eq!(run(&rule, "千二百三十四円"), "1,234円");
        assert_eq!(run(&rule, "五万円以下の罰金"), "50,000円以下の罰金");
        assert_eq!(run(&rule, "円"), "円");

        let rule = Rule::unit("親等").unwrap();
        assert_eq!(run(&rule, "三親等内"), "3親等内");
    }

    #[test]
    fn test_percentage_rule() {
        let rule = Rule::percentage().unwrap();
        assert_eq!(run(&rule, "三・五パーセント"), "3.5%");
        assert_eq!(run(&rule, "二十パーセント"), "20%");
    }

    #[test]
    fn test_ordinal_rule_guard() {
        let rule = Rule::ordinal(&words(DEFAULT_ORDINAL_EXCLUSIONS)).unwrap();
        assert_eq!(run(&rule, "第十五条"), "第15条");
        assert_eq!(run(&rule, "第三者"), "第三者");
        assert_eq!(run(&rule, "第三取得者"), "第三取得者");
        assert_eq!(run(&rule, "第一般"), "第一般");
        assert_eq!(run(&rule, "第三者及び第四条"), "第三者及び第4条");
    }

    #[test]
    fn test_ordinal_never_groups() {
        let rule = Rule::ordinal(&[]).unwrap();
        assert_eq!(run(&rule, "第千二百条"), "第1200条");
    }

    #[test]
    fn test_clause_branch_rule() {
        let rule = Rule::clause_branch(&words(DEFAULT_BRANCH_EXCLUSIONS)).unwrap();
        assert_eq!(run(&rule, "第3条の二の三"), "第3条の2の3");
        assert_eq!(run(&rule, "12の十五"), "12の15");
        assert_eq!(run(&rule, "項の一般"), "項の一般");
    }

    #[test]
    fn test_clause_branch_shrinks_to_passing_run() {
        let rule = Rule::clause_branch(&words(DEFAULT_BRANCH_EXCLUSIONS)).unwrap();
        assert_eq!(run(&rule, "5の二の三方"), "5の2の三方");
    }

    #[test]
    fn test_large_number_rule() {
        let rule = Rule::large_number().unwrap();
        assert_eq!(run(&rule, "二十万"), "200,000");
        assert_eq!(run(&rule, "一億二千万を超える"), "120,000,000を超える");
        // 大単位の前に数字がなければ対象外
        assert_eq!(run(&rule, "万一"), "万一");
    }

    #[test]
    fn test_records_replacements() {
        let rule = Rule::unit("年").unwrap();
        let mut applied = Vec::new();
        let out = rule.apply("平成三十年及び令和二年", &mut applied);
        assert_eq!(out, "平成30年及び令和2年");
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].original, "三十年");
        assert_eq!(applied[0].replaced, "30年");
        assert_eq!(applied[0].start, "平成".len());
        assert_eq!(applied[1].rule, RuleKind::Unit);
    }
}
