// 条番号クエリ
//
// キー入力で溜めた "12 3" のような数字列から、見出しの表示と検索語を作る。
// ページ上の探索・ハイライトは呼び出し側の責務

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::kansuji::{to_full_width, to_japanese_numeral};

/// 条番号（"12 3" → 第12条の3）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleQuery {
    /// 条の番号
    pub article: u64,
    /// 枝番号（の二、の三…）
    pub branches: Vec<u64>,
}

/// 見出しテキスト中の一致位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleMatch {
    /// 一致した検索語
    pub target: String,
    /// 空白とカンマを除いたテキスト上の文字位置
    pub offset: usize,
}

impl ArticleQuery {
    /// 空白区切りの数字列を解釈する（全角数字・全角空白も可）
    ///
    /// 数字でない部分があれば `None`
    pub fn parse(input: &str) -> Option<Self> {
        let folded: String = input.nfkc().collect();
        let mut parts = folded.split_whitespace().map(|p| p.parse::<u64>().ok());
        let article = parts.next()??;
        let branches = parts.collect::<Option<Vec<u64>>>()?;
        Some(Self { article, branches })
    }

    /// 表示用（第12条の3）
    pub fn label(&self) -> String {
        self.render(|n| n.to_string())
    }

    /// 半角・全角・漢数字の順の検索語
    pub fn search_targets(&self) -> [String; 3] {
        [
            self.label(),
            self.render(|n| to_full_width(&n.to_string())),
            self.render(to_japanese_numeral),
        ]
    }

    /// 見出しテキストから検索語を探す
    ///
    /// 検索語の直後に数字や「の」が続く一致（第1条 に対する 第12条・第1条の2）は採らない。
    /// 先頭での一致があればそれを、なければ最初の一致を返す
    pub fn locate(&self, text: &str) -> Option<ArticleMatch> {
        self.locate_lines([text]).map(|(_, found)| found)
    }

    /// 複数の見出し（行）から探す。戻り値の行番号は 0 始まり
    ///
    /// 検索語ごとに全行を調べ、行頭で一致する見出しを本文中の参照より優先する。
    /// どの行にも一致しない検索語は次の検索語に回す
    pub fn locate_lines<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Option<(usize, ArticleMatch)> {
        let normalized: Vec<String> = lines.into_iter().map(strip_separators).collect();

        for target in self.search_targets() {
            let mut first: Option<(usize, ArticleMatch)> = None;
            for (line_idx, line) in normalized.iter().enumerate() {
                let Some(offset) = find_target(line, &target) else {
                    continue;
                };
                let found = ArticleMatch {
                    target: target.clone(),
                    offset,
                };
                if offset == 0 {
                    return Some((line_idx, found));
                }
                if first.is_none() {
                    first = Some((line_idx, found));
                }
            }
            if first.is_some() {
                return first;
            }
        }
        None
    }

    fn render(&self, number: impl Fn(u64) -> String) -> String {
        let mut result = format!("第{}条", number(self.article));
        for branch in &self.branches {
            result.push('の');
            result.push_str(&number(*branch));
        }
        result
    }
}

/// 空白とカンマを除く
fn strip_separators(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .collect()
}

/// 数字が続かない最初の一致の文字位置（一致が先頭にあれば必ずそれになる）
fn find_target(normalized: &str, target: &str) -> Option<usize> {
    normalized
        .match_indices(target)
        .map(|(index, _)| index)
        .find(|&index| {
            !normalized[index + target.len()..]
                .chars()
                .next()
                .is_some_and(continues_number)
        })
        .map(|index| normalized[..index].chars().count())
}

fn continues_number(ch: char) -> bool {
    ch.is_ascii_digit() || ('０'..='９').contains(&ch) || ch == 'の'
}
