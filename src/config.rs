// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::kansuji::rules::{
    DEFAULT_BRANCH_EXCLUSIONS, DEFAULT_ORDINAL_EXCLUSIONS, DEFAULT_PRECEDING_EXCLUSIONS,
    DEFAULT_UNIT_SUFFIXES,
};

// ============================================================================
// 変換ルール設定
// ============================================================================

/// 変換ルールの語リスト
///
/// 除外語は法令の言い回しに合わせた列挙なので、文法規則ではなく設定として持つ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// 助数詞（列挙順に適用）
    #[serde(default = "default_unit_suffixes")]
    pub unit_suffixes: Vec<String>,
    /// 「第〜」の直後に来たら変換しない語
    #[serde(default = "default_ordinal_exclusions")]
    pub ordinal_exclusions: Vec<String>,
    /// 「前〜」の直後に来たら変換しない語
    #[serde(default = "default_preceding_exclusions")]
    pub preceding_exclusions: Vec<String>,
    /// 枝番号（条の二など）の直後に来たら変換しない語
    #[serde(default = "default_branch_exclusions")]
    pub branch_exclusions: Vec<String>,
}

fn to_owned_list(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_unit_suffixes() -> Vec<String> {
    to_owned_list(DEFAULT_UNIT_SUFFIXES)
}

fn default_ordinal_exclusions() -> Vec<String> {
    to_owned_list(DEFAULT_ORDINAL_EXCLUSIONS)
}

fn default_preceding_exclusions() -> Vec<String> {
    to_owned_list(DEFAULT_PRECEDING_EXCLUSIONS)
}

fn default_branch_exclusions() -> Vec<String> {
    to_owned_list(DEFAULT_BRANCH_EXCLUSIONS)
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            unit_suffixes: default_unit_suffixes(),
            ordinal_exclusions: default_ordinal_exclusions(),
            preceding_exclusions: default_preceding_exclusions(),
            branch_exclusions: default_branch_exclusions(),
        }
    }
}

impl ConverterConfig {
    /// JSON ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("設定を読み込みます: {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("設定ファイルを読めません: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("設定ファイルの形式が不正です: {}", path.display()))
    }

    /// JSON 文字列から読み込む（欠けたフィールドは既定値）
    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut config: ConverterConfig = serde_json::from_str(content)?;
        config.sanitize();
        Ok(config)
    }

    /// 前後の空白を除き、空要素と重複を落とす（順序は保つ）
    pub fn sanitize(&mut self) {
        sanitize_list("unit_suffixes", &mut self.unit_suffixes);
        sanitize_list("ordinal_exclusions", &mut self.ordinal_exclusions);
        sanitize_list("preceding_exclusions", &mut self.preceding_exclusions);
        sanitize_list("branch_exclusions", &mut self.branch_exclusions);
    }
}

fn sanitize_list(field: &str, list: &mut Vec<String>) {
    let mut seen = HashSet::new();
    let original_len = list.len();
    let cleaned: Vec<String> = list
        .iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty() && seen.insert(entry.clone()))
        .collect();
    if cleaned.len() != original_len {
        tracing::warn!(
            "{}: 空または重複した項目を {} 件除外しました",
            field,
            original_len - cleaned.len()
        );
    }
    *list = cleaned;
}
