// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::fmt;

/// Splits field text into index tokens. The same analyzer must be used at
/// index time and query time.
pub trait Analyzer: Send + Sync + fmt::Debug {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Lower-cases and splits on anything that is not a letter or digit.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardAnalyzer;

impl Analyzer for StandardAnalyzer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}
