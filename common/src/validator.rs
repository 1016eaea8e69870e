//! フォーム入力の検証
//!
//! 3項目すべてを毎回検査する（途中で打ち切らない）。
//! どれか1つでも不正なら以降のアップロード・ウォレット・送信は行わない。

use crate::types::FormInput;

/// 項目ごとの妥当性フラグ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub title_valid: bool,
    pub description_valid: bool,
    pub file_valid: bool,
}

impl Default for ValidationResult {
    /// 初期表示ではエラーを出さない
    fn default() -> Self {
        Self {
            title_valid: true,
            description_valid: true,
            file_valid: true,
        }
    }
}

impl ValidationResult {
    pub fn has_error(&self) -> bool {
        !(self.title_valid && self.description_valid && self.file_valid)
    }

    /// 不正な項目のエラーメッセージ
    pub fn messages(&self) -> Vec<&'static str> {
        let mut messages = Vec::new();
        if !self.title_valid {
            messages.push("Title must not be empty");
        }
        if !self.description_valid {
            messages.push("Description must not be empty");
        }
        if !self.file_valid {
            messages.push("Image is missing!");
        }
        messages
    }
}

pub fn validate(input: &FormInput) -> ValidationResult {
    ValidationResult {
        title_valid: !input.title.trim().is_empty(),
        description_valid: !input.description.trim().is_empty(),
        file_valid: input.file.is_some(),
    }
}
