//! フォーム入力（引数 + 対話入力）

use crate::error::{MintError, Result};
use blueprint_mint_common::{FormInput, ImageFile, ValidationResult};
use dialoguer::{Confirm, Input};
use std::path::{Path, PathBuf};

/// コマンドライン引数で渡された値
#[derive(Debug, Clone, Default)]
pub struct FormArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file: Option<PathBuf>,
}

pub fn load_image(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(MintError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageFile::new(file_name, bytes))
}

/// 引数からフォームを組み立てる（未指定の項目は空のまま）
pub fn build_form(args: &FormArgs) -> Result<FormInput> {
    let file = match &args.file {
        Some(path) => Some(load_image(path)?),
        None => None,
    };

    Ok(FormInput {
        title: args.title.clone().unwrap_or_default(),
        description: args.description.clone().unwrap_or_default(),
        file,
    })
}

/// 不正な項目だけ対話入力し直す
pub fn prompt_invalid(mut input: FormInput, validation: &ValidationResult) -> Result<FormInput> {
    if !validation.title_valid {
        input.title = Input::<String>::new()
            .with_prompt("Title")
            .allow_empty(true)
            .interact_text()?;
    }

    if !validation.description_valid {
        input.description = Input::<String>::new()
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?;
    }

    if !validation.file_valid {
        let path: String = Input::<String>::new()
            .with_prompt("Image")
            .allow_empty(true)
            .interact_text()?;
        let path = path.trim();
        input.file = if path.is_empty() {
            None
        } else {
            match load_image(Path::new(path)) {
                Ok(file) => Some(file),
                Err(e) => {
                    // 画像なしとして検証に任せる
                    println!("⚠ {}", e);
                    None
                }
            }
        };
    }

    Ok(input)
}

/// 再送信するかどうか
pub fn confirm_retry() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("再送信しますか?")
        .default(true)
        .interact()?)
}
