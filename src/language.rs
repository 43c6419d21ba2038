use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Languages prgpt can write PR text in, and display its own messages in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "ko")]
    Ko,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown language '{0}' (expected one of: zh-CN, zh-TW, en, ja, ko)")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub const ALL: [Language; 5] = [
        Language::ZhCn,
        Language::ZhTw,
        Language::En,
        Language::Ja,
        Language::Ko,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Language::ZhCn => "zh-CN",
            Language::ZhTw => "zh-TW",
            Language::En => "en",
            Language::Ja => "ja",
            Language::Ko => "ko",
        }
    }

    /// Sentence placed in the system prompt to pin the output language.
    pub fn prompt_directive(&self) -> &'static str {
        match self {
            Language::ZhCn => "请使用简体中文",
            Language::ZhTw => "請使用繁體中文",
            Language::En => "Please use English",
            Language::Ja => "日本語を使用してください",
            Language::Ko => "한국어를 사용해주세요",
        }
    }

    /// Native name, shown in language pickers regardless of UI language.
    pub fn label(&self) -> &'static str {
        match self {
            Language::ZhCn => "简体中文",
            Language::ZhTw => "繁體中文",
            Language::En => "English",
            Language::Ja => "日本語",
            Language::Ko => "한국어",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
