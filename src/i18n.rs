use serde_json::Value;

use crate::language::Language;
use crate::storage::{KeyValueStore, SYSTEM_LANGUAGE_KEY, StorageError};

/// UI strings for one display language.
#[derive(Debug)]
pub struct Texts {
    pub app_title: &'static str,
    pub app_subtitle: &'static str,

    pub system_language: &'static str,
    pub output_language: &'static str,

    pub not_pr_page: &'static str,
    pub not_pr_page_desc: &'static str,
    pub how_to_use: &'static str,
    pub how_to_steps: [&'static str; 4],

    pub config_error: &'static str,
    pub config_error_desc: &'static str,
    pub generation_failed: &'static str,
    pub cannot_generate: &'static str,
    pub no_commits: &'static str,
    pub error_occurred: &'static str,
    pub check_api_config: &'static str,

    pub api_base_url: &'static str,
    pub api_key: &'static str,
    pub model_name: &'static str,
    pub config_name: &'static str,
    pub active_config: &'static str,
    pub cannot_delete_last: &'static str,
    pub new_config: &'static str,
    pub not_set: &'static str,

    pub generating: &'static str,
    pub pr_ready: &'static str,
    pub form_filled: &'static str,
}

pub fn texts(lang: Language) -> &'static Texts {
    match lang {
        Language::ZhCn => &ZH_CN,
        Language::ZhTw => &ZH_TW,
        Language::En => &EN,
        Language::Ja => &JA,
        Language::Ko => &KO,
    }
}

/// The persisted UI language, or the default when unset or unrecognized.
pub fn load_system_language(kv: &dyn KeyValueStore) -> Result<Language, StorageError> {
    let stored = kv.get(SYSTEM_LANGUAGE_KEY)?;
    let Some(tag) = stored.as_ref().and_then(Value::as_str) else {
        return Ok(Language::default());
    };
    Ok(tag.parse().unwrap_or_else(|e| {
        log::warn!("Ignoring stored system language: {e}");
        Language::default()
    }))
}

pub fn save_system_language(
    kv: &mut dyn KeyValueStore,
    lang: Language,
) -> Result<(), StorageError> {
    kv.set(SYSTEM_LANGUAGE_KEY, Value::String(lang.tag().to_string()))
}

static ZH_CN: Texts = Texts {
    app_title: "PR GPT",
    app_subtitle: "AI 驱动的 PR 生成器",

    system_language: "系统语言",
    output_language: "PR 语言",

    not_pr_page: "这不是 GitHub PR 页面",
    not_pr_page_desc: "请在 GitHub PR 创建页面使用此工具",
    how_to_use: "使用方法:",
    how_to_steps: [
        "打开你的 GitHub 仓库",
        "点击 \"Pull requests\" 标签",
        "点击 \"New pull request\" 并选择要比较的分支",
        "将比较页面的 URL 传给 prgpt generate --url",
    ],

    config_error: "配置错误",
    config_error_desc: "请先配置 API 设置（运行 prgpt profile update）",
    generation_failed: "生成 PR 失败",
    cannot_generate: "无法生成标题",
    no_commits: "未找到提交信息或无法访问页面内容",
    error_occurred: "发生错误",
    check_api_config: "请检查你的 API 配置是否正确。",

    api_base_url: "API 基础 URL",
    api_key: "API 密钥",
    model_name: "模型名称",
    config_name: "配置名称",
    active_config: "当前配置",
    cannot_delete_last: "无法删除最后一个配置",
    new_config: "新配置",
    not_set: "未设置",

    generating: "正在生成...",
    pr_ready: "PR 内容已生成",
    form_filled: "已写入",
};

static ZH_TW: Texts = Texts {
    app_title: "PR GPT",
    app_subtitle: "AI 驅動的 PR 生成器",

    system_language: "系統語言",
    output_language: "PR 語言",

    not_pr_page: "這不是 GitHub PR 頁面",
    not_pr_page_desc: "請在 GitHub PR 創建頁面使用此工具",
    how_to_use: "使用方法:",
    how_to_steps: [
        "打開你的 GitHub 倉庫",
        "點擊 \"Pull requests\" 標籤",
        "點擊 \"New pull request\" 並選擇要比較的分支",
        "將比較頁面的 URL 傳給 prgpt generate --url",
    ],

    config_error: "配置錯誤",
    config_error_desc: "請先配置 API 設定（執行 prgpt profile update）",
    generation_failed: "生成 PR 失敗",
    cannot_generate: "無法生成標題",
    no_commits: "未找到提交信息或無法訪問頁面內容",
    error_occurred: "發生錯誤",
    check_api_config: "請檢查你的 API 配置是否正確。",

    api_base_url: "API 基礎 URL",
    api_key: "API 密鑰",
    model_name: "模型名稱",
    config_name: "配置名稱",
    active_config: "當前配置",
    cannot_delete_last: "無法刪除最後一個配置",
    new_config: "新配置",
    not_set: "未設定",

    generating: "正在生成...",
    pr_ready: "PR 內容已生成",
    form_filled: "已寫入",
};

static EN: Texts = Texts {
    app_title: "PR GPT",
    app_subtitle: "AI-Powered PR Generator",

    system_language: "System Language",
    output_language: "PR Language",

    not_pr_page: "Not a GitHub PR Page",
    not_pr_page_desc: "Please use this tool with a GitHub PR creation page",
    how_to_use: "How to use prgpt:",
    how_to_steps: [
        "Navigate to your GitHub repository",
        "Click on the \"Pull requests\" tab",
        "Click \"New pull request\" and select branches to compare",
        "Pass the compare page URL to prgpt generate --url",
    ],

    config_error: "Configuration Error",
    config_error_desc: "Please configure API settings first (run prgpt profile update)",
    generation_failed: "PR Generation Failed",
    cannot_generate: "Unable to Generate Title",
    no_commits: "No commit messages found or unable to access page content",
    error_occurred: "An error occurred",
    check_api_config: "Please check that your API configuration is correct.",

    api_base_url: "API Base URL",
    api_key: "API Key",
    model_name: "Model Name",
    config_name: "Config Name",
    active_config: "Active Config",
    cannot_delete_last: "Cannot delete the last configuration",
    new_config: "New Config",
    not_set: "not set",

    generating: "Generating...",
    pr_ready: "Pull Request Generated",
    form_filled: "Written to",
};

static JA: Texts = Texts {
    app_title: "PR GPT",
    app_subtitle: "AI駆動のPRジェネレーター",

    system_language: "システム言語",
    output_language: "PR言語",

    not_pr_page: "GitHub PRページではありません",
    not_pr_page_desc: "このツールはGitHub PR作成ページでご使用ください",
    how_to_use: "使い方:",
    how_to_steps: [
        "GitHubリポジトリを開く",
        "\"Pull requests\" タブをクリック",
        "\"New pull request\" をクリックして比較するブランチを選択",
        "比較ページのURLを prgpt generate --url に渡す",
    ],

    config_error: "設定エラー",
    config_error_desc: "まずAPI設定を行ってください（prgpt profile update を実行）",
    generation_failed: "PR生成に失敗しました",
    cannot_generate: "タイトルを生成できません",
    no_commits: "コミット情報が見つからないか、ページコンテンツにアクセスできません",
    error_occurred: "エラーが発生しました",
    check_api_config: "API設定が正しいか確認してください。",

    api_base_url: "APIベースURL",
    api_key: "APIキー",
    model_name: "モデル名",
    config_name: "設定名",
    active_config: "現在の設定",
    cannot_delete_last: "最後の設定は削除できません",
    new_config: "新しい設定",
    not_set: "未設定",

    generating: "生成中...",
    pr_ready: "PRが生成されました",
    form_filled: "書き込み先",
};

static KO: Texts = Texts {
    app_title: "PR GPT",
    app_subtitle: "AI 기반 PR 생성기",

    system_language: "시스템 언어",
    output_language: "PR 언어",

    not_pr_page: "GitHub PR 페이지가 아닙니다",
    not_pr_page_desc: "GitHub PR 생성 페이지에서 이 도구를 사용하세요",
    how_to_use: "사용 방법:",
    how_to_steps: [
        "GitHub 저장소로 이동",
        "\"Pull requests\" 탭 클릭",
        "\"New pull request\"를 클릭하고 비교할 브랜치 선택",
        "비교 페이지 URL을 prgpt generate --url 에 전달",
    ],

    config_error: "구성 오류",
    config_error_desc: "먼저 API 설정을 구성하세요 (prgpt profile update 실행)",
    generation_failed: "PR 생성 실패",
    cannot_generate: "제목을 생성할 수 없습니다",
    no_commits: "커밋 메시지를 찾을 수 없거나 페이지 콘텐츠에 액세스할 수 없습니다",
    error_occurred: "오류가 발생했습니다",
    check_api_config: "API 구성이 올바른지 확인하세요.",

    api_base_url: "API 기본 URL",
    api_key: "API 키",
    model_name: "모델 이름",
    config_name: "설정 이름",
    active_config: "현재 설정",
    cannot_delete_last: "마지막 설정은 삭제할 수 없습니다",
    new_config: "새 설정",
    not_set: "설정되지 않음",

    generating: "생성 중...",
    pr_ready: "PR이 생성되었습니다",
    form_filled: "저장 위치",
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn every_language_has_complete_texts() {
        for lang in Language::ALL {
            let t = texts(lang);
            for s in [
                t.app_subtitle,
                t.config_error,
                t.config_error_desc,
                t.generation_failed,
                t.no_commits,
                t.cannot_delete_last,
                t.generating,
            ] {
                assert!(!s.trim().is_empty(), "empty text for {lang}");
            }
            assert!(t.how_to_steps.iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn lookup_is_keyed_by_language() {
        assert_eq!(texts(Language::En).config_error, "Configuration Error");
        assert_eq!(texts(Language::ZhCn).config_error, "配置错误");
        assert_eq!(texts(Language::Ko).cannot_delete_last, "마지막 설정은 삭제할 수 없습니다");
    }

    #[test]
    fn system_language_round_trips_through_store() {
        let mut kv = MemoryStore::default();
        assert_eq!(load_system_language(&kv).unwrap(), Language::ZhCn);

        save_system_language(&mut kv, Language::Ja).unwrap();
        assert_eq!(kv.get(SYSTEM_LANGUAGE_KEY).unwrap(), Some(Value::from("ja")));
        assert_eq!(load_system_language(&kv).unwrap(), Language::Ja);

        kv.set(SYSTEM_LANGUAGE_KEY, Value::from("klingon")).unwrap();
        assert_eq!(load_system_language(&kv).unwrap(), Language::ZhCn);
    }
}
