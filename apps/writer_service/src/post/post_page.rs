use askama::Template;
use xhs_llm::PostDraft;

pub const PAGE_TITLE: &str = "爆款小红书AI写作助手";
pub const MISSING_API_KEY: &str = "请输入你的API密钥";
pub const MISSING_THEME: &str = "请输入小红书文案的主题";

pub fn generation_failed(reason: &str) -> String {
    format!("生成内容时出现错误：{}", reason)
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct PostPage<'a> {
    pub title: &'a str,
    pub api_key_help_url: &'a str,
    pub theme: &'a str,
    pub error: Option<String>,
    pub draft: Option<&'a PostDraft>,
}

impl<'a> PostPage<'a> {
    pub fn new(api_key_help_url: &'a str) -> Self {
        Self {
            title: PAGE_TITLE,
            api_key_help_url,
            theme: "",
            error: None,
            draft: None,
        }
    }

    pub fn with_theme(mut self, theme: &'a str) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_draft(mut self, draft: &'a PostDraft) -> Self {
        self.draft = Some(draft);
        self
    }
}
