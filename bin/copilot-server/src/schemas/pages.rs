use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SidebarQuery {
    /// URL of the page the sidebar was opened on.
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub hide_applied: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Raw input; clamped before use.
    pub days_back: Option<String>,
    #[serde(default)]
    pub hide_applied: bool,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResumeQuery {
    #[serde(default)]
    pub edit: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResumeForm {
    pub markdown: String,
}
