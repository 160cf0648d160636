//! Server-rendered pages.
//!
//! Templates are compiled into the binary and rendered with minijinja.
//! Every template name ends in `.html`, so output is HTML-escaped unless a
//! value is explicitly marked `|safe` (only the rendered resume Markdown).

pub mod nav;

pub use nav::{Navigation, Page};

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::host::Tab;
use crate::markdown;
use crate::viewer::{HistoryPage, SessionRow};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("row_header.html", include_str!("../../templates/row_header.html")),
    ("job_row.html", include_str!("../../templates/job_row.html")),
    ("job_detail.html", include_str!("../../templates/job_detail.html")),
    ("session.html", include_str!("../../templates/session.html")),
    ("history.html", include_str!("../../templates/history.html")),
    ("resume.html", include_str!("../../templates/resume.html")),
    ("sidebar.html", include_str!("../../templates/sidebar.html")),
];

#[derive(Debug, Error)]
#[error("template error: {0}")]
pub struct RenderError(#[from] minijinja::Error);

#[derive(Debug, Serialize)]
pub struct SessionContext<'a> {
    pub rows: &'a [SessionRow],
    pub hide_applied: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryContext<'a> {
    pub days_back: u32,
    pub hide_applied: bool,
    pub rows: &'a [crate::viewer::history::HistoryRow],
    pub error: Option<String>,
}

impl<'a> HistoryContext<'a> {
    pub fn loaded(page: &'a HistoryPage) -> Self {
        Self {
            days_back: page.days_back,
            hide_applied: page.hide_applied,
            rows: &page.rows,
            error: None,
        }
    }

    pub fn failed(days_back: u32, hide_applied: bool, error: impl ToString) -> Self {
        Self {
            days_back,
            hide_applied,
            rows: &[],
            error: Some(error.to_string()),
        }
    }
}

/// Resume editor state.
#[derive(Debug, Default, Serialize)]
pub struct ResumeContext {
    pub markdown: String,
    /// Rendered `markdown`; empty when there is nothing to show.
    pub html: String,
    pub editing: bool,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl ResumeContext {
    pub fn viewing(markdown_src: String) -> Self {
        Self {
            html: markdown::render(&markdown_src),
            markdown: markdown_src,
            ..Default::default()
        }
    }

    pub fn editing(markdown_src: String) -> Self {
        Self {
            markdown: markdown_src,
            editing: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SidebarContext<'a> {
    /// URL of the page the sidebar was opened on.
    pub url: Option<&'a str>,
    pub tabs: &'a [Tab],
    /// `url` when no known tab shows it.
    pub extra_url: Option<&'a str>,
    pub latest: Option<&'a SessionRow>,
    pub latest_error: Option<&'a str>,
    pub credits: Option<String>,
}

impl<'a> SidebarContext<'a> {
    pub fn new(url: Option<&'a str>, tabs: &'a [Tab]) -> Self {
        let extra_url = url.filter(|u| !tabs.iter().any(|t| t.url == *u));
        Self {
            url,
            tabs,
            extra_url,
            latest: None,
            latest_error: None,
            credits: None,
        }
    }
}

#[derive(Serialize)]
struct PageContext<'a, T: Serialize> {
    nav: Navigation,
    #[serde(flatten)]
    page: &'a T,
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn render<T: Serialize>(&self, template: &str, current: Page, page: &T) -> Result<String, RenderError> {
        let ctx = PageContext {
            nav: Navigation::for_page(current),
            page,
        };
        Ok(self.env.get_template(template)?.render(ctx)?)
    }

    pub fn session(&self, ctx: &SessionContext<'_>) -> Result<String, RenderError> {
        self.render("session.html", Page::Session, ctx)
    }

    pub fn history(&self, ctx: &HistoryContext<'_>) -> Result<String, RenderError> {
        self.render("history.html", Page::History, ctx)
    }

    pub fn resume(&self, ctx: &ResumeContext) -> Result<String, RenderError> {
        self.render("resume.html", Page::Resume, ctx)
    }

    pub fn sidebar(&self, ctx: &SidebarContext<'_>) -> Result<String, RenderError> {
        self.render("sidebar.html", Page::Sidebar, ctx)
    }
}
