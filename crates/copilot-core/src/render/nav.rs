use serde::Serialize;

pub const BRAND: &str = "Job Search Copilot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Session,
    History,
    Resume,
    Sidebar,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Session, Page::History, Page::Resume, Page::Sidebar];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Session => "Session",
            Page::History => "History",
            Page::Resume => "Resume",
            Page::Sidebar => "Sidebar",
        }
    }

    pub fn href(&self) -> &'static str {
        match self {
            Page::Session => "/pages/session",
            Page::History => "/pages/history",
            Page::Resume => "/pages/resume",
            Page::Sidebar => "/pages/sidebar",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub current: bool,
}

/// Navigation bar shown on every page.
#[derive(Debug, Clone, Serialize)]
pub struct Navigation {
    pub brand: &'static str,
    pub links: Vec<NavLink>,
}

impl Navigation {
    pub fn for_page(current: Page) -> Self {
        Self {
            brand: BRAND,
            links: Page::ALL
                .iter()
                .map(|p| NavLink {
                    label: p.label(),
                    href: p.href(),
                    current: *p == current,
                })
                .collect(),
        }
    }
}
