use serde::{Deserialize, Serialize};

use crate::model::Certificate;

pub const ITEMS_PER_PAGE: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "asc")]
    Ascending,
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }

    pub fn label(self) -> String {
        format!("Valid Until {}", self.arrow())
    }

    /// SVG path data for the sort button icon.
    pub fn icon_path(self) -> &'static str {
        match self {
            Self::Ascending => "M12 19V5M5 12l7-7 7 7",
            Self::Descending => "M12 5v14M5 12l7 7 7-7",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub all_certificates: Vec<Certificate>,
    pub filtered_certificates: Vec<Certificate>,
    pub current_page: usize,
    pub sort_order: SortOrder,
    pub search_text: String,
}

/// One rendered page of the filtered view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub items: Vec<Certificate>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub sort_order: SortOrder,
    /// Trimmed search text, original case.
    pub search_term: String,
}

impl PageView {
    pub fn page_info(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }

    pub fn total_items_label(&self) -> String {
        format!("({} items)", self.total_items)
    }
}

pub fn total_pages(total_items: usize) -> usize {
    total_items.div_ceil(ITEMS_PER_PAGE).max(1)
}

/// Owns the view state. Every mutation goes through `load`, `search`,
/// `toggle_sort` or the page cursor methods, each of which returns the page
/// to display.
#[derive(Clone, Debug)]
pub struct CertificateListController {
    state: ViewState,
}

impl Default for CertificateListController {
    fn default() -> Self {
        Self::new(SortOrder::default())
    }
}

impl CertificateListController {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            state: ViewState {
                current_page: 1,
                sort_order,
                ..ViewState::default()
            },
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Replaces the working set and shows the first page.
    pub fn load(&mut self, certificates: Vec<Certificate>) -> PageView {
        self.state.all_certificates = certificates;
        self.state.current_page = 1;
        self.apply_filters_and_sort()
    }

    pub fn search(&mut self, text: &str) -> PageView {
        self.state.search_text = text.to_string();
        self.state.current_page = 1;
        self.apply_filters_and_sort()
    }

    pub fn toggle_sort(&mut self) -> PageView {
        self.state.sort_order = self.state.sort_order.toggled();
        self.state.current_page = 1;
        self.apply_filters_and_sort()
    }

    pub fn prev_page(&mut self) -> PageView {
        if self.state.current_page > 1 {
            self.state.current_page -= 1;
        }
        self.render_current_page()
    }

    pub fn next_page(&mut self) -> PageView {
        if self.state.current_page < total_pages(self.state.filtered_certificates.len()) {
            self.state.current_page += 1;
        }
        self.render_current_page()
    }

    /// Jumps to `page`; out-of-range values are clamped by the render.
    pub fn go_to_page(&mut self, page: usize) -> PageView {
        self.state.current_page = page;
        self.render_current_page()
    }

    pub fn apply_filters_and_sort(&mut self) -> PageView {
        let term = self.state.search_text.trim().to_lowercase();

        let mut filtered: Vec<Certificate> = if term.is_empty() {
            self.state.all_certificates.clone()
        } else {
            self.state
                .all_certificates
                .iter()
                .filter(|c| c.matches(&term))
                .cloned()
                .collect()
        };

        // stable: equal expiries keep their input order
        match self.state.sort_order {
            SortOrder::Ascending => filtered.sort_by_key(|c| c.valid_until.sort_key()),
            SortOrder::Descending => {
                filtered.sort_by(|a, b| b.valid_until.sort_key().cmp(&a.valid_until.sort_key()))
            }
        }

        tracing::debug!(
            total = self.state.all_certificates.len(),
            matched = filtered.len(),
            order = ?self.state.sort_order,
            "recomputed certificate view"
        );

        self.state.filtered_certificates = filtered;
        self.render_current_page()
    }

    pub fn render_current_page(&mut self) -> PageView {
        let total_items = self.state.filtered_certificates.len();
        let total_pages = total_pages(total_items);
        self.state.current_page = self.state.current_page.clamp(1, total_pages);

        let start = (self.state.current_page - 1) * ITEMS_PER_PAGE;
        let end = (start + ITEMS_PER_PAGE).min(total_items);
        let items = self
            .state
            .filtered_certificates
            .get(start..end)
            .map(<[Certificate]>::to_vec)
            .unwrap_or_default();

        PageView {
            items,
            current_page: self.state.current_page,
            total_pages,
            total_items,
            prev_disabled: self.state.current_page <= 1,
            next_disabled: self.state.current_page >= total_pages,
            sort_order: self.state.sort_order,
            search_term: self.state.search_text.trim().to_string(),
        }
    }
}
