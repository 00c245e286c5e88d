pub mod report;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::client::CaInfo;
use crate::controller::PageView;
use crate::status::{format_date, CertStatus};

/// Shown in the fingerprint slot until the roots endpoint provides one.
pub const FINGERPRINT_PENDING: &str = "Loading...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// Escapes text for interpolation into element content or quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One table row, with every field already resolved to display text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub name: String,
    pub serial: String,
    pub valid_from: String,
    pub valid_until: String,
    pub status: CertStatus,
    pub status_class: &'static str,
    pub status_text: String,
}

pub fn build_rows(page: &PageView, now: DateTime<Utc>) -> Vec<RowView> {
    page.items
        .iter()
        .map(|cert| {
            let status = CertStatus::classify(&cert.valid_until, now);
            RowView {
                name: cert.display_name().unwrap_or("Unknown").to_string(),
                serial: cert.serial().unwrap_or("N/A").to_string(),
                valid_from: format_date(&cert.valid_from),
                valid_until: format_date(&cert.valid_until),
                status,
                status_class: status.css_class(),
                status_text: status.label(),
            }
        })
        .collect()
}

/// Text shown in place of rows when the page is empty.
pub fn empty_message(search_term: &str) -> String {
    if search_term.is_empty() {
        "No certificates issued yet".to_string()
    } else {
        format!("No domains matching \"{search_term}\"")
    }
}

/// Everything the dashboard page displays, keyed by element id.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    pub fingerprint: String,
    #[serde(rename = "validUntil")]
    pub valid_until: String,
    #[serde(rename = "caStatus")]
    pub ca_status: String,
    #[serde(rename = "healthOk")]
    pub health_ok: bool,
    #[serde(rename = "domainsBody")]
    pub domains_body: String,
    #[serde(rename = "searchInput")]
    pub search_input: String,
    #[serde(rename = "sortLabel")]
    pub sort_label: String,
    #[serde(rename = "thSortIndicator")]
    pub th_sort_indicator: String,
    #[serde(rename = "sortIcon")]
    pub sort_icon: String,
    #[serde(rename = "prevBtn")]
    pub prev_disabled: bool,
    #[serde(rename = "nextBtn")]
    pub next_disabled: bool,
    #[serde(rename = "pageInfo")]
    pub page_info: String,
    #[serde(rename = "totalItems")]
    pub total_items: String,
    pub rows: Vec<RowView>,
    #[serde(skip)]
    pub empty_message: Option<String>,
}

impl DashboardView {
    pub fn build(ca: &CaInfo, page: &PageView, now: DateTime<Utc>) -> Self {
        let rows = build_rows(page, now);
        let empty_message = rows
            .is_empty()
            .then(|| empty_message(&page.search_term));
        Self {
            fingerprint: ca
                .fingerprint
                .clone()
                .unwrap_or_else(|| FINGERPRINT_PENDING.to_string()),
            valid_until: ca.valid_until.to_string(),
            ca_status: ca.status.to_string(),
            health_ok: ca.health_ok,
            domains_body: report::render_rows(&rows, &page.search_term),
            search_input: page.search_term.clone(),
            sort_label: page.sort_order.label(),
            th_sort_indicator: page.sort_order.arrow().to_string(),
            sort_icon: report::render_sort_icon(page.sort_order),
            prev_disabled: page.prev_disabled,
            next_disabled: page.next_disabled,
            page_info: page.page_info(),
            total_items: page.total_items_label(),
            rows,
            empty_message,
        }
    }
}

pub fn render_json(view: &DashboardView) -> Vec<u8> {
    serde_json::to_vec_pretty(view).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(view: &DashboardView) -> Vec<u8> {
    report::render_document(view)
}

fn colored_status(row: &RowView) -> String {
    let text = format!("{:<16}", row.status_text);
    match row.status {
        CertStatus::Expired => text.as_str().red().bold().to_string(),
        CertStatus::Expiring { .. } => text.as_str().yellow().bold().to_string(),
        CertStatus::Valid => text.as_str().green().to_string(),
        CertStatus::Unknown => text.as_str().dimmed().to_string(),
    }
}

pub fn render_text(view: &DashboardView) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&format!(
        ":: {:<12}: {}\n",
        "CA Status",
        view.ca_status.as_str().green().bold()
    ));
    out.push_str(&format!(":: {:<12}: {}\n", "Root", view.fingerprint));
    out.push_str(&format!(":: {:<12}: {}\n", "Valid Until", view.valid_until));
    if !view.search_input.is_empty() {
        out.push_str(&format!(":: {:<12}: {}\n", "Search", view.search_input));
    }
    out.push('\n');

    let name_width = view
        .rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("DOMAIN".len());
    out.push_str(&format!(
        "{:<name_width$}  {:<16}  {:<12}  {:<12}  {}\n",
        "DOMAIN".bold(),
        "SERIAL".bold(),
        "VALID FROM".bold(),
        view.sort_label.as_str().bold(),
        "STATUS".bold(),
    ));

    match view.empty_message.as_deref() {
        Some(message) => {
            out.push_str(&format!("{}\n", message.dimmed()));
            out.push_str(&format!(
                "{}\n",
                "Use step CLI or ACME to request certificates".dimmed()
            ));
        }
        None => {
            for row in &view.rows {
                out.push_str(&format!(
                    "{:<name_width$}  {:<16}  {:<12}  {:<12}  {}\n",
                    row.name,
                    row.serial,
                    row.valid_from,
                    row.valid_until,
                    colored_status(row),
                ));
            }
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "{} {} {}{}\n",
        view.page_info,
        view.total_items,
        if view.prev_disabled { "" } else { "[prev] " },
        if view.next_disabled { "" } else { "[next]" },
    ));
    out.into_bytes()
}
