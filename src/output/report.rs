use super::{empty_message, escape_html, DashboardView, RowView};
use crate::controller::SortOrder;

const EMPTY_HINT: &str = "Use step CLI or ACME to request certificates";

pub fn render_sort_icon(order: SortOrder) -> String {
    format!(r#"<path d="{}"/>"#, order.icon_path())
}

pub fn render_ca_status(status: &str) -> String {
    format!(
        r#"<span class="status-dot"></span> {}"#,
        escape_html(status)
    )
}

fn render_empty_row(search_term: &str) -> String {
    let message = escape_html(&empty_message(search_term));
    format!(
        r#"
        <tr class="empty-row">
            <td colspan="5">
                <div class="empty-icon">&#x1F4DC;</div>
                <p>{message}</p>
                <p class="empty-hint">{EMPTY_HINT}</p>
            </td>
        </tr>
"#
    )
}

fn render_row(row: &RowView) -> String {
    format!(
        r#"
        <tr>
            <td>
                <span class="domain-name">{name}</span>
            </td>
            <td>
                <span class="serial-number">{serial}</span>
            </td>
            <td>{valid_from}</td>
            <td>{valid_until}</td>
            <td>
                <span class="status-badge {class}">
                    <span class="status-dot"></span>
                    {status}
                </span>
            </td>
        </tr>
"#,
        name = escape_html(&row.name),
        serial = escape_html(&row.serial),
        valid_from = escape_html(&row.valid_from),
        valid_until = escape_html(&row.valid_until),
        class = row.status_class,
        status = escape_html(&row.status_text),
    )
}

/// Markup for the `domainsBody` table body.
pub fn render_rows(rows: &[RowView], search_term: &str) -> String {
    if rows.is_empty() {
        return render_empty_row(search_term);
    }
    rows.iter().map(render_row).collect()
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

pub fn render_document(view: &DashboardView) -> Vec<u8> {
    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>TinyCA - Certificate Authority</title>
  <style>
    body {{ font-family: 'Inter', sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; }}
    main {{ max-width: 1100px; margin: 0 auto; padding: 40px 24px; }}
    .card {{ background: #1e293b; border: 1px solid #334155; border-radius: 16px; padding: 20px; margin-bottom: 24px; }}
    .cert-status.active {{ color: #34d399; }}
    .status-dot {{ display: inline-block; width: 8px; height: 8px; border-radius: 9999px; background: currentColor; margin-right: 6px; }}
    table {{ width: 100%; border-collapse: collapse; }}
    th, td {{ text-align: left; padding: 12px 16px; border-bottom: 1px solid #334155; }}
    .serial-number {{ font-family: monospace; font-size: 0.85rem; }}
    .status-badge.valid {{ color: #34d399; }}
    .status-badge.expiring {{ color: #fbbf24; }}
    .status-badge.expired {{ color: #f87171; }}
    .empty-row td {{ text-align: center; padding: 40px; }}
    .empty-icon {{ font-size: 2rem; margin-bottom: 16px; }}
    .empty-hint {{ font-size: 0.85rem; margin-top: 8px; }}
    .pagination {{ display: flex; align-items: center; justify-content: space-between; margin-top: 16px; }}
  </style>
</head>
<body>
  <main>
    <section class="card">
      <h1>TinyCA</h1>
      <dl>
        <dt>Status</dt>
        <dd><span id="caStatus" class="cert-status active">{ca_status}</span></dd>
        <dt>Root Fingerprint</dt>
        <dd><code id="fingerprint">{fingerprint}</code></dd>
        <dt>Valid Until</dt>
        <dd><span id="validUntil">{valid_until}</span></dd>
      </dl>
    </section>

    <section class="card">
      <div class="toolbar">
        <input id="searchInput" type="text" placeholder="Search domains or serials..." value="{search}"/>
        <button id="sortBtn" type="button">
          <svg id="sortIcon" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">{sort_icon}</svg>
          <span id="sortLabel">{sort_label}</span>
        </button>
      </div>
      <table>
        <thead>
          <tr>
            <th>Domain</th>
            <th>Serial</th>
            <th>Valid From</th>
            <th>Valid Until <span id="thSortIndicator">{th_sort}</span></th>
            <th>Status</th>
          </tr>
        </thead>
        <tbody id="domainsBody">{body}</tbody>
      </table>
      <div class="pagination">
        <button id="prevBtn" type="button"{prev_disabled}>Previous</button>
        <span><span id="pageInfo">{page_info}</span> <span id="totalItems">{total_items}</span></span>
        <button id="nextBtn" type="button"{next_disabled}>Next</button>
      </div>
    </section>
  </main>
</body>
</html>
"####,
        ca_status = render_ca_status(&view.ca_status),
        fingerprint = escape_html(&view.fingerprint),
        valid_until = escape_html(&view.valid_until),
        search = escape_html(&view.search_input),
        sort_icon = view.sort_icon,
        sort_label = escape_html(&view.sort_label),
        th_sort = escape_html(&view.th_sort_indicator),
        body = view.domains_body,
        prev_disabled = disabled_attr(view.prev_disabled),
        next_disabled = disabled_attr(view.next_disabled),
        page_info = escape_html(&view.page_info),
        total_items = escape_html(&view.total_items),
    );
    html.into_bytes()
}
