//! Report rendering.

use crate::aggregator::Aggregate;
use chrono::NaiveDate;
use std::fmt::Write;

/// A rendered report in both formats.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub subject: String,
    pub html: String,
    pub text: String,
}

const TABLE_STYLE: &str = "border-collapse:collapse;font-family:Arial,sans-serif;font-size:13px";
const CELL_STYLE: &str = "border:1px solid #ccc;padding:4px 8px";
const HEAD_STYLE: &str = "border:1px solid #ccc;padding:4px 8px;background:#f2f2f2;text-align:left";

/// Report table columns, in order.
pub const COLUMNS: [&str; 4] = ["Symbol", "Close", "BUY strategies", "SELL strategies"];

/// Escape text for inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn heading(aggregate: &Aggregate, date: NaiveDate) -> String {
    format!(
        "{} symbols with BUY/SELL heuristic signals ({})",
        aggregate.len(),
        date.format("%Y-%m-%d")
    )
}

/// Symbols whose latest signals predate the report date.
fn stale_rows(aggregate: &Aggregate, date: NaiveDate) -> Vec<String> {
    aggregate
        .rows()
        .iter()
        .filter(|row| row.as_of != date)
        .map(|row| format!("{} as of {}", row.symbol, row.as_of.format("%Y-%m-%d")))
        .collect()
}

/// Render the aggregate for `date`.
pub fn render(aggregate: &Aggregate, date: NaiveDate, subject_prefix: &str) -> Report {
    Report {
        subject: format!("{} - {}", subject_prefix, date.format("%Y-%m-%d")),
        html: render_html(aggregate, date),
        text: render_text(aggregate, date),
    }
}

fn render_html(aggregate: &Aggregate, date: NaiveDate) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<html><body>");
    let _ = writeln!(html, "<h3>{}</h3>", escape_html(&heading(aggregate, date)));

    if aggregate.is_empty() {
        let _ = writeln!(html, "<p>No BUY/SELL signals.</p>");
    } else {
        let _ = writeln!(html, "<table style=\"{TABLE_STYLE}\">");
        let _ = write!(html, "<tr>");
        for title in COLUMNS {
            let _ = write!(html, "<th style=\"{HEAD_STYLE}\">{title}</th>");
        }
        let _ = writeln!(html, "</tr>");

        for row in aggregate.rows() {
            let cells = [
                row.symbol.clone(),
                row.close.to_string(),
                row.buy.join(", "),
                row.sell.join(", "),
            ];
            let _ = write!(html, "<tr>");
            for cell in &cells {
                let _ = write!(html, "<td style=\"{CELL_STYLE}\">{}</td>", escape_html(cell));
            }
            let _ = writeln!(html, "</tr>");
        }
        let _ = writeln!(html, "</table>");

        let stale = stale_rows(aggregate, date);
        if !stale.is_empty() {
            let _ = writeln!(html, "<p><small>{}</small></p>", escape_html(&stale.join("; ")));
        }
    }

    let _ = writeln!(html, "</body></html>");
    html
}

fn render_text(aggregate: &Aggregate, date: NaiveDate) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", heading(aggregate, date));
    let _ = writeln!(text);

    if aggregate.is_empty() {
        let _ = writeln!(text, "No BUY/SELL signals.");
        return text;
    }

    let [symbol, close, buy, sell] = COLUMNS;
    let _ = writeln!(text, "{symbol:<10} {close:>10}  {buy:<30} {sell}");
    for row in aggregate.rows() {
        let dash = |v: &[String]| if v.is_empty() { "-".to_string() } else { v.join(", ") };
        let _ = writeln!(
            text,
            "{:<10} {:>10}  {:<30} {}",
            row.symbol,
            row.close.to_string(),
            dash(&row.buy),
            dash(&row.sell)
        );
    }

    let stale = stale_rows(aggregate, date);
    if !stale.is_empty() {
        let _ = writeln!(text);
        let _ = writeln!(text, "{}", stale.join("; "));
    }
    text
}
