use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{report::Report, writer::format_measure};

/// Long-form plain-text view of a report: one line per bucket, measures
/// right-aligned.
pub fn render_report(report: &Report) -> String {
    let headers = [
        "field".to_string(),
        "kind".to_string(),
        "bucket".to_string(),
        if report.normalized { "pct" } else { "count" }.to_string(),
    ];
    let rows = report
        .fields
        .iter()
        .flat_map(|field| {
            field.buckets.iter().map(move |bucket| {
                [
                    field.name.clone(),
                    field.kind.to_string(),
                    bucket.label.clone(),
                    format_measure(&bucket.measure),
                ]
            })
        })
        .collect::<Vec<_>>();

    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_report(report: &Report) {
    print!("{}", render_report(report));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let last = widths.len().saturating_sub(1);
    let cells = values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (value, width))| {
            let cell = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(&cell)));
            if idx == last {
                format!("{padding}{cell}")
            } else {
                format!("{cell}{padding}")
            }
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
