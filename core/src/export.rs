//! PDF rendering of the yearly report.

use std::ops::Range;

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::{AttendanceError, Result};
use crate::service::dto::{ReportDto, REPORT_COLUMNS};

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_X: i64 = 40;
const PAGE_TOP: i64 = 800;
const PAGE_BOTTOM: i64 = 60;
const FIRST_TABLE_TOP: i64 = 690;
const ROW_HEIGHT: i64 = 20;
const CELL_PAD: i64 = 6;
const COLUMN_X: [i64; 5] = [40, 150, 260, 370, 460];
const TABLE_RIGHT: i64 = 555;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Renders `report` as a paginated A4 document.
pub fn render_pdf(report: &ReportDto, generated_on: NaiveDate) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    });

    let pages = paginate(
        report.rows.len(),
        rows_fitting(FIRST_TABLE_TOP),
        rows_fitting(PAGE_TOP),
    );
    let page_count = pages.len();

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(page_count);
    for (index, range) in pages.into_iter().enumerate() {
        let mut ops = Vec::new();
        let table_top = if index == 0 {
            write_heading(&mut ops, report, generated_on);
            FIRST_TABLE_TOP
        } else {
            PAGE_TOP
        };
        write_table(&mut ops, report, range, table_top);
        text(
            &mut ops,
            FONT_REGULAR,
            9,
            MARGIN_X,
            PAGE_BOTTOM - 25,
            &format!("Page {} of {}", index + 1, page_count),
        );

        let content = Content { operations: ops }
            .encode()
            .map_err(|e| AttendanceError::Render(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    let kids: Vec<Object> = page_ids.into_iter().map(Object::from).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AttendanceError::Render(e.to_string()))?;
    Ok(buffer)
}

/// Splits `rows` into page-sized ranges. There is always at least one page.
pub fn paginate(rows: usize, first_page: usize, per_page: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut capacity = first_page.max(1);
    loop {
        let end = (start + capacity).min(rows);
        pages.push(start..end);
        if end >= rows {
            return pages;
        }
        start = end;
        capacity = per_page.max(1);
    }
}

// Body rows that fit under `top`, leaving one row for the header.
fn rows_fitting(top: i64) -> usize {
    ((top - PAGE_BOTTOM) / ROW_HEIGHT - 1).max(1) as usize
}

fn write_heading(ops: &mut Vec<Operation>, report: &ReportDto, generated_on: NaiveDate) {
    text(ops, FONT_BOLD, 16, MARGIN_X, PAGE_TOP, &report.title());
    text(
        ops,
        FONT_REGULAR,
        10,
        MARGIN_X,
        PAGE_TOP - 20,
        &format!("Generated on: {}", generated_on.format("%B %-d, %Y")),
    );
    text(ops, FONT_BOLD, 12, MARGIN_X, PAGE_TOP - 45, "Summary:");
    text(
        ops,
        FONT_REGULAR,
        10,
        MARGIN_X + 10,
        PAGE_TOP - 62,
        &format!("Average Attendance: {}%", report.average_attendance),
    );
    text(
        ops,
        FONT_REGULAR,
        10,
        MARGIN_X + 10,
        PAGE_TOP - 77,
        &format!("Target Achievement: {}", report.target_line()),
    );
}

fn write_table(ops: &mut Vec<Operation>, report: &ReportDto, rows: Range<usize>, top: i64) {
    write_row(ops, FONT_BOLD, &REPORT_COLUMNS, top);
    for (offset, row) in report.rows[rows].iter().enumerate() {
        let row_top = top - ROW_HEIGHT * (offset as i64 + 1);
        write_row(ops, FONT_REGULAR, &row.cells(), row_top);
    }
}

fn write_row(ops: &mut Vec<Operation>, font: &str, cells: &[&str; 5], row_top: i64) {
    let bottom = row_top - ROW_HEIGHT;
    for (i, cell) in cells.iter().enumerate() {
        let x = COLUMN_X[i];
        let right = COLUMN_X.get(i + 1).copied().unwrap_or(TABLE_RIGHT);
        ops.push(Operation::new(
            "re",
            vec![
                Object::Integer(x),
                Object::Integer(bottom),
                Object::Integer(right - x),
                Object::Integer(ROW_HEIGHT),
            ],
        ));
        ops.push(Operation::new("S", vec![]));
        text(ops, font, 9, x + CELL_PAD, bottom + CELL_PAD, cell);
    }
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(value)]));
    ops.push(Operation::new("ET", vec![]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::dto::ReportRow;
    use crate::usecase::yearly::YearlySummary;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    #[test]
    fn test_paginate() {
        assert_eq!(paginate(0, 10, 20), vec![0..0]);
        assert_eq!(paginate(12, 31, 36), vec![0..12]);
        assert_eq!(paginate(50, 31, 36), vec![0..31, 31..50]);
        assert_eq!(paginate(100, 31, 36), vec![0..31, 31..67, 67..100]);
    }

    #[test]
    fn test_yearly_report_fits_one_page() {
        let report = ReportDto::from_summary(&YearlySummary::build(2025, Vec::new()).unwrap());
        let generated_on = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let bytes = render_pdf(&report, generated_on).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, "Attendance Report - 2025"));
        assert!(contains(&bytes, "Generated on: June 2, 2025"));
        assert!(contains(&bytes, "Target Achievement: 0 of 12 months met target"));
        assert!(contains(&bytes, "Target Status"));
        assert!(contains(&bytes, "December"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_reports_span_pages() {
        let row = ReportRow::from_record(&crate::model::record::MonthlyRecord::empty(
            "2025-01".parse().unwrap(),
        ));
        let report = ReportDto {
            year: 2025,
            average_attendance: 0,
            months_above_target: 0,
            rows: vec![row; 40],
        };
        let bytes = render_pdf(&report, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert!(contains(&bytes, "Page 2 of 2"));
    }
}
