//! 收据渲染
//!
//! 根据收据明细生成 PDF (超出一页时自动分页)，以及邮件主题与正文。

pub mod pdf;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::ReceiptLine;

use crate::orders::money::{to_decimal, to_f64};
pub use pdf::PdfReceiptBuilder;

pub const RECEIPT_TITLE: &str = "Organic Shop Receipt";
pub const RECEIPT_SUBJECT: &str = "Your Organic Shop Receipt";
pub const RECEIPT_FILENAME: &str = "receipt.pdf";
const THANK_YOU: &str = "Thank you for shopping with us!";

/// 金额显示: 四舍五入到分，去掉多余的零 (650, 650.5, 19.99)
pub fn format_amount(amount: f64) -> String {
    to_f64(to_decimal(amount)).to_string()
}

fn line_amount(line: &ReceiptLine) -> f64 {
    to_f64(to_decimal(line.price) * Decimal::from(line.quantity))
}

/// 渲染 PDF 收据
pub fn render_receipt(lines: &[ReceiptLine], amount: f64, date: DateTime<Utc>) -> Vec<u8> {
    let mut pdf = PdfReceiptBuilder::new();
    pdf.font_size(25.0)
        .centered(RECEIPT_TITLE)
        .move_down()
        .font_size(14.0)
        .line(&format!("Date: {}", date.format("%Y-%m-%d")))
        .line(&format!("Total Amount: Rs. {}", format_amount(amount)))
        .move_down()
        .line("Order Details:");

    for line in lines {
        pdf.line(&format!(
            "{} x {} - Rs. {}",
            line.name,
            line.quantity,
            format_amount(line_amount(line))
        ));
    }

    pdf.move_down().centered(THANK_YOU);

    if pdf.page_count() > 1 {
        tracing::debug!(
            pages = pdf.page_count(),
            lines = lines.len(),
            "Receipt spans multiple pages"
        );
    }
    pdf.build()
}

/// 收据邮件正文
pub fn receipt_email_body(amount: f64) -> String {
    format!(
        "Thank you for your order!\nTotal: Rs. {}",
        format_amount(amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(name: &str, quantity: u32, price: f64) -> ReceiptLine {
        ReceiptLine {
            name: name.to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(650.0), "650");
        assert_eq!(format_amount(650.5), "650.5");
        assert_eq!(format_amount(19.999), "20");
        assert_eq!(format_amount(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_receipt_contains_all_lines() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let pdf = render_receipt(
            &[line("Honey", 2, 650.0), line("Jaggery (1kg)", 1, 120.5)],
            1420.5,
            date,
        );
        let text = String::from_utf8(pdf).unwrap();

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("(Organic Shop Receipt) Tj"));
        assert!(text.contains("(Date: 2026-10-19) Tj"));
        assert!(text.contains("(Total Amount: Rs. 1420.5) Tj"));
        assert!(text.contains("(Order Details:) Tj"));
        assert!(text.contains("(Honey x 2 - Rs. 1300) Tj"));
        assert!(text.contains("(Jaggery \\(1kg\\) x 1 - Rs. 120.5) Tj"));
        assert!(text.contains("(Thank you for shopping with us!) Tj"));
        assert_eq!(text.matches("/Type /Page ").count(), 1);
    }

    #[test]
    fn test_large_receipt_lists_every_item() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let lines: Vec<ReceiptLine> = (0..50)
            .map(|i| line(&format!("Item{i}"), 1, 10.0))
            .collect();

        let text = String::from_utf8(render_receipt(&lines, 500.0, date)).unwrap();

        let missing: Vec<usize> = (0..50)
            .filter(|i| !text.contains(&format!("(Item{i} x 1 - Rs. 10) Tj")))
            .collect();
        assert!(missing.is_empty(), "missing items: {missing:?}");
        assert!(text.contains("(Thank you for shopping with us!) Tj"));

        let pages = text.matches("/Type /Page ").count();
        assert!(pages >= 2);
        assert!(text.contains(&format!("/Count {pages}")));
    }

    #[test]
    fn test_email_body() {
        assert_eq!(
            receipt_email_body(650.0),
            "Thank you for your order!\nTotal: Rs. 650"
        );
    }
}
