//! Multi-page PDF builder
//!
//! Fluent API over a PDF 1.4 content stream using the base-14 Helvetica font.
//! Only printable ASCII is rendered; other characters become `?`.

/// A4 in points
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 72.0;

/// Line spacing relative to font size
const LINE_GAP: f32 = 1.2;

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126, WinAnsiEncoding
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Replace characters the base-14 font cannot show
pub fn to_printable_ascii(s: &str) -> String {
    s.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

/// Escape a printable-ASCII string for PDF literal string syntax
pub fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Width of `s` in points at `font_size` (printable ASCII expected)
pub fn text_width(s: &str, font_size: f32) -> f32 {
    let units: u32 = s
        .bytes()
        .map(|b| match b {
            32..=126 => HELVETICA_WIDTHS[(b - 32) as usize] as u32,
            _ => 556,
        })
        .sum();
    units as f32 * font_size / 1000.0
}

/// PDF receipt builder
///
/// The cursor starts at the top margin and moves down one line per text call.
/// Text that no longer fits above the bottom margin opens a new page.
pub struct PdfReceiptBuilder {
    /// Finished page content streams
    pages: Vec<String>,
    content: String,
    font_size: f32,
    cursor_y: f32,
}

impl Default for PdfReceiptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReceiptBuilder {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            content: String::with_capacity(2048),
            font_size: 12.0,
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    // === Style ===

    pub fn font_size(&mut self, size: f32) -> &mut Self {
        self.font_size = size;
        self
    }

    // === Text Output ===

    /// Left-aligned line at the margin
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.place(s, |_| MARGIN)
    }

    /// Line centered between the margins
    pub fn centered(&mut self, s: &str) -> &mut Self {
        self.place(s, |width| {
            (MARGIN + (PAGE_WIDTH - 2.0 * MARGIN - width) / 2.0).max(MARGIN)
        })
    }

    /// Blank line at the current font size
    pub fn move_down(&mut self) -> &mut Self {
        self.cursor_y -= self.line_height();
        self
    }

    /// Pages in the finished document
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    fn line_height(&self) -> f32 {
        self.font_size * LINE_GAP
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.content));
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    fn place(&mut self, s: &str, x_for_width: impl Fn(f32) -> f32) -> &mut Self {
        // 空白页上的首行总是写入，避免超大字号时无限分页
        if self.cursor_y - self.font_size < MARGIN && !self.content.is_empty() {
            self.new_page();
        }
        let baseline = self.cursor_y - self.font_size;

        let text = to_printable_ascii(s);
        let x = x_for_width(text_width(&text, self.font_size));
        self.content.push_str(&format!(
            "BT /F1 {:.2} Tf {:.2} {:.2} Td ({}) Tj ET\n",
            self.font_size,
            x,
            baseline,
            escape_pdf_string(&text)
        ));
        self.cursor_y -= self.line_height();
        self
    }

    // === Build ===

    /// Serialize the document
    ///
    /// | 对象 | 内容 |
    /// |------|------|
    /// | 1 | Catalog |
    /// | 2 | Pages (`/Kids`, `/Count`) |
    /// | 3 | Helvetica font |
    /// | 4 + 2k | Page k |
    /// | 5 + 2k | Page k content stream |
    pub fn build(&self) -> Vec<u8> {
        let streams: Vec<&str> = self
            .pages
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.content.as_str()))
            .collect();

        let kids = (0..streams.len())
            .map(|k| format!("{} 0 R", 4 + 2 * k))
            .collect::<Vec<_>>()
            .join(" ");

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", streams.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (k, stream) in streams.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.2} {PAGE_HEIGHT:.2}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * k
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}endstream",
                stream.len(),
                stream
            ));
        }

        let body_len: usize = streams.iter().map(|s| s.len()).sum();
        let mut out = String::with_capacity(body_len + 512 * objects.len());
        out.push_str("%PDF-1.4\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref_offset = out.len();
        out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            out.push_str(&format!("{offset:010} 00000 n \n"));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));

        out.into_bytes()
    }
}
