//! Minimal PDF 1.4 writer for the summary snapshot: a centered title followed
//! by heading/body sections, flowing onto further A4 pages when needed.
//! Text uses the standard Helvetica fonts, so only printable ASCII survives;
//! anything else is written as `?`.

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Title,
    Heading,
    Body,
}

impl Style {
    fn size(self) -> f32 {
        match self {
            Style::Title => TITLE_SIZE,
            Style::Heading => HEADING_SIZE,
            Style::Body => BODY_SIZE,
        }
    }

    fn line_height(self) -> f32 {
        match self {
            Style::Title => 20.0,
            Style::Heading => 16.0,
            Style::Body => 12.0,
        }
    }

    fn font(self) -> &'static str {
        match self {
            Style::Title | Style::Heading => "F2",
            Style::Body => "F1",
        }
    }

    fn chars_per_line(self) -> usize {
        ((PAGE_WIDTH - 2.0 * MARGIN) / (self.size() * GLYPH_WIDTH)) as usize
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotPdf {
    title: String,
    sections: Vec<(String, String)>,
}

impl SnapshotPdf {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, heading: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push((heading.into(), body.into()));
        self
    }

    pub fn render(&self) -> Vec<u8> {
        let pages = self.layout();
        write_document(&pages).into_bytes()
    }

    /// Place every line, starting a new page whenever the cursor would pass
    /// the bottom margin. Returns the content stream of each page.
    fn layout(&self) -> Vec<String> {
        let mut pages = Vec::new();
        let mut current = String::new();
        let mut y = PAGE_HEIGHT - MARGIN;

        let mut place = |style: Style, text: &str, gap_after: f32| {
            for line in wrap(text, style.chars_per_line()) {
                if y - style.line_height() < MARGIN {
                    pages.push(std::mem::take(&mut current));
                    y = PAGE_HEIGHT - MARGIN;
                }
                y -= style.line_height();
                let x = if style == Style::Title {
                    let width = line.len() as f32 * style.size() * GLYPH_WIDTH;
                    ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
                } else {
                    MARGIN
                };
                current.push_str(&format!(
                    "BT /{} {} Tf {:.1} {:.1} Td ({}) Tj ET\n",
                    style.font(),
                    style.size(),
                    x,
                    y,
                    escape(&line)
                ));
            }
            y -= gap_after;
        };

        place(Style::Title, &self.title, 6.0);
        for (heading, body) in &self.sections {
            place(Style::Heading, heading, 0.0);
            place(Style::Body, body, 3.0);
        }

        pages.push(current);
        pages
    }
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if matches!(c, '\\' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Greedy word wrap; words longer than a line are split. Always yields at
/// least one line so empty text still takes vertical space.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in sanitize_lines(text) {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(width);
                lines.push(word);
                word = rest;
            }
            if !line.is_empty() && line.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn sanitize_lines(text: &str) -> Vec<String> {
    text.lines().map(sanitize).collect()
}

fn write_document(pages: &[String]) -> String {
    let page_count = pages.len();
    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
    ];

    for (i, content) in pages.iter().enumerate() {
        let content_id = 6 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    out
}
