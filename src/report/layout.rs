//! Page model for the generated reports.
//!
//! Everything is measured in millimetres on an A4 portrait page with the
//! origin at the top-left corner; `y` grows downwards and text is placed on
//! its baseline. The PDF writer flips the axis when serializing.

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub const HEADER_HEIGHT: f32 = 40.0;
pub const CONTENT_TOP: f32 = 55.0;
pub const FOOTER_RESERVE: f32 = 30.0;
const FOOTER_BASELINE: f32 = PAGE_HEIGHT - 10.0;

const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BRAND: Rgb = Rgb(41, 128, 185);
    pub const INK: Rgb = Rgb(50, 50, 50);
    pub const MUTED: Rgb = Rgb(150, 150, 150);
}

/// The three standard Helvetica faces every PDF viewer ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub font: Font,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(size: f32, font: Font, color: Rgb) -> Self {
        Self { size, font, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        style: TextStyle,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A laid-out report, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

/// Approximate Helvetica advance width in millimetres.
pub fn text_width(text: &str, size: f32, font: Font) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
            ' ' | 'f' | 't' | 'r' | '(' | ')' | '-' | '/' => 0.33,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.83,
            c if c.is_ascii_digit() => 0.556,
            c if c.is_uppercase() => 0.67,
            _ => 0.5,
        })
        .sum();
    let weight = if font == Font::Bold { 1.06 } else { 1.0 };
    em * weight * size * PT_TO_MM
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width`.
pub fn fit_text(text: &str, style: &TextStyle, max_width: f32) -> String {
    if text_width(text, style.size, style.font) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}...", chars.iter().collect::<String>().trim_end());
        if text_width(&candidate, style.size, style.font) <= max_width {
            return candidate;
        }
    }
    String::new()
}

pub struct Column {
    pub title: String,
    pub width: f32,
}

impl Column {
    pub fn new(title: impl Into<String>, width: f32) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTheme {
    /// Alternating row shading, no cell borders.
    Striped,
    /// Every cell outlined.
    Grid,
}

pub struct Row {
    pub cells: Vec<String>,
    pub emphasized: bool,
}

impl Row {
    pub fn plain(cells: Vec<String>) -> Self {
        Self {
            cells,
            emphasized: false,
        }
    }

    pub fn emphasized(cells: Vec<String>) -> Self {
        Self {
            cells,
            emphasized: true,
        }
    }
}

pub const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 2.0;
const STRIPE: Rgb = Rgb(245, 245, 245);
const GRID_LINE: Stroke = Stroke {
    color: Rgb(200, 200, 200),
    width: 0.1,
};

/// Builds pages top to bottom. Every page starts with a copy of the header
/// ops and the cursor at [`CONTENT_TOP`].
pub struct Layout {
    title: String,
    header: Vec<DrawOp>,
    pages: Vec<Page>,
    pub y: f32,
}

impl Layout {
    pub fn new(title: impl Into<String>, header: Vec<DrawOp>) -> Self {
        let mut layout = Self {
            title: title.into(),
            header,
            pages: Vec::new(),
            y: CONTENT_TOP,
        };
        layout.new_page();
        layout
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page {
            ops: self.header.clone(),
        });
        self.y = CONTENT_TOP;
    }

    /// Breaks the page when `height` more millimetres would run into the
    /// footer reserve. Returns whether a break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.y + height > PAGE_HEIGHT - FOOTER_RESERVE {
            self.new_page();
            true
        } else {
            false
        }
    }

    pub fn past_content_area(&self) -> bool {
        self.y > PAGE_HEIGHT - FOOTER_RESERVE
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    pub fn text(&mut self, x: f32, y: f32, style: TextStyle, align: Align, text: &str) {
        self.push(text_op(x, y, style, align, text));
    }

    pub fn rect(
        &mut self,
        (x, y, width, height): (f32, f32, f32, f32),
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    ) {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.push(DrawOp::Line { from, to, stroke });
    }

    /// Draws a table starting at the cursor. Rows that would cross the footer
    /// reserve move to a new page, where the column header is drawn again.
    pub fn table(&mut self, columns: &[Column], rows: &[Row], theme: TableTheme) {
        self.ensure_space(2.0 * ROW_HEIGHT);
        self.table_header(columns, theme);
        for (index, row) in rows.iter().enumerate() {
            if self.ensure_space(ROW_HEIGHT) {
                self.table_header(columns, theme);
            }
            let fill = match theme {
                TableTheme::Striped if index % 2 == 1 => Some(STRIPE),
                _ => None,
            };
            let font = if row.emphasized {
                Font::Bold
            } else {
                Font::Regular
            };
            let style = TextStyle::new(9.0, font, Rgb::INK);
            self.table_row(columns, &row.cells, style, fill, theme);
        }
    }

    fn table_header(&mut self, columns: &[Column], theme: TableTheme) {
        let titles: Vec<String> = columns.iter().map(|c| c.title.clone()).collect();
        let style = TextStyle::new(9.0, Font::Bold, Rgb::WHITE);
        self.table_row(columns, &titles, style, Some(Rgb::BRAND), theme);
    }

    fn table_row(
        &mut self,
        columns: &[Column],
        cells: &[String],
        style: TextStyle,
        fill: Option<Rgb>,
        theme: TableTheme,
    ) {
        let y = self.y;
        let width: f32 = columns.iter().map(|c| c.width).sum();
        if let Some(fill) = fill {
            self.rect((MARGIN, y, width, ROW_HEIGHT), 0.0, Some(fill), None);
        }
        let mut x = MARGIN;
        for (column, cell) in columns.iter().zip(cells) {
            if theme == TableTheme::Grid {
                self.rect((x, y, column.width, ROW_HEIGHT), 0.0, None, Some(GRID_LINE));
            }
            let fitted = fit_text(cell, &style, column.width - 2.0 * CELL_PADDING);
            self.text(x + CELL_PADDING, y + 5.5, style, Align::Left, &fitted);
            x += column.width;
        }
        self.y += ROW_HEIGHT;
    }

    /// Stamps the `Generated: … | Page n of m` footer on every page.
    pub fn finish(self, generated_at: &str) -> Document {
        let total = self.pages.len();
        let style = TextStyle::new(8.0, Font::Regular, Rgb::MUTED);
        let pages = self
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, mut page)| {
                let footer = format!("Generated: {generated_at} | Page {} of {total}", index + 1);
                page.ops.push(text_op(
                    PAGE_WIDTH / 2.0,
                    FOOTER_BASELINE,
                    style,
                    Align::Center,
                    &footer,
                ));
                page
            })
            .collect();
        Document {
            title: self.title,
            pages,
        }
    }
}

/// Resolves alignment to a left-edge x using the estimated text width.
pub fn text_op(x: f32, y: f32, style: TextStyle, align: Align, text: &str) -> DrawOp {
    let width = text_width(text, style.size, style.font);
    let x = match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };
    DrawOp::Text {
        x,
        y,
        style,
        text: text.to_string(),
    }
}

/// Blue band with a centred title; `lines` are white sub-headings.
pub fn header_band(title: &str, lines: &[(String, Align, f32)]) -> Vec<DrawOp> {
    let mut ops = vec![
        DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            width: PAGE_WIDTH,
            height: HEADER_HEIGHT,
            radius: 0.0,
            fill: Some(Rgb::BRAND),
            stroke: None,
        },
        text_op(
            PAGE_WIDTH / 2.0,
            15.0,
            TextStyle::new(22.0, Font::Bold, Rgb::WHITE),
            Align::Center,
            title,
        ),
    ];
    let sub = TextStyle::new(12.0, Font::Regular, Rgb::WHITE);
    for (text, align, y) in lines {
        let x = match align {
            Align::Center => PAGE_WIDTH / 2.0,
            Align::Left => MARGIN,
            Align::Right => PAGE_WIDTH - MARGIN,
        };
        ops.push(text_op(x, *y, sub, *align, text));
    }
    ops
}
