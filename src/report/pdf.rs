//! Minimal PDF 1.4 writer for [`Document`]s: one content stream per page,
//! the standard Helvetica faces with WinAnsi encoding, no compression.

use std::fmt::Write as _;

use super::layout::{Document, DrawOp, Font, Rgb, Stroke, PAGE_HEIGHT, PAGE_WIDTH};

const MM_TO_PT: f32 = 72.0 / 25.4;
/// Control-point distance for quarter-circle Bézier arcs.
const KAPPA: f32 = 0.552_284_8;

const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const FONT_ITALIC: usize = 5;
const INFO: usize = 6;
const FIRST_PAGE: usize = 7;

pub fn render(doc: &Document) -> Vec<u8> {
    let mut writer = Writer::default();
    writer.buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let page_ids: Vec<usize> = (0..doc.pages.len())
        .map(|index| FIRST_PAGE + 2 * index)
        .collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    writer.object(
        CATALOG,
        format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").as_bytes(),
    );
    writer.object(
        PAGES,
        format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} >>",
            doc.pages.len()
        )
        .as_bytes(),
    );
    for (id, base) in [
        (FONT_REGULAR, "Helvetica"),
        (FONT_BOLD, "Helvetica-Bold"),
        (FONT_ITALIC, "Helvetica-Oblique"),
    ] {
        writer.object(
            id,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>"
            )
            .as_bytes(),
        );
    }
    let mut info = b"<< /Title (".to_vec();
    info.extend(encode_text(&doc.title));
    info.extend_from_slice(b") /Producer (tripplan) >>");
    writer.object(INFO, &info);

    for (page, id) in doc.pages.iter().zip(&page_ids) {
        let content_id = id + 1;
        writer.object(
            *id,
            format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {FONT_REGULAR} 0 R /F2 {FONT_BOLD} 0 R /F3 {FONT_ITALIC} 0 R >> >> \
                 /Contents {content_id} 0 R >>",
                num(PAGE_WIDTH * MM_TO_PT),
                num(PAGE_HEIGHT * MM_TO_PT)
            )
            .as_bytes(),
        );

        let stream = content_stream(page.ops());
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend(stream);
        body.extend_from_slice(b"\nendstream");
        writer.object(content_id, &body);
    }

    writer.finish()
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl Writer {
    /// Objects must be written in id order so offsets line up with the xref.
    fn object(&mut self, id: usize, body: &[u8]) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.buf.extend(format!("{id} 0 obj\n").into_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_at = self.buf.len();
        let size = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {size} /Root {CATALOG} 0 R /Info {INFO} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        );
        self.buf.extend(xref.into_bytes());
        self.buf
    }
}

fn content_stream(ops: &[DrawOp]) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        match op {
            DrawOp::Text { x, y, style, text } => {
                let font = match style.font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                    Font::Italic => "F3",
                };
                out.extend(
                    format!(
                        "BT /{font} {} Tf {} rg {} {} Td (",
                        num(style.size),
                        color(style.color),
                        num(x * MM_TO_PT),
                        num(flip(*y))
                    )
                    .into_bytes(),
                );
                out.extend(encode_text(text));
                out.extend_from_slice(b") Tj ET\n");
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
            } => {
                let mut cmd = String::from("q ");
                if let Some(fill) = fill {
                    let _ = write!(cmd, "{} rg ", color(*fill));
                }
                if let Some(stroke) = stroke {
                    cmd.push_str(&stroke_state(stroke));
                }
                cmd.push_str(&rect_path(*x, *y, *width, *height, *radius));
                let paint = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    (false, true) => "S",
                    (false, false) => "n",
                };
                let _ = writeln!(cmd, "{paint} Q");
                out.extend(cmd.into_bytes());
            }
            DrawOp::Line { from, to, stroke } => {
                out.extend(
                    format!(
                        "q {}{} {} m {} {} l S Q\n",
                        stroke_state(stroke),
                        num(from.0 * MM_TO_PT),
                        num(flip(from.1)),
                        num(to.0 * MM_TO_PT),
                        num(flip(to.1))
                    )
                    .into_bytes(),
                );
            }
        }
    }
    out
}

fn rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> String {
    let left = x * MM_TO_PT;
    let right = (x + width) * MM_TO_PT;
    let top = flip(y);
    let bottom = flip(y + height);
    let r = radius.min(width / 2.0).min(height / 2.0) * MM_TO_PT;
    if r <= 0.0 {
        return format!(
            "{} {} {} {} re ",
            num(left),
            num(bottom),
            num(right - left),
            num(top - bottom)
        );
    }
    let k = r * KAPPA;
    let mut path = String::new();
    let _ = write!(path, "{} {} m ", num(left + r), num(bottom));
    let _ = write!(path, "{} {} l ", num(right - r), num(bottom));
    let _ = write!(
        path,
        "{} {} {} {} {} {} c ",
        num(right - r + k),
        num(bottom),
        num(right),
        num(bottom + r - k),
        num(right),
        num(bottom + r)
    );
    let _ = write!(path, "{} {} l ", num(right), num(top - r));
    let _ = write!(
        path,
        "{} {} {} {} {} {} c ",
        num(right),
        num(top - r + k),
        num(right - r + k),
        num(top),
        num(right - r),
        num(top)
    );
    let _ = write!(path, "{} {} l ", num(left + r), num(top));
    let _ = write!(
        path,
        "{} {} {} {} {} {} c ",
        num(left + r - k),
        num(top),
        num(left),
        num(top - r + k),
        num(left),
        num(top - r)
    );
    let _ = write!(path, "{} {} l ", num(left), num(bottom + r));
    let _ = write!(
        path,
        "{} {} {} {} {} {} c h ",
        num(left),
        num(bottom + r - k),
        num(left + r - k),
        num(bottom),
        num(left + r),
        num(bottom)
    );
    path
}

fn stroke_state(stroke: &Stroke) -> String {
    format!("{} RG {} w ", color(stroke.color), num(stroke.width * MM_TO_PT))
}

fn flip(y_mm: f32) -> f32 {
    (PAGE_HEIGHT - y_mm) * MM_TO_PT
}

fn color(rgb: Rgb) -> String {
    let channel = |c: u8| num(f32::from(c) / 255.0);
    format!("{} {} {}", channel(rgb.0), channel(rgb.1), channel(rgb.2))
}

fn num(value: f32) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// WinAnsi bytes for a literal string, with delimiters escaped. Characters
/// outside the encoding become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match c {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                c as u8
            }
            '\n' | '\r' | '\t' => b' ',
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (' '..='~').contains(&c) => c as u8,
            c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
            _ => b'?',
        };
        out.push(byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::{header_band, Align, Layout, TextStyle};

    fn sample(pages: usize) -> Document {
        let mut layout = Layout::new(
            "Trip (draft)",
            header_band("Trip Timeline: Goa", &[("Dates".into(), Align::Center, 25.0)]),
        );
        for _ in 1..pages {
            layout.new_page();
        }
        layout.finish("2026-01-01 09:00 UTC")
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    #[test]
    fn output_is_framed_as_a_pdf() {
        let bytes = render(&sample(1));
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(find(&bytes, b"/BaseFont /Helvetica-Bold").is_some());
        assert!(find(&bytes, b"(Trip \\(draft\\))").is_some());
    }

    #[test]
    fn xref_offsets_point_at_their_objects() {
        let bytes = render(&sample(3));
        let marker = bytes
            .windows(b"startxref\n".len())
            .rposition(|window| window == b"startxref\n")
            .unwrap();
        let tail = std::str::from_utf8(&bytes[marker..]).unwrap();
        let start: usize = tail.lines().nth(1).unwrap().parse().unwrap();
        let xref = std::str::from_utf8(&bytes[start..]).unwrap();
        assert!(xref.starts_with("xref\n"));

        let entries: Vec<usize> = xref
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        // catalog, pages, three fonts, info, then a page + stream pair per page
        assert_eq!(entries.len(), 6 + 2 * 3);
        for (index, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", index + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
        assert!(find(&bytes, b"/Count 3").is_some());
    }

    #[test]
    fn text_is_encoded_as_win_ansi() {
        assert_eq!(encode_text("a(b)"), b"a\\(b\\)".to_vec());
        assert_eq!(encode_text("café – ₹"), vec![b'c', b'a', b'f', 0xE9, b' ', 0x96, b' ', b'?']);
    }

    fn rect(radius: f32, fill: Option<Rgb>, stroke: Option<Stroke>) -> DrawOp {
        DrawOp::Rect {
            x: 10.0,
            y: 20.0,
            width: 50.0,
            height: 25.0,
            radius,
            fill,
            stroke,
        }
    }

    fn stream_text(ops: &[DrawOp]) -> String {
        String::from_utf8(content_stream(ops)).unwrap()
    }

    const HAIRLINE: Stroke = Stroke {
        color: Rgb::BLACK,
        width: 0.3,
    };

    #[test]
    fn text_lands_at_flipped_coordinates_in_its_face() {
        let op = DrawOp::Text {
            x: 10.0,
            y: 20.0,
            style: TextStyle::new(12.0, Font::Bold, Rgb::BLACK),
            text: "Fort Aguada".into(),
        };
        assert_eq!(
            stream_text(&[op]),
            format!(
                "BT /F2 12 Tf 0 0 0 rg {} {} Td (Fort Aguada) Tj ET\n",
                num(10.0 * MM_TO_PT),
                num(flip(20.0))
            )
        );
        assert_eq!(flip(PAGE_HEIGHT), 0.0);
        assert_eq!(num(flip(0.0)), num(PAGE_HEIGHT * MM_TO_PT));
    }

    #[test]
    fn rect_paint_follows_fill_and_stroke() {
        assert!(stream_text(&[rect(0.0, Some(Rgb::BRAND), None)]).ends_with(" f Q\n"));
        assert!(stream_text(&[rect(0.0, None, Some(HAIRLINE))]).ends_with(" S Q\n"));
        assert!(stream_text(&[rect(0.0, Some(Rgb::BRAND), Some(HAIRLINE))]).ends_with(" B Q\n"));
        assert!(stream_text(&[rect(0.0, None, None)]).ends_with(" n Q\n"));

        let filled = stream_text(&[rect(0.0, Some(Rgb::BRAND), None)]);
        assert!(filled.starts_with(&format!("q {} rg ", color(Rgb::BRAND))));
    }

    #[test]
    fn square_rects_use_re_and_rounded_ones_curve_every_corner() {
        let square = rect_path(10.0, 20.0, 50.0, 25.0, 0.0);
        assert!(square.ends_with(" re "));
        assert!(!square.contains(" c "));

        let rounded = rect_path(10.0, 20.0, 50.0, 25.0, 3.0);
        assert_eq!(rounded.matches(" c ").count(), 4);
        assert!(rounded.ends_with(" c h "));
    }

    #[test]
    fn corner_radius_is_clamped_to_half_the_short_side() {
        assert_eq!(
            rect_path(10.0, 20.0, 50.0, 25.0, 40.0),
            rect_path(10.0, 20.0, 50.0, 25.0, 12.5)
        );
    }

    #[test]
    fn lines_stroke_between_two_points() {
        let op = DrawOp::Line {
            from: (0.0, 0.0),
            to: (10.0, 0.0),
            stroke: HAIRLINE,
        };
        let out = stream_text(&[op]);
        assert!(out.starts_with(&format!("q {}", stroke_state(&HAIRLINE))));
        assert!(out.ends_with(" l S Q\n"));
        assert!(out.contains(&format!("0 {} m ", num(flip(0.0)))));
    }

    #[test]
    fn stream_lengths_match_their_contents() {
        let bytes = render(&sample(2));
        let mut from = 0;
        let mut seen = 0;
        while let Some(at) = find(&bytes[from..], b"/Length ") {
            let start = from + at + b"/Length ".len();
            let end = start + find(&bytes[start..], b" >>").unwrap();
            let length: usize = std::str::from_utf8(&bytes[start..end])
                .unwrap()
                .parse()
                .unwrap();
            let data = end + b" >>\nstream\n".len();
            assert!(bytes[data + length..].starts_with(b"\nendstream"));
            from = data + length;
            seen += 1;
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(595.2756), "595.276");
    }
}
