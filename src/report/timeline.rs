use chrono::{DateTime, Utc};

use super::{
    dates_line, generated_stamp,
    layout::{
        header_band, text_width, Align, Document, Font, Layout, Rgb, Stroke, TextStyle,
        CONTENT_WIDTH, MARGIN,
    },
    long_date,
};
use crate::models::{
    itinerary::{DayPlanView, ScheduleItem},
    trip::Trip,
};

const ITEM_HEIGHT: f32 = 25.0;
/// Extra room demanded below a box before it may start on the current page.
const BREAK_MARGIN: f32 = 25.0;
const CONNECTOR: f32 = 18.0;
const ITEM_GAP: f32 = 3.0;
const DAY_HEADER_ADVANCE: f32 = 10.0;
const DAY_SPACING: f32 = 15.0;
const CORNER: f32 = 3.0;

const BOX_WIDTH: f32 = CONTENT_WIDTH * 0.7;
const BOX_X: f32 = MARGIN + (CONTENT_WIDTH - BOX_WIDTH) / 2.0;

const SHADOW: Rgb = Rgb(200, 200, 200);
const BADGE: Rgb = Rgb(180, 210, 230);
const BORDER: Stroke = Stroke {
    color: Rgb(100, 100, 100),
    width: 0.2,
};
const CONNECTOR_LINE: Stroke = Stroke {
    color: Rgb::MUTED,
    width: 0.5,
};

/// Lays out every day-plan of the trip, one boxed entry per visit.
pub fn render(trip: &Trip, days: &[DayPlanView], generated_at: DateTime<Utc>) -> Document {
    let title = format!("Trip Timeline: {}", trip.destination);
    let header = header_band(&title, &[(dates_line(trip), Align::Center, 25.0)]);
    let mut layout = Layout::new(title, header);

    if days.is_empty() {
        layout.text(
            MARGIN,
            layout.y,
            TextStyle::new(12.0, Font::Italic, Rgb::BLACK),
            Align::Left,
            "No days planned for this trip yet.",
        );
    }

    for (index, day) in days.iter().enumerate() {
        layout.text(
            MARGIN,
            layout.y,
            TextStyle::new(16.0, Font::Bold, Rgb::BLACK),
            Align::Left,
            &long_date(day.date),
        );
        layout.y += DAY_HEADER_ADVANCE;

        let items = day.items_by_start_time();
        if items.is_empty() {
            layout.text(
                MARGIN + 5.0,
                layout.y,
                TextStyle::new(12.0, Font::Italic, Rgb::BLACK),
                Align::Left,
                "No items scheduled for this day.",
            );
            layout.y += 10.0;
        }
        for (position, item) in items.iter().enumerate() {
            layout.ensure_space(ITEM_HEIGHT + BREAK_MARGIN);
            draw_item(&mut layout, item);
            layout.y += ITEM_HEIGHT;

            let is_last = position + 1 == items.len();
            match item.travel_time_to_next {
                Some(minutes) if !is_last => {
                    draw_connector(&mut layout, minutes);
                    layout.y += CONNECTOR;
                }
                _ => layout.y += ITEM_GAP,
            }
        }

        layout.y += DAY_SPACING;
        if layout.past_content_area() && index + 1 < days.len() {
            layout.new_page();
        }
    }

    layout.finish(&generated_stamp(generated_at))
}

fn draw_item(layout: &mut Layout, item: &ScheduleItem) {
    let y = layout.y;
    layout.rect(
        (BOX_X + 1.0, y + 1.0, BOX_WIDTH, ITEM_HEIGHT),
        CORNER,
        Some(SHADOW),
        None,
    );
    layout.rect(
        (BOX_X, y, BOX_WIDTH, ITEM_HEIGHT),
        CORNER,
        Some(Rgb::WHITE),
        Some(BORDER),
    );

    let badge = TextStyle::new(8.0, Font::Regular, Rgb::INK);
    let category = item.category.as_str();
    let badge_width = text_width(category, badge.size, badge.font);
    let badge_x = BOX_X + BOX_WIDTH - badge_width - 8.0;
    let badge_y = y + 7.0;
    layout.rect(
        (badge_x - 2.0, badge_y - 4.0, badge_width + 4.0, 7.0),
        1.0,
        Some(BADGE),
        None,
    );
    layout.text(badge_x, badge_y, badge, Align::Left, category);

    let name = TextStyle::new(11.0, Font::Bold, Rgb::INK);
    let room = badge_x - 4.0 - (BOX_X + 5.0);
    let fitted = super::layout::fit_text(&item.place_name, &name, room);
    layout.text(BOX_X + 5.0, y + 9.0, name, Align::Left, &fitted);
    layout.text(
        BOX_X + 5.0,
        y + 18.0,
        TextStyle::new(9.0, Font::Regular, Rgb::INK),
        Align::Left,
        &format!("{} - {}", item.start_time, item.end_time),
    );
}

fn draw_connector(layout: &mut Layout, minutes: i64) {
    let y = layout.y;
    let mid = BOX_X + BOX_WIDTH / 2.0;
    layout.line((mid, y), (mid, y + CONNECTOR), CONNECTOR_LINE);

    let style = TextStyle::new(8.0, Font::Regular, Rgb(80, 80, 80));
    let label = format!("{minutes} min");
    let width = text_width(&label, style.size, style.font) + 6.0;
    let height = 8.0;
    layout.rect(
        (mid - width / 2.0, y + CONNECTOR / 2.0 - height / 2.0, width, height),
        1.0,
        Some(Rgb::WHITE),
        Some(BORDER),
    );
    layout.text(mid, y + CONNECTOR / 2.0 + 1.0, style, Align::Center, &label);
}
