use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::{
    dates_line, generated_stamp,
    layout::{header_band, Align, Column, Document, Font, Layout, Rgb, Row, TableTheme, TextStyle, MARGIN},
    long_date, money,
};
use crate::models::{
    expense::{Expense, ExpenseSummary},
    trip::Trip,
};

const SECTION: TextStyle = TextStyle::new(18.0, Font::Bold, Rgb::BLACK);
const DATE_HEADING: TextStyle = TextStyle::new(14.0, Font::Bold, Rgb::BLACK);
const PLACEHOLDER: TextStyle = TextStyle::new(10.0, Font::Italic, Rgb::BLACK);

/// Payment timeline grouped by day, newest day first, followed by what each
/// payer covered.
pub fn render(
    trip: &Trip,
    expenses: &[Expense],
    summary: &ExpenseSummary,
    generated_at: DateTime<Utc>,
) -> Document {
    let title = format!("Expense Report for {}", trip.destination);
    let header = header_band(
        &title,
        &[
            (dates_line(trip), Align::Left, 25.0),
            (
                format!("Total Expenses: {}", money(&trip.currency, summary.total)),
                Align::Left,
                32.0,
            ),
        ],
    );
    let mut layout = Layout::new(title, header);

    payment_timeline(&mut layout, &trip.currency, expenses);
    payer_report(&mut layout, &trip.currency, summary);

    layout.finish(&generated_stamp(generated_at))
}

fn payment_timeline(layout: &mut Layout, currency: &str, expenses: &[Expense]) {
    layout.text(MARGIN, layout.y, SECTION, Align::Left, "Payment Timeline");
    layout.y += 10.0;

    if expenses.is_empty() {
        layout.text(
            MARGIN,
            layout.y,
            PLACEHOLDER,
            Align::Left,
            "No expenses recorded for this trip yet.",
        );
        layout.y += 10.0;
        return;
    }

    let columns = [
        Column::new("Amount", 28.0),
        Column::new("Description", 50.0),
        Column::new("Paid By", 28.0),
        Column::new("Mode", 18.0),
        Column::new("Time", 18.0),
        Column::new("Place", 38.0),
    ];
    for (date, group) in group_by_date(expenses) {
        layout.ensure_space(20.0);
        layout.text(MARGIN, layout.y, DATE_HEADING, Align::Left, &long_date(date));
        layout.y += 7.0;

        let rows: Vec<Row> = group
            .into_iter()
            .map(|expense| {
                Row::plain(vec![
                    money(currency, expense.amount),
                    if expense.description.is_empty() {
                        "No description".to_string()
                    } else {
                        expense.description.clone()
                    },
                    expense
                        .payment_user_name
                        .clone()
                        .unwrap_or_else(|| "N/A".into()),
                    expense.mode_of_payment.to_string(),
                    expense.payment_time.format("%H:%M").to_string(),
                    expense.place_name.clone().unwrap_or_else(|| "N/A".into()),
                ])
            })
            .collect();
        layout.table(&columns, &rows, TableTheme::Striped);
        layout.y += 10.0;
    }
}

fn payer_report(layout: &mut Layout, currency: &str, summary: &ExpenseSummary) {
    layout.ensure_space(30.0);
    layout.text(MARGIN, layout.y, SECTION, Align::Left, "User-wise Payment Report");
    layout.y += 10.0;

    let mut rows: Vec<Row> = summary
        .per_user
        .iter()
        .filter(|payer| payer.total > 0.0)
        .map(|payer| Row::plain(vec![payer.name.clone(), format!("{:.2}", payer.total)]))
        .collect();
    if rows.is_empty() {
        layout.text(
            MARGIN,
            layout.y,
            PLACEHOLDER,
            Align::Left,
            "No user payments recorded yet.",
        );
        layout.y += 10.0;
        return;
    }
    rows.push(Row::emphasized(vec![
        "Overall Total".into(),
        format!("{:.2}", summary.total),
    ]));

    let columns = [
        Column::new("Payer Name", 110.0),
        Column::new(format!("Total Amount ({currency})"), 70.0),
    ];
    layout.table(&columns, &rows, TableTheme::Grid);
}

/// Calendar days (UTC) of payment, newest first; each group keeps the
/// incoming order.
fn group_by_date(expenses: &[Expense]) -> Vec<(NaiveDate, Vec<&Expense>)> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        groups
            .entry(expense.payment_time.date_naive())
            .or_default()
            .push(expense);
    }
    groups.into_iter().rev().collect()
}
