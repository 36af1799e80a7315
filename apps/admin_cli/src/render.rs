//! Plain-text views of the dashboard state.

use std::fmt::Write as _;

use shared::domain::{Order, OrderStatus};

pub fn status_label(status: &OrderStatus) -> String {
    match status.badge() {
        Some(badge) => format!("{} [{}]", badge.label, badge.color),
        None => format!("{} (unrecognized)", status.as_wire()),
    }
}

pub fn order_table(orders: &[Order], total: usize) -> String {
    let headers = ["ID", "CUSTOMER", "DATE", "STATUS"];
    let rows: Vec<[String; 4]> = orders
        .iter()
        .map(|order| {
            [
                order.id.to_string(),
                order.customer.clone(),
                order.date.clone(),
                status_label(&order.status),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", format_row(&headers.map(str::to_string), &widths));
    for row in &rows {
        let _ = writeln!(out, "{}", format_row(row, &widths));
    }
    let _ = writeln!(out, "Total orders: {total}");
    out
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn order_detail(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {}", order.id);
    let _ = writeln!(out, "  customer: {}", order.customer);
    let _ = writeln!(out, "  date:     {}", order.date);
    let _ = writeln!(out, "  status:   {}", status_label(&order.status));
    for (part, customization) in order.parts() {
        match customization {
            Some(c) => {
                let _ = writeln!(out, "  {part:<7} color={} material={}", c.color, c.material);
            }
            None => {
                let _ = writeln!(out, "  {part:<7} -");
            }
        }
    }
    out
}
