//! Customer receipt rendering
//!
//! Produces a standalone HTML document for the bill of one order. Items
//! still `pending` are left out; everything else is listed in creation order.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::order::{ItemStatus, Order, OrderItem, sum_line_totals};
use std::fmt::Write;

use crate::orders::money::format_ars;

const EMPTY_NOTICE: &str = "No hay ítems para imprimir (los pendientes no se incluyen).";

/// Business identity printed at the top of every receipt
#[derive(Debug, Clone)]
pub struct Branding {
    pub business_name: String,
    pub subtitle: String,
    pub timezone: Tz,
}

/// Rendered receipt ready to be served as a download
#[derive(Debug, Clone)]
pub struct Receipt {
    pub html: String,
    pub filename: String,
    pub total: Decimal,
    pub line_count: usize,
}

/// Escape text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `ticket-<table>-<YYYY-MM-DDTHH-MM-SS>.html`, timestamp in UTC
pub fn receipt_filename(table_code: &str, now: DateTime<Utc>) -> String {
    let table = if table_code.trim().is_empty() {
        "mesa".to_string()
    } else {
        table_code.replace('/', "-")
    };
    format!("ticket-{table}-{}.html", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Lines that go on the bill, in creation order
pub fn billable_items(items: &[OrderItem]) -> Vec<&OrderItem> {
    let mut lines: Vec<&OrderItem> = items
        .iter()
        .filter(|i| i.status != ItemStatus::Pending)
        .collect();
    lines.sort_by_key(|i| (i.created_at, i.id));
    lines
}

/// `None` when a line or the total overflows
pub fn render_receipt(
    order: &Order,
    items: &[OrderItem],
    branding: &Branding,
    now: DateTime<Utc>,
) -> Option<Receipt> {
    let lines = billable_items(items);
    let subtotals = lines
        .iter()
        .map(|i| i.line_total())
        .collect::<Option<Vec<Decimal>>>()?;
    let total = sum_line_totals(lines.iter().copied())?;

    let table = if order.table_code.trim().is_empty() {
        "—"
    } else {
        order.table_code.as_str()
    };
    let table = escape_html(table);
    let printed_at = now
        .with_timezone(&branding.timezone)
        .format("%-d/%-m/%Y, %H:%M:%S")
        .to_string();

    let body = if lines.is_empty() {
        format!(r#"<div class="muted" style="font-size:13px;">{EMPTY_NOTICE}</div>"#)
    } else {
        let mut rows = String::new();
        for (item, subtotal) in lines.iter().zip(&subtotals) {
            let note = match item.note.as_deref().filter(|n| !n.trim().is_empty()) {
                Some(note) => format!(
                    r#"<div class="note">Nota: {}</div>"#,
                    escape_html(note)
                ),
                None => String::new(),
            };
            // Writing to a String cannot fail
            let _ = write!(
                rows,
                r#"
        <tr>
          <td class="qty"><b>{qty}x</b></td>
          <td><div class="name">{name}</div>{note}</td>
          <td class="right">${unit}</td>
          <td class="right"><b>${sub}</b></td>
        </tr>"#,
                qty = item.quantity,
                name = escape_html(&item.name),
                unit = format_ars(item.unit_price),
                sub = format_ars(*subtotal),
            );
        }

        format!(
            r#"<table>
      <thead>
        <tr><th class="qty">Cant</th><th>Detalle</th><th class="right">Unit</th><th class="right">Sub</th></tr>
      </thead>
      <tbody>{rows}
      </tbody>
    </table>
    <div class="total"><span><b>Total</b></span><span><b>${total}</b></span></div>"#,
            total = format_ars(total),
        )
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Cuenta Mesa {table}</title>
    <style>
      @page {{ margin: 10mm; }}
      body {{ font-family: Arial, sans-serif; color: #111; }}
      .muted {{ opacity: .72; }}
      .brand {{ font-size: 22px; font-weight: 900; }}
      .head {{ display: flex; justify-content: space-between; gap: 12px; }}
      hr {{ border: none; border-top: 1px solid #ddd; margin: 12px 0; }}
      table {{ width: 100%; border-collapse: collapse; }}
      th {{ text-align: left; font-size: 12px; opacity: .75; padding: 8px 0; }}
      td {{ padding: 9px 0; vertical-align: top; }}
      .qty {{ width: 56px; }}
      .name {{ font-weight: 800; font-size: 13px; }}
      .note {{ font-size: 12px; opacity: .8; margin-top: 3px; }}
      .right {{ text-align: right; white-space: nowrap; }}
      .total {{ margin: 10px 0 0 auto; min-width: 260px; max-width: 320px; display: flex; justify-content: space-between; font-size: 15px; }}
    </style>
  </head>
  <body>
    <div class="head">
      <div>
        <div class="brand">{name}</div>
        <div class="muted" style="font-size:12px;">{subtitle}</div>
        <div style="font-size:12px; margin-top:6px;"><b>Mesa:</b> {table}</div>
      </div>
      <div class="muted" style="font-size:12px; text-align:right;">{printed_at}</div>
    </div>
    <hr />
    {body}
  </body>
</html>
"#,
        name = escape_html(&branding.business_name),
        subtitle = escape_html(&branding.subtitle),
        printed_at = escape_html(&printed_at),
    );

    Some(Receipt {
        html,
        filename: receipt_filename(&order.table_code, now),
        total,
        line_count: lines.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::order::{ItemOrigin, OrderState};

    fn branding() -> Branding {
        Branding {
            business_name: "Maitreya".to_string(),
            subtitle: "by Patagonia Gourmet".to_string(),
            timezone: chrono_tz::America::Argentina::Buenos_Aires,
        }
    }

    fn order(table_code: &str) -> Order {
        Order {
            id: 1,
            table_code: table_code.to_string(),
            table_label: None,
            state: OrderState::Open,
            created_at: 0,
            closed_at: None,
            total: Decimal::ZERO,
            call_waiter: false,
            request_bill: false,
        }
    }

    fn item(id: i64, name: &str, price: i64, quantity: u32, status: ItemStatus) -> OrderItem {
        OrderItem {
            id,
            order_id: 1,
            table_code: "4".to_string(),
            table_label: None,
            origin: ItemOrigin::Manual,
            dish_id: None,
            name: name.to_string(),
            note: None,
            base_price: Decimal::from(price),
            extras: vec![],
            unit_price: Decimal::from(price),
            quantity,
            status,
            created_at: id,
            voided: None,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            receipt_filename("A/2", noon()),
            "ticket-A-2-2025-03-14T15-04-05.html"
        );
        assert_eq!(receipt_filename(" ", noon()), "ticket-mesa-2025-03-14T15-04-05.html");
    }

    #[test]
    fn test_pending_items_excluded() {
        let mut wine = item(2, "Vino <tinto>", 1500, 2, ItemStatus::Delivered);
        wine.note = Some("copa & botella".to_string());
        let items = vec![
            item(3, "Flan", 900, 1, ItemStatus::Ready),
            wine,
            item(1, "Pendiente", 5000, 1, ItemStatus::Pending),
        ];

        let receipt = render_receipt(&order("4"), &items, &branding(), noon()).unwrap();
        assert_eq!(receipt.line_count, 2);
        assert_eq!(receipt.total, Decimal::from(3900));
        assert!(receipt.html.contains("<title>Cuenta Mesa 4</title>"));
        assert!(receipt.html.contains("Maitreya"));
        assert!(receipt.html.contains("by Patagonia Gourmet"));
        assert!(receipt.html.contains("Vino &lt;tinto&gt;"));
        assert!(receipt.html.contains("Nota: copa &amp; botella"));
        assert!(receipt.html.contains("$3.000"));
        assert!(receipt.html.contains("$3.900"));
        assert!(!receipt.html.contains("Pendiente"));
        // Buenos Aires is UTC-3
        assert!(receipt.html.contains("14/3/2025, 12:04:05"));

        let wine_at = receipt.html.find("Vino").unwrap();
        let flan_at = receipt.html.find("Flan").unwrap();
        assert!(wine_at < flan_at);
    }

    #[test]
    fn test_empty_notice() {
        let items = vec![item(1, "Pendiente", 5000, 1, ItemStatus::Pending)];
        let receipt = render_receipt(&order(""), &items, &branding(), noon()).unwrap();
        assert_eq!(receipt.line_count, 0);
        assert_eq!(receipt.total, Decimal::ZERO);
        assert!(receipt.html.contains(EMPTY_NOTICE));
        assert!(!receipt.html.contains("<table>"));
        assert!(receipt.html.contains("Mesa:</b> —"));
    }
}
