//! Static grid page.
//!
//! One table per matrix row, one cell per category. A cell is the category's
//! image wrapped in its viewer link, with the category label underneath:
//!
//! ```text
//! ┌──────────────┬──────────────┐
//! │ [real/a.png] │ [fake/a.png] │   ← click opens the viewer on that file
//! │ real         │ fake         │
//! └──────────────┴──────────────┘
//! ```
//!
//! Every image is scaled to the same fixed width so columns line up across
//! rows.

use crate::config::GridConfig;
use crate::matrix::{MatrixCell, MatrixRow};
use maud::{DOCTYPE, Markup, html};

const TABLE_STYLE: &str = "table-layout: fixed;";
const HIGHLIGHT: &str = "background-color:#FFFFE0";

/// Render the full grid document.
pub fn render_grid(rows: &[MatrixRow], config: &GridConfig) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                @if config.refresh > 0 {
                    meta http-equiv="refresh" content=(config.refresh);
                }
                title { (config.title) }
            }
            body {
                h3 { (config.heading) }
                @for row in rows {
                    (render_row(row, config))
                }
            }
        }
    }
}

fn table_style(config: &GridConfig) -> String {
    if config.highlight {
        format!("{TABLE_STYLE}{HIGHLIGHT}")
    } else {
        TABLE_STYLE.to_string()
    }
}

fn render_row(row: &MatrixRow, config: &GridConfig) -> Markup {
    html! {
        table border="1" style=(table_style(config)) {
            tr {
                @for cell in &row.cells {
                    (render_cell(cell, config.image_width))
                }
            }
        }
    }
}

fn render_cell(cell: &MatrixCell, width: u32) -> Markup {
    html! {
        td style="word-wrap: break-word;" halign="center" valign="top" {
            p {
                a href=(cell.link) {
                    img style=(format!("width:{width}px")) src=(cell.display);
                }
                br;
                p { (cell.label) }
            }
        }
    }
}
