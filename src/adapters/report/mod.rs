//! Report adapters.
//!
//! - `HtmlReportRenderer` - Writes HTML risk reports into an exports directory

mod html_report;

pub use html_report::{render_html, HtmlReportRenderer};
