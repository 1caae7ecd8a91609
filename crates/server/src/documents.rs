//! Receipt and daily report rendering.
//!
//! Documents are rendered from tera templates to HTML and converted to PDF with
//! `wkhtmltopdf` when it is on the PATH. Without it, callers get the HTML.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use tera::{Context, Tera};
use tokio::process::Command;
use tracing::{error, info, warn};

use hotelier_core::receipt::Receipt;
use hotelier_core::reporting::DailyStats;

const RECEIPT_TEMPLATE: &str = "receipt.html.tera";
const DAILY_REPORT_TEMPLATE: &str = "daily_report.html.tera";

/// Formats a number or numeric string to 2 decimal places.
/// Usage: `amount | money`
fn tera_money_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let num = match value {
        tera::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        tera::Value::String(raw) => raw.parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(tera::Value::String(format!("{num:.2}")))
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(String),
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct DocumentRenderer {
    tera: Tera,
    wkhtmltopdf_path: Option<String>,
    hotel_name: String,
    currency: String,
}

impl DocumentRenderer {
    /// Renderer with the templates compiled into the binary.
    pub fn embedded(
        hotel_name: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.register_filter("money", tera_money_filter);
        tera.add_raw_templates(vec![
            (RECEIPT_TEMPLATE, include_str!("../../../templates/receipt.html.tera")),
            (DAILY_REPORT_TEMPLATE, include_str!("../../../templates/daily_report.html.tera")),
        ])
        .map_err(|e| RenderError::Template(e.to_string()))?;

        let wkhtmltopdf_path =
            which::which("wkhtmltopdf").ok().map(|p| p.to_string_lossy().to_string());
        match &wkhtmltopdf_path {
            Some(path) => {
                info!(event_name = "documents.pdf_backend", path = %path, "wkhtmltopdf found")
            }
            None => warn!(
                event_name = "documents.pdf_backend",
                "wkhtmltopdf not found in PATH, documents will be served as HTML"
            ),
        }

        Ok(Self {
            tera,
            wkhtmltopdf_path,
            hotel_name: hotel_name.into(),
            currency: currency.into(),
        })
    }

    /// Forces HTML output even when `wkhtmltopdf` is installed.
    pub fn html_only(mut self) -> Self {
        self.wkhtmltopdf_path = None;
        self
    }

    pub async fn render_receipt(&self, receipt: &Receipt) -> Result<Document, RenderError> {
        let mut context = self.base_context();
        context.insert("receipt", receipt);

        let html = self.render_html(RECEIPT_TEMPLATE, &context)?;
        Ok(self.finish(html, &receipt.file_stem()).await)
    }

    pub async fn render_daily_report(&self, stats: &DailyStats) -> Result<Document, RenderError> {
        let mut context = self.base_context();
        context.insert("stats", stats);
        context.insert("occupancy_pct", &format!("{:.1}", stats.occupancy_pct()));

        let html = self.render_html(DAILY_REPORT_TEMPLATE, &context)?;
        let stem = format!("daily_report_{}", stats.as_of.format("%Y-%m-%d"));
        Ok(self.finish(html, &stem).await)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("hotel_name", &self.hotel_name);
        context.insert("currency", &self.currency);
        context
    }

    fn render_html(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        self.tera.render(template, context).map_err(|e| RenderError::Template(e.to_string()))
    }

    async fn finish(&self, html: String, stem: &str) -> Document {
        let body = match &self.wkhtmltopdf_path {
            Some(wkhtmltopdf) => match convert_html_to_pdf(&html, wkhtmltopdf).await {
                Ok(pdf_bytes) => DocumentBody::Pdf(pdf_bytes),
                Err(e) => {
                    warn!(
                        event_name = "documents.pdf_fallback",
                        error = %e,
                        "PDF conversion failed, falling back to HTML"
                    );
                    DocumentBody::Html(html)
                }
            },
            None => DocumentBody::Html(html),
        };
        Document { stem: stem.to_string(), body }
    }
}

async fn convert_html_to_pdf(html: &str, wkhtmltopdf_path: &str) -> Result<Vec<u8>, RenderError> {
    let temp_dir = std::env::temp_dir();
    let html_path = temp_dir.join(format!("hotelier_{}.html", uuid::Uuid::new_v4()));
    let pdf_path = temp_dir.join(format!("hotelier_{}.pdf", uuid::Uuid::new_v4()));

    tokio::fs::write(&html_path, html).await?;

    let output = Command::new(wkhtmltopdf_path)
        .args(["--page-size", "A4", "--encoding", "utf-8", "--quiet"])
        .arg(&html_path)
        .arg(&pdf_path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;
    let _ = tokio::fs::remove_file(&html_path).await;
    let output = output?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(stderr = %stderr, "wkhtmltopdf failed");
        let _ = tokio::fs::remove_file(&pdf_path).await;
        return Err(RenderError::Conversion(stderr.to_string()));
    }

    let pdf_bytes = tokio::fs::read(&pdf_path).await?;
    let _ = tokio::fs::remove_file(&pdf_path).await;

    info!(event_name = "documents.pdf_generated", size = pdf_bytes.len(), "PDF generated");
    Ok(pdf_bytes)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentBody {
    Pdf(Vec<u8>),
    Html(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub stem: String,
    pub body: DocumentBody,
}

impl Document {
    pub fn file_name(&self) -> String {
        match self.body {
            DocumentBody::Pdf(_) => format!("{}.pdf", self.stem),
            DocumentBody::Html(_) => format!("{}.html", self.stem),
        }
    }

    /// Writes the document into `dir`, creating it if needed.
    pub async fn save(&self, dir: &Path) -> Result<PathBuf, RenderError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name());
        match &self.body {
            DocumentBody::Pdf(bytes) => tokio::fs::write(&path, bytes).await?,
            DocumentBody::Html(html) => tokio::fs::write(&path, html).await?,
        }
        Ok(path)
    }
}

impl IntoResponse for Document {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name());
        match self.body {
            DocumentBody::Pdf(bytes) => (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response(),
            DocumentBody::Html(html) => {
                ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use hotelier_core::domain::booking::BookingId;
    use hotelier_core::receipt::Receipt;
    use hotelier_core::reporting::DailyStats;

    use super::{DocumentBody, DocumentRenderer};

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::embedded("Grand Hotel", "Rs.").expect("templates").html_only()
    }

    fn receipt() -> Receipt {
        Receipt {
            booking_id: BookingId(7),
            guest_name: "Alice Smith".to_string(),
            guest_email: "a@x.com".to_string(),
            room_number: "108".to_string(),
            room_type: "Family Suite".to_string(),
            check_in: NaiveDate::from_ymd_opt(2025, 1, 10).expect("date"),
            check_out: NaiveDate::from_ymd_opt(2025, 1, 13).expect("date"),
            nightly_rate: Decimal::new(420_000, 2),
            nights: 3,
            total: Decimal::new(1_260_000, 2),
        }
    }

    #[tokio::test]
    async fn receipt_renders_html_without_wkhtmltopdf() {
        let document = renderer().render_receipt(&receipt()).await.expect("render");

        assert_eq!(document.file_name(), "receipt_Alice_Smith_7.html");
        let DocumentBody::Html(html) = document.body else {
            panic!("expected HTML when conversion is disabled");
        };
        assert!(html.contains("Booking ID</td><td>#7"));
        assert!(html.contains("108 (Family Suite)"));
        assert!(html.contains("2025-01-10 to 2025-01-13"));
        assert!(html.contains("Rs. 4200.00"));
        assert!(html.contains("Rs. 12600.00"));
    }

    #[tokio::test]
    async fn daily_report_renders_and_saves() {
        let stats = DailyStats {
            as_of: NaiveDate::from_ymd_opt(2025, 1, 10).expect("date"),
            total_rooms: 10,
            total_bookings: 4,
            registered_guests: 4,
            occupied_rooms: 2,
            guests_in_house: 5,
            occupancy_rate: 0.2,
            revenue: Decimal::new(400_000, 2),
        };
        let document = renderer().render_daily_report(&stats).await.expect("render");
        let DocumentBody::Html(html) = &document.body else {
            panic!("expected HTML");
        };
        assert!(html.contains("20.0% (2/10 rooms)"));
        assert!(html.contains("Rs. 4000.00"));

        let dir = tempfile::tempdir().expect("tempdir");
        let path = document.save(&dir.path().join("reports")).await.expect("save");
        assert!(path.ends_with("daily_report_2025-01-10.html"));
        assert!(path.exists());
    }
}
