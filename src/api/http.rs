//! `reqwest` implementation of [`LabelApi`].

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::LabelApi;
use crate::error::LabelgateError;
use crate::print::{PrintReceipt, PrintRequest};
use crate::printer::PrinterRecord;
use crate::template::{TemplateDetail, TemplateSummary};

#[derive(Debug, Deserialize)]
struct PrinterList {
    #[serde(default)]
    printers: Vec<PrinterRecord>,
}

/// HTTP client for a label gateway rooted at a base URL.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpApi {
    /// Create a client for `base_url` (e.g. `http://gateway:8000/api`).
    pub fn new(base_url: &str) -> Result<Self, LabelgateError> {
        let base = Url::parse(base_url)
            .map_err(|e| LabelgateError::Config(format!("Invalid API base '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(LabelgateError::Config(format!(
                "API base '{}' cannot be used as a base URL",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .user_agent("labelgate/0.1")
            .build()
            .map_err(|e| LabelgateError::Transport(format!("HTTP client error: {}", e)))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL extended by `segments`, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, LabelgateError> {
        let response = request
            .send()
            .await
            .map_err(|e| LabelgateError::Transport(format!("Request failed: {}", e)))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, "gateway rejected request");
        Err(LabelgateError::api(status.as_u16(), body))
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, LabelgateError> {
        let bytes = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(|e| LabelgateError::Transport(format!("Failed to read response: {}", e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LabelApi for HttpApi {
    async fn list_printers(&self) -> Result<Vec<PrinterRecord>, LabelgateError> {
        let url = self.endpoint(&["v1", "printers"]);
        let list: PrinterList = self.json(self.client.get(url)).await?;
        Ok(list.printers)
    }

    async fn put_printer(&self, printer: &PrinterRecord) -> Result<(), LabelgateError> {
        let url = self.endpoint(&["v1", "printers", printer.id.as_str()]);
        self.send(self.client.put(url).json(printer)).await?;
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<TemplateSummary>, LabelgateError> {
        let url = self.endpoint(&["v1", "templates"]);
        self.json(self.client.get(url)).await
    }

    async fn template_detail(&self, template_id: &str) -> Result<TemplateDetail, LabelgateError> {
        let url = self.endpoint(&["v1", "templates", template_id]);
        self.json(self.client.get(url)).await
    }

    async fn print_template(
        &self,
        printer_id: &str,
        request: &PrintRequest,
    ) -> Result<PrintReceipt, LabelgateError> {
        let url = self.endpoint(&["v1", "printers", printer_id, "prints", "template"]);
        self.json(self.client.post(url).json(request)).await
    }
}
