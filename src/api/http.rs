//! Cliente HTTP del backend (reqwest + JSON)

use super::models::{
    Category, NewProduct, NewSale, Period, Product, ReportRequest, Sale, Summary,
};
use super::{ApiError, BackendApi};
use crate::config::ApiConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Cliente del backend con URL base, cabeceras por defecto y timeout
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    default_headers: HashMap<String, String>,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("asistente/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: HashMap::new(),
        })
    }

    /// Construye el cliente desde la configuración, resolviendo el token
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let backend = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        Ok(match config.resolve_token() {
            Some(token) => backend.with_bearer_token(&token),
            None => backend,
        })
    }

    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.default_headers
            .insert("Authorization".to_string(), format!("Bearer {}", token));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn apply_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (key, value) in &self.default_headers {
            request = request.header(key, value);
        }
        request
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = self
            .apply_headers(request)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(&url)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);
        let response = self.send(self.client.post(&url).json(body)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(endpoint);
        tracing::debug!("GET (blob) {}", url);
        let response = self.send(self.client.get(&url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl BackendApi for HttpBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json("categorias").await
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("productos").await
    }

    async fn products_by_category(&self, category_id: &str) -> Result<Vec<Product>, ApiError> {
        self.get_json(&format!("categorias/{}/productos", category_id))
            .await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.post_json("productos", product).await
    }

    async fn create_sale(&self, sale: &NewSale) -> Result<Sale, ApiError> {
        self.post_json("ventas", sale).await
    }

    async fn sales_summary(&self, period: Period) -> Result<Summary, ApiError> {
        self.get_json(&format!("ventas/resumen?periodo={}", period.as_str()))
            .await
    }

    async fn expenses_summary(&self, period: Period) -> Result<Summary, ApiError> {
        self.get_json(&format!("gastos/resumen?periodo={}", period.as_str()))
            .await
    }

    async fn purchases_summary(&self, period: Period) -> Result<Summary, ApiError> {
        self.get_json(&format!("compras/resumen?periodo={}", period.as_str()))
            .await
    }

    async fn low_stock(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("productos/stock-bajo").await
    }

    async fn export_report(&self, request: &ReportRequest) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!(
            "reportes/{}/{}?formato={}",
            request.modulo.as_str(),
            request.subreporte,
            request.formato.as_str()
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(backend.url("/productos"), "http://localhost:5000/productos");
        assert_eq!(
            backend.url("ventas/resumen?periodo=hoy"),
            "http://localhost:5000/ventas/resumen?periodo=hoy"
        );
    }

    #[test]
    fn test_bearer_token_header() {
        let backend = HttpBackend::new("http://localhost:5000", Duration::from_secs(5))
            .unwrap()
            .with_bearer_token("abc");
        assert_eq!(
            backend.default_headers.get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
    }

    #[test]
    fn test_from_config_without_token() {
        let config = ApiConfig::default();
        let backend = HttpBackend::from_config(&config).unwrap();
        assert!(backend.default_headers.is_empty());
    }
}
