//! Cliente del backend del restaurante
//!
//! Todo lo que el asistente necesita del backend pasa por [`BackendApi`].
//! La implementación real es [`HttpBackend`]; los tests usan un fake en
//! memoria que implementa el mismo trait.

mod http;
pub mod models;

pub use http::HttpBackend;
pub use models::{
    Category, NewProduct, NewSale, PaymentMethod, Period, Product, ProductType, ReportFormat,
    ReportModule, ReportRequest, Sale, Summary, Unit,
};

/// Errores del cliente HTTP
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Backend respondió {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Operaciones del backend que usan los comandos y flujos
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    async fn products_by_category(&self, category_id: &str) -> Result<Vec<Product>, ApiError>;

    async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError>;

    async fn create_sale(&self, sale: &NewSale) -> Result<Sale, ApiError>;

    async fn sales_summary(&self, period: Period) -> Result<Summary, ApiError>;

    async fn expenses_summary(&self, period: Period) -> Result<Summary, ApiError>;

    async fn purchases_summary(&self, period: Period) -> Result<Summary, ApiError>;

    /// Productos con stock por debajo del mínimo
    async fn low_stock(&self) -> Result<Vec<Product>, ApiError>;

    /// Descarga un reporte exportado (PDF o Excel) como bytes
    async fn export_report(&self, request: &ReportRequest) -> Result<Vec<u8>, ApiError>;
}
