//! Backend falso para los tests de integración

#![allow(dead_code)]

use asistente::api::{
    ApiError, BackendApi, Category, NewProduct, NewSale, Period, Product, ReportRequest, Sale,
    Summary,
};
use asistente::assistant::{AssistantSettings, CommandProcessor, CommandTable};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Llamada registrada por el backend falso
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListCategories,
    ListProducts,
    ProductsByCategory(String),
    CreateProduct(NewProduct),
    CreateSale(NewSale),
    SalesSummary(Period),
    ExpensesSummary(Period),
    PurchasesSummary(Period),
    LowStock,
    ExportReport(ReportRequest),
}

const READS: [&str; 8] = [
    "list_categories",
    "list_products",
    "products_by_category",
    "sales_summary",
    "expenses_summary",
    "purchases_summary",
    "low_stock",
    "export_report",
];

const WRITES: [&str; 2] = ["create_product", "create_sale"];

pub struct FakeBackend {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub sales: Summary,
    pub expenses: Summary,
    pub purchases: Summary,
    pub report: Vec<u8>,
    failing: HashSet<&'static str>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            categories: vec![category("1", "Verduras"), category("2", "Bebidas")],
            products: vec![
                product("10", "Tomate", "1", 3.0, 800.0),
                product("11", "Tomate cherry", "1", 1.0, 1500.0),
                product("12", "Lechuga", "1", 10.0, 600.0),
                product("20", "Jugo natural", "2", 30.0, 2500.0),
            ],
            sales: Summary {
                total: 150000.0,
                cantidad: 42,
            },
            expenses: Summary {
                total: 20000.0,
                cantidad: 3,
            },
            purchases: Summary {
                total: 45000.0,
                cantidad: 2,
            },
            report: b"%PDF-1.4 fake".to_vec(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hace fallar una operación, por nombre de método
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Hace fallar las peticiones que crean registros
    pub fn failing_writes(self) -> Self {
        WRITES.into_iter().fold(self, Self::failing_on)
    }

    /// Hace fallar todas las consultas, exportación incluida
    pub fn failing_reads(self) -> Self {
        READS.into_iter().fold(self, Self::failing_on)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call, operation: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(operation) {
            Err(ApiError::Status {
                status: 500,
                body: "error interno".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn category(id: &str, nombre: &str) -> Category {
    Category {
        id: id.to_string(),
        nombre: nombre.to_string(),
    }
}

pub fn product(id: &str, nombre: &str, categoria: &str, stock: f64, precio: f64) -> Product {
    Product {
        id: id.to_string(),
        nombre: nombre.to_string(),
        tipo: None,
        categoria_id: Some(categoria.to_string()),
        unidad: Some("unidad".to_string()),
        stock,
        stock_minimo: 5.0,
        precio,
        activo: true,
    }
}

#[async_trait::async_trait]
impl BackendApi for FakeBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record(Call::ListCategories, "list_categories")?;
        Ok(self.categories.clone())
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record(Call::ListProducts, "list_products")?;
        Ok(self.products.clone())
    }

    async fn products_by_category(&self, category_id: &str) -> Result<Vec<Product>, ApiError> {
        self.record(
            Call::ProductsByCategory(category_id.to_string()),
            "products_by_category",
        )?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.categoria_id.as_deref() == Some(category_id))
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.record(Call::CreateProduct(product.clone()), "create_product")?;
        Ok(Product {
            id: "99".to_string(),
            nombre: product.nombre.clone(),
            tipo: Some(product.tipo.label().to_string()),
            categoria_id: Some(product.categoria_id.clone()),
            unidad: Some(product.unidad.code().to_string()),
            stock: 0.0,
            stock_minimo: 0.0,
            precio: 0.0,
            activo: true,
        })
    }

    async fn create_sale(&self, sale: &NewSale) -> Result<Sale, ApiError> {
        self.record(Call::CreateSale(sale.clone()), "create_sale")?;
        Ok(Sale {
            id: "501".to_string(),
            total: sale.total,
        })
    }

    async fn sales_summary(&self, period: Period) -> Result<Summary, ApiError> {
        self.record(Call::SalesSummary(period), "sales_summary")?;
        Ok(self.sales.clone())
    }

    async fn expenses_summary(&self, period: Period) -> Result<Summary, ApiError> {
        self.record(Call::ExpensesSummary(period), "expenses_summary")?;
        Ok(self.expenses.clone())
    }

    async fn purchases_summary(&self, period: Period) -> Result<Summary, ApiError> {
        self.record(Call::PurchasesSummary(period), "purchases_summary")?;
        Ok(self.purchases.clone())
    }

    async fn low_stock(&self) -> Result<Vec<Product>, ApiError> {
        self.record(Call::LowStock, "low_stock")?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.stock < p.stock_minimo)
            .cloned()
            .collect())
    }

    async fn export_report(&self, request: &ReportRequest) -> Result<Vec<u8>, ApiError> {
        self.record(Call::ExportReport(request.clone()), "export_report")?;
        Ok(self.report.clone())
    }
}

/// Procesador sobre un backend falso compartido con el test
pub fn processor(backend: FakeBackend) -> (CommandProcessor, Arc<FakeBackend>) {
    processor_with_reports(backend, PathBuf::from("reportes"))
}

pub fn processor_with_reports(
    backend: FakeBackend,
    reports_dir: PathBuf,
) -> (CommandProcessor, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    let processor = CommandProcessor::new(backend.clone(), AssistantSettings { reports_dir });
    (processor, backend)
}

/// Procesador con una tabla de comandos propia
pub fn processor_with_table(
    backend: FakeBackend,
    table: CommandTable,
) -> (CommandProcessor, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    let processor = CommandProcessor::with_table(
        backend.clone(),
        AssistantSettings {
            reports_dir: PathBuf::from("reportes"),
        },
        table,
    );
    (processor, backend)
}
