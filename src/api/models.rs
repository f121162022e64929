//! Modelos del backend del restaurante
//!
//! Reflejan el JSON que expone el backend (nombres de campo en español).
//! Los identificadores pueden llegar como número o como texto según el
//! endpoint, así que se normalizan siempre a `String`.

use serde::{Deserialize, Deserializer, Serialize};

fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn opt_id_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

fn default_true() -> bool {
    true
}

/// Categoría de productos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub nombre: String,
}

/// Producto del inventario o de la carta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default, deserialize_with = "opt_id_from_any")]
    pub categoria_id: Option<String>,
    #[serde(default)]
    pub unidad: Option<String>,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub stock_minimo: f64,
    #[serde(default)]
    pub precio: f64,
    #[serde(default = "default_true")]
    pub activo: bool,
}

/// Tipo de producto que se puede registrar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Insumo,
    Elaborado,
    Bebida,
}

impl ProductType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Insumo => "insumo",
            Self::Elaborado => "elaborado",
            Self::Bebida => "bebida",
        }
    }
}

/// Unidad de medida del inventario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "unidad")]
    Unidad,
    #[serde(rename = "kg")]
    Kilogramo,
    #[serde(rename = "g")]
    Gramo,
    #[serde(rename = "l")]
    Litro,
    #[serde(rename = "ml")]
    Mililitro,
    #[serde(rename = "porcion")]
    Porcion,
}

impl Unit {
    pub const ALL: [Unit; 6] = [
        Self::Unidad,
        Self::Kilogramo,
        Self::Gramo,
        Self::Litro,
        Self::Mililitro,
        Self::Porcion,
    ];

    /// Código que espera el backend
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unidad => "unidad",
            Self::Kilogramo => "kg",
            Self::Gramo => "g",
            Self::Litro => "l",
            Self::Mililitro => "ml",
            Self::Porcion => "porcion",
        }
    }

    /// Nombre hablado
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unidad => "unidad",
            Self::Kilogramo => "kilogramo",
            Self::Gramo => "gramo",
            Self::Litro => "litro",
            Self::Mililitro => "mililitro",
            Self::Porcion => "porción",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.code() == code)
    }
}

/// Producto nuevo enviado a `POST /productos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub nombre: String,
    pub tipo: ProductType,
    pub categoria_id: String,
    pub unidad: Unit,
}

/// Medio de pago de una venta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Efectivo,
    Tarjeta,
    Transferencia,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Efectivo => "efectivo",
            Self::Tarjeta => "tarjeta",
            Self::Transferencia => "transferencia",
        }
    }
}

/// Venta nueva enviada a `POST /ventas`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub producto_id: String,
    pub cantidad: f64,
    pub precio_unitario: f64,
    pub total: f64,
    pub metodo_pago: PaymentMethod,
}

/// Venta registrada por el backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub total: f64,
}

/// Periodo de un resumen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Hoy,
    Semana,
    Mes,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hoy => "hoy",
            Self::Semana => "semana",
            Self::Mes => "mes",
        }
    }

    /// Texto para respuestas ("hoy", "esta semana", "este mes")
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Hoy => "hoy",
            Self::Semana => "esta semana",
            Self::Mes => "este mes",
        }
    }
}

/// Resumen agregado de ventas, gastos o compras
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub cantidad: u64,
}

/// Módulo del que se puede sacar un reporte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportModule {
    Ventas,
    Compras,
    Gastos,
    Inventario,
    Cierre,
}

impl ReportModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ventas => "ventas",
            Self::Compras => "compras",
            Self::Gastos => "gastos",
            Self::Inventario => "inventario",
            Self::Cierre => "cierre",
        }
    }

    /// Subreportes disponibles: (slug del endpoint, nombre hablado)
    pub fn subreports(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Ventas => &[
                ("diario", "diario"),
                ("semanal", "semanal"),
                ("mensual", "mensual"),
                ("por-producto", "por producto"),
            ],
            Self::Compras => &[
                ("diario", "diario"),
                ("mensual", "mensual"),
                ("por-proveedor", "por proveedor"),
            ],
            Self::Gastos => &[
                ("diario", "diario"),
                ("mensual", "mensual"),
                ("por-categoria", "por categoría"),
            ],
            Self::Inventario => &[
                ("stock-actual", "stock actual"),
                ("stock-bajo", "stock bajo"),
                ("movimientos", "movimientos"),
            ],
            Self::Cierre => &[("diario", "diario"), ("mensual", "mensual")],
        }
    }
}

/// Formato de exportación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Excel,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }
}

/// Pedido de exportación de un reporte
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub modulo: ReportModule,
    pub subreporte: String,
    pub formato: ReportFormat,
}

impl ReportRequest {
    /// Nombre de archivo sugerido, p. ej. `ventas-diario.pdf`
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.modulo.as_str(),
            self.subreporte,
            self.formato.extension()
        )
    }
}
