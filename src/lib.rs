//! Asistente - asistente conversacional para el back-office de un restaurante
//!
//! Recibe frases del operador (dictadas o escritas), las enruta a comandos
//! de consulta o a flujos guiados de varios turnos y habla con el backend
//! del restaurante por HTTP.
//!
//! # Módulos Principales
//!
//! - [`assistant`] - Procesador de comandos, flujos y sugerencias
//! - [`api`] - Cliente tipado del backend (`BackendApi`, `HttpBackend`)
//! - [`config`] - Configuración JSON con overrides por entorno
//! - [`logging`] - Log de sesión en archivo
//!
//! # Ejemplo de Uso
//!
//! ```rust,no_run
//! use asistente::api::HttpBackend;
//! use asistente::assistant::{AssistantSettings, CommandProcessor, Session};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = HttpBackend::new("http://localhost:5000", Duration::from_secs(30))?;
//! let processor = CommandProcessor::new(Arc::new(backend), AssistantSettings::default());
//!
//! let mut session = Session::new();
//! let report = processor.process(&mut session, "¿cuánto se vendió hoy?").await;
//! for reply in &report.replies {
//!     println!("{}", reply);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod assistant;
pub mod config;
pub mod logging;

pub use api::{ApiError, BackendApi, HttpBackend};
pub use assistant::{CommandProcessor, Session, TurnReport};
pub use config::{AppConfig, ConfigError};
