//! Capacidades que un comando o flujo tiene durante un turno

use super::state::{ActiveFlow, Message, Session, Suggestion};
use crate::api::BackendApi;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Ajustes del asistente que necesitan los manejadores
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    /// Carpeta donde se guardan los reportes exportados
    pub reports_dir: PathBuf,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reportes"),
        }
    }
}

/// Lo único que un manejador puede hacer: emitir mensajes, cambiar el flujo
/// activo, cambiar las sugerencias y llamar al backend.
pub struct Turn<'a> {
    session: &'a mut Session,
    api: &'a dyn BackendApi,
    settings: &'a AssistantSettings,
}

impl<'a> Turn<'a> {
    pub fn new(
        session: &'a mut Session,
        api: &'a dyn BackendApi,
        settings: &'a AssistantSettings,
    ) -> Self {
        Self {
            session,
            api,
            settings,
        }
    }

    /// Agrega un mensaje del asistente a la transcripción
    pub fn emit(&mut self, text: impl Into<String>) {
        let message = Message::asistente(text);
        tracing::debug!("asistente: {}", message.texto);
        self.session.push(message);
    }

    /// Reporta un fallo del backend como mensaje visible
    pub fn fail(&mut self, action: &str, error: &dyn Display) {
        tracing::warn!("No se pudo {}: {}", action, error);
        self.emit(format!("❌ No pude {}: {}", action, error));
    }

    pub fn flow(&self) -> Option<&ActiveFlow> {
        self.session.flow()
    }

    pub fn set_flow(&mut self, flow: Option<ActiveFlow>) {
        self.session.set_flow(flow);
    }

    pub fn suggestions(&self) -> Option<&[Suggestion]> {
        self.session.suggestions()
    }

    pub fn set_suggestions(&mut self, suggestions: Option<Vec<Suggestion>>) {
        self.session.set_suggestions(suggestions);
    }

    /// Termina el flujo y descarta sugerencias pendientes
    pub fn finish(&mut self) {
        self.session.set_flow(None);
        self.session.set_suggestions(None);
    }

    pub fn api(&self) -> &'a dyn BackendApi {
        self.api
    }

    pub fn reports_dir(&self) -> &Path {
        &self.settings.reports_dir
    }
}
