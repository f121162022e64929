//! Tabla de comandos estáticos
//!
//! Lista ordenada de patrones (regex, sin distinguir mayúsculas) con su
//! manejador. Se evalúa sobre el texto crudo y gana la primera coincidencia.

use super::turn::Turn;
use regex::{Regex, RegexBuilder};

mod ayuda;
mod cierre;
mod flujos;
pub(crate) mod inventario;
mod resumenes;

pub use ayuda::{AyudaCommand, SaludoCommand};
pub use cierre::CierreCajaCommand;
pub use flujos::{GenerarReporteCommand, RegistrarProductoCommand, RegistrarVentaCommand};
pub use inventario::{StockBajoCommand, VerProductoCommand};
pub use resumenes::{ComprasHoyCommand, GastosHoyCommand, VentasHoyCommand, VentasPeriodoCommand};

/// Grupos capturados por el patrón, ya copiados del texto de entrada
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    groups: Vec<Option<String>>,
}

impl CommandArgs {
    pub fn from_captures(captures: &regex::Captures<'_>) -> Self {
        Self {
            groups: captures
                .iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    pub fn from_groups(groups: Vec<Option<String>>) -> Self {
        Self { groups }
    }

    /// Grupo `idx` (desde 1) recortado; `None` si no participó o está vacío
    pub fn get(&self, idx: usize) -> Option<&str> {
        idx.checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .and_then(|g| g.as_deref())
            .map(clean_argument)
            .filter(|s| !s.is_empty())
    }

    /// Primer grupo que participó en la coincidencia
    pub fn first(&self) -> Option<&str> {
        (1..=self.groups.len()).find_map(|idx| self.get(idx))
    }
}

/// Quita espacios y puntuación de los extremos de un argumento hablado
pub fn clean_argument(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ".,;:!?¡¿\"'«»".contains(c))
}

/// Trait que implementan todos los comandos estáticos
#[async_trait::async_trait]
pub trait CommandHandler: Send + Sync {
    /// Nombre del comando (p. ej. `ventasHoy`)
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Patrón regex evaluado sobre el texto crudo
    fn pattern(&self) -> &str;

    /// Ejecuta el comando. Los fallos se informan con `turn.fail`.
    async fn execute(&self, args: &CommandArgs, turn: &mut Turn<'_>);
}

struct CommandEntry {
    pattern: Regex,
    handler: Box<dyn CommandHandler>,
}

/// Resultado de buscar en la tabla
pub enum CommandMatch<'t> {
    Matched {
        handler: &'t dyn CommandHandler,
        args: CommandArgs,
    },
    NoMatch,
}

impl CommandMatch<'_> {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Matched { handler, .. } => Some(handler.name()),
            Self::NoMatch => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid pattern for command {name}: {source}")]
pub struct PatternError {
    name: String,
    #[source]
    source: regex::Error,
}

/// Tabla ordenada de comandos
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Tabla con todos los comandos del asistente, en orden de prioridad
    pub fn new() -> Self {
        let mut table = Self::empty();
        let defaults: Vec<Box<dyn CommandHandler>> = vec![
            Box::new(AyudaCommand),
            Box::new(RegistrarProductoCommand),
            Box::new(RegistrarVentaCommand),
            Box::new(GenerarReporteCommand),
            Box::new(VentasHoyCommand),
            Box::new(VentasPeriodoCommand),
            Box::new(GastosHoyCommand),
            Box::new(ComprasHoyCommand),
            Box::new(CierreCajaCommand),
            Box::new(StockBajoCommand),
            Box::new(VerProductoCommand),
            Box::new(SaludoCommand),
        ];

        for handler in defaults {
            if let Err(e) = table.register(handler) {
                // built-in patterns are literals covered by tests
                tracing::error!("{}", e);
            }
        }
        table
    }

    /// Agrega un comando al final de la tabla
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) -> Result<(), PatternError> {
        let pattern = RegexBuilder::new(handler.pattern())
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError {
                name: handler.name().to_string(),
                source,
            })?;
        tracing::debug!("comando {}: {}", handler.name(), handler.description());
        self.entries.push(CommandEntry { pattern, handler });
        Ok(())
    }

    /// Primer comando cuyo patrón coincide con el texto crudo
    pub fn find(&self, raw: &str) -> CommandMatch<'_> {
        for entry in &self.entries {
            if let Some(captures) = entry.pattern.captures(raw) {
                return CommandMatch::Matched {
                    handler: entry.handler.as_ref(),
                    args: CommandArgs::from_captures(&captures),
                };
            }
        }
        CommandMatch::NoMatch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}
