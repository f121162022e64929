//! Flujos de varios turnos
//!
//! Cada flujo valida la entrada contra el paso actual, guarda el dato en
//! `flow.data` y avanza; una entrada inválida repite la pregunta sin cambiar
//! de paso. El último paso llama al backend y termina el flujo pase lo que
//! pase con la petición.

use super::normalizer::normalize;
use super::state::{ActiveFlow, FlowError, FlowKind, Suggestion};
use super::suggestions::resolve;
use super::turn::Turn;
use lazy_static::lazy_static;
use regex::Regex;

pub mod producto;
pub mod reporte;
pub mod venta;

pub use producto::ProductoFlow;
pub use reporte::ReporteFlow;
pub use venta::VentaFlow;

/// Campo de `flow.data` con las opciones ofrecidas en el paso actual
pub(crate) const OPTIONS: &str = "opciones";

/// Manejador de los pasos de un tipo de flujo
#[async_trait::async_trait]
pub trait FlowHandler: Send + Sync {
    fn kind(&self) -> FlowKind;

    /// Consume la entrada para el paso actual de `flow`
    async fn handle(&self, raw: &str, flow: ActiveFlow, turn: &mut Turn<'_>);
}

/// Enruta cada flujo activo al manejador de su tipo
pub struct FlowRegistry {
    handlers: Vec<Box<dyn FlowHandler>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(ProductoFlow),
                Box::new(VentaFlow),
                Box::new(ReporteFlow),
            ],
        }
    }

    pub fn get(&self, kind: FlowKind) -> Option<&dyn FlowHandler> {
        self.handlers
            .iter()
            .find(|h| h.kind() == kind)
            .map(|h| h.as_ref())
    }

    pub async fn dispatch(&self, raw: &str, flow: ActiveFlow, turn: &mut Turn<'_>) {
        match self.get(flow.kind()) {
            Some(handler) => {
                tracing::debug!("flujo {} en paso {}", flow.kind(), flow.step());
                handler.handle(raw, flow, turn).await;
            }
            None => {
                tracing::error!("sin manejador para el flujo {}", flow.kind());
                turn.finish();
            }
        }
    }
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Instala el flujo resultante de una transición; si la transición no es
/// válida, termina el flujo e informa el error.
pub(crate) fn commit(turn: &mut Turn<'_>, next: Result<ActiveFlow, FlowError>) -> bool {
    match next {
        Ok(flow) => {
            turn.set_flow(Some(flow));
            true
        }
        Err(e) => {
            tracing::error!("transición inválida: {}", e);
            turn.finish();
            turn.emit(format!("❌ Se perdió el hilo de la operación ({}). Empecemos de nuevo.", e));
            false
        }
    }
}

const YES: [&str; 17] = [
    "sí", "si", "dale", "ok", "okay", "confirmo", "confirmar", "correcto", "claro", "afirmativo",
    "listo", "bueno", "adelante", "exacto", "crear", "créalo", "crealo",
];

const NO: [&str; 5] = ["no", "negativo", "nop", "nel", "tampoco"];

/// Interpreta una respuesta de sí/no
pub fn parse_confirmation(input: &str) -> Option<bool> {
    let text = normalize(input);
    if text == "de acuerdo" || text.starts_with("de acuerdo ") {
        return Some(true);
    }
    let first = text.split(' ').next()?;
    if YES.contains(&first) {
        Some(true)
    } else if NO.contains(&first) {
        Some(false)
    } else {
        None
    }
}

/// Busca un alias (palabra o frase completa) dentro de la entrada
pub fn match_alias<T: Copy>(input: &str, aliases: &[(&str, T)]) -> Option<T> {
    let padded = format!(" {} ", normalize(input));
    aliases
        .iter()
        .find(|(alias, _)| padded.contains(&format!(" {} ", alias)))
        .map(|(_, value)| *value)
}

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"(\d+(?:[.,]\d+)?)").expect("number regex");
}

const NUMBER_WORDS: [(&str, f64); 17] = [
    ("medio", 0.5),
    ("media", 0.5),
    ("un", 1.0),
    ("uno", 1.0),
    ("una", 1.0),
    ("dos", 2.0),
    ("tres", 3.0),
    ("cuatro", 4.0),
    ("cinco", 5.0),
    ("seis", 6.0),
    ("siete", 7.0),
    ("ocho", 8.0),
    ("nueve", 9.0),
    ("diez", 10.0),
    ("once", 11.0),
    ("doce", 12.0),
    ("veinte", 20.0),
];

fn number_word(token: &str) -> Option<f64> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, value)| *value)
}

/// Cantidad hablada o escrita: "3", "2,5", "tres", "media docena"
pub fn parse_quantity(raw: &str) -> Option<f64> {
    if let Some(found) = NUMBER.captures(raw).and_then(|c| c.get(1)) {
        let digits = found.as_str().replace(',', ".");
        let value: f64 = digits.parse().ok()?;
        let text = normalize(raw);
        if text.contains("docena") {
            return Some(value * 12.0);
        }
        return Some(value);
    }

    let text = normalize(raw);
    let tokens: Vec<&str> = text.split(' ').collect();

    if let Some(pos) = tokens.iter().position(|t| t.starts_with("docena")) {
        let multiplier = pos
            .checked_sub(1)
            .and_then(|prev| number_word(tokens[prev]))
            .unwrap_or(1.0);
        return Some(multiplier * 12.0);
    }

    tokens.iter().find_map(|t| number_word(t))
}

/// Guarda las opciones ofrecidas en el paso actual
pub(crate) fn store_options(flow: &mut ActiveFlow, options: &[Suggestion]) {
    flow.set_typed(OPTIONS, &options);
}

pub(crate) fn stored_options(flow: &ActiveFlow) -> Vec<Suggestion> {
    flow.get(OPTIONS).unwrap_or_default()
}

/// Elige una opción por etiqueta, id o posición
pub(crate) fn choose(input: &str, options: &[Suggestion]) -> Option<Suggestion> {
    resolve(input, options).cloned()
}
