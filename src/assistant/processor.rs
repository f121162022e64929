//! Procesador de comandos
//!
//! Recibe cada entrada del operador y decide, en orden fijo, quién la
//! atiende: cancelación, sugerencias pendientes, flujo activo, tabla de
//! comandos, frase de cierre y por último el mensaje de "no entendí".
//! Exactamente una de esas rutas responde en cada llamada.

use super::commands::{CommandMatch, CommandTable};
use super::flows::FlowRegistry;
use super::normalizer::normalize;
use super::responses::{CANCELLED, FAREWELL, NOT_UNDERSTOOD};
use super::state::{FlowKind, Message, MessageKind, Session};
use super::suggestions::{enumerate, resolve};
use super::turn::{AssistantSettings, Turn};
use crate::api::BackendApi;
use crate::logging;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

const CLOSING_PHRASE: &str = "cerrar asistente";

lazy_static! {
    static ref CANCEL: Regex = Regex::new(r"cancelar|detener|salir").expect("cancel regex");
}

/// Ruta que atendió la entrada
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "ruta", content = "detalle", rename_all = "camelCase")]
pub enum Route {
    Cancelled,
    Flow(FlowKind),
    SuggestionRetry,
    Command(String),
    Closed,
    NotUnderstood,
}

/// Resultado de procesar una entrada
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub route: Route,
    /// Mensajes del asistente agregados en esta llamada, en orden
    pub replies: Vec<String>,
    pub duration_ms: u64,
    /// El operador pidió cerrar el asistente
    pub close_requested: bool,
}

pub struct CommandProcessor {
    api: Arc<dyn BackendApi>,
    table: CommandTable,
    flows: FlowRegistry,
    settings: AssistantSettings,
}

impl CommandProcessor {
    pub fn new(api: Arc<dyn BackendApi>, settings: AssistantSettings) -> Self {
        Self::with_table(api, settings, CommandTable::new())
    }

    pub fn with_table(
        api: Arc<dyn BackendApi>,
        settings: AssistantSettings,
        table: CommandTable,
    ) -> Self {
        Self {
            api,
            table,
            flows: FlowRegistry::new(),
            settings,
        }
    }

    /// Procesa una entrada del operador sobre la sesión
    pub async fn process(&self, session: &mut Session, raw: &str) -> TurnReport {
        let started = Instant::now();
        session.push(Message::usuario(raw));
        let before = session.messages().len();

        let route = self.dispatch(session, raw).await;

        let duration_ms = started.elapsed().as_millis() as u64;
        session.attach_duration(before, duration_ms);

        let replies = session.messages()[before..]
            .iter()
            .filter(|m| m.tipo == MessageKind::Asistente)
            .map(|m| m.texto.clone())
            .collect();

        tracing::debug!("ruta {:?} en {} ms", route, duration_ms);
        let report = TurnReport {
            close_requested: route == Route::Closed,
            route,
            replies,
            duration_ms,
        };
        logging::record_turn(&session.id, raw, &report);
        report
    }

    async fn dispatch(&self, session: &mut Session, input: &str) -> Route {
        if self.cancels(session, input) {
            return Route::Cancelled;
        }

        let flow = session.flow().cloned();

        // pending suggestions win over the flow only at disambiguation steps
        if let Some(pending) = session.suggestions().map(<[_]>::to_vec) {
            let eligible = flow
                .as_ref()
                .map_or(true, |f| f.step().accepts_suggestions());
            if eligible {
                if let Some(chosen) = resolve(input, &pending) {
                    let replay = chosen.replay_text().to_string();
                    self.turn(session).finish();
                    // flow and suggestions are cleared, so the replay cannot chain
                    tracing::debug!("reprocesando sugerencia: {}", replay);
                    if self.cancels(session, &replay) {
                        return Route::Cancelled;
                    }
                    return self.dispatch_without_state(session, &replay).await;
                }
                if flow.is_none() {
                    self.turn(session).emit(format!(
                        "No encontré esa opción. Elige una de estas:\n{}\n(o di «cancelar»)",
                        enumerate(&pending)
                    ));
                    return Route::SuggestionRetry;
                }
            }
        }

        if let Some(flow) = flow {
            let kind = flow.kind();
            let mut turn = self.turn(session);
            self.flows.dispatch(input, flow, &mut turn).await;
            return Route::Flow(kind);
        }

        self.dispatch_without_state(session, input).await
    }

    /// Cancela lo que haya en curso si la entrada lo pide
    fn cancels(&self, session: &mut Session, input: &str) -> bool {
        if !CANCEL.is_match(&normalize(input)) {
            return false;
        }
        let mut turn = self.turn(session);
        turn.finish();
        turn.emit(CANCELLED);
        true
    }

    /// Rutas que no dependen de flujo ni sugerencias
    async fn dispatch_without_state(&self, session: &mut Session, input: &str) -> Route {
        if let CommandMatch::Matched { handler, args } = self.table.find(input) {
            tracing::debug!("comando {}", handler.name());
            let mut turn = self.turn(session);
            handler.execute(&args, &mut turn).await;
            return Route::Command(handler.name().to_string());
        }

        if normalize(input).contains(CLOSING_PHRASE) {
            self.turn(session).emit(FAREWELL);
            return Route::Closed;
        }

        self.turn(session).emit(NOT_UNDERSTOOD);
        Route::NotUnderstood
    }

    fn turn<'a>(&'a self, session: &'a mut Session) -> Turn<'a> {
        Turn::new(session, self.api.as_ref(), &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_pattern_on_normalized_text() {
        assert!(CANCEL.is_match(&normalize("¡Cancelar!")));
        assert!(CANCEL.is_match(&normalize("quiero salir de esto")));
        assert!(!CANCEL.is_match(&normalize("cerrar asistente")));
    }

    #[test]
    fn test_route_serializes_with_detail() {
        let json = serde_json::to_value(Route::Command("ventasHoy".into())).unwrap();
        assert_eq!(json["ruta"], "command");
        assert_eq!(json["detalle"], "ventasHoy");
    }
}
