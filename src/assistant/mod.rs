//! Núcleo conversacional del asistente
//!
//! - [`normalizer`] - normalización de texto hablado o escrito
//! - [`state`] - sesión, flujo activo y sugerencias pendientes
//! - [`commands`] - tabla de comandos estáticos
//! - [`flows`] - flujos de varios turnos (producto, venta, reporte)
//! - [`processor`] - orquestador que decide quién atiende cada entrada

pub mod closing;
pub mod commands;
pub mod flows;
pub mod normalizer;
pub mod processor;
pub mod responses;
pub mod state;
pub mod suggestions;
pub mod turn;

pub use closing::DailyClosing;
pub use commands::{CommandArgs, CommandHandler, CommandMatch, CommandTable};
pub use flows::{FlowHandler, FlowRegistry};
pub use normalizer::normalize;
pub use processor::{CommandProcessor, Route, TurnReport};
pub use state::{ActiveFlow, FlowError, FlowKind, FlowStep, Message, MessageKind, Session, Suggestion};
pub use turn::{AssistantSettings, Turn};
