//! Ayuda y saludo

use super::{CommandArgs, CommandHandler};
use crate::assistant::responses::{GREETING, HELP};
use crate::assistant::turn::Turn;

pub struct AyudaCommand;

#[async_trait::async_trait]
impl CommandHandler for AyudaCommand {
    fn name(&self) -> &str {
        "ayuda"
    }

    fn description(&self) -> &str {
        "Lista lo que puede hacer el asistente"
    }

    fn pattern(&self) -> &str {
        r"\b(?:ayuda|qu[eé] puedes hacer|comandos)\b"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        turn.emit(HELP);
    }
}

pub struct SaludoCommand;

#[async_trait::async_trait]
impl CommandHandler for SaludoCommand {
    fn name(&self) -> &str {
        "saludo"
    }

    fn description(&self) -> &str {
        "Responde un saludo"
    }

    fn pattern(&self) -> &str {
        r"^\W*(?:hola|buen(?:os|as)\s+(?:d[ií]as|tardes|noches))\b"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        turn.emit(GREETING);
    }
}
