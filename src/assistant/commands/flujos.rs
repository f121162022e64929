//! Comandos que abren un flujo de varios turnos

use super::{CommandArgs, CommandHandler};
use crate::assistant::flows::{producto, reporte, venta};
use crate::assistant::turn::Turn;

pub struct RegistrarProductoCommand;

#[async_trait::async_trait]
impl CommandHandler for RegistrarProductoCommand {
    fn name(&self) -> &str {
        "registrarProducto"
    }

    fn description(&self) -> &str {
        "Registra un producto nuevo paso a paso"
    }

    fn pattern(&self) -> &str {
        r"(?:registrar|crear|agregar|a[ñn]adir|nuevo)\s+(?:un\s+)?producto(?:\s+(.+))?"
    }

    async fn execute(&self, args: &CommandArgs, turn: &mut Turn<'_>) {
        producto::start(turn, args.get(1));
    }
}

pub struct RegistrarVentaCommand;

#[async_trait::async_trait]
impl CommandHandler for RegistrarVentaCommand {
    fn name(&self) -> &str {
        "registrarVenta"
    }

    fn description(&self) -> &str {
        "Registra una venta paso a paso"
    }

    fn pattern(&self) -> &str {
        r"(?:registrar|nueva|hacer|anotar|agregar)\s+(?:una\s+)?venta\b"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        venta::start(turn).await;
    }
}

pub struct GenerarReporteCommand;

#[async_trait::async_trait]
impl CommandHandler for GenerarReporteCommand {
    fn name(&self) -> &str {
        "generarReporte"
    }

    fn description(&self) -> &str {
        "Exporta un reporte en PDF o Excel"
    }

    fn pattern(&self) -> &str {
        r"(?:generar|crear|sacar|hacer|exportar)\s+(?:un\s+|el\s+)?reporte(?:\s+del?\s+(\w+))?"
    }

    async fn execute(&self, args: &CommandArgs, turn: &mut Turn<'_>) {
        reporte::start(turn, args.get(1));
    }
}
