//! Cierre de caja del día

use super::{CommandArgs, CommandHandler};
use crate::api::Period;
use crate::assistant::closing::DailyClosing;
use crate::assistant::turn::Turn;

pub struct CierreCajaCommand;

#[async_trait::async_trait]
impl CommandHandler for CierreCajaCommand {
    fn name(&self) -> &str {
        "cierreCaja"
    }

    fn description(&self) -> &str {
        "Cuadra ventas, gastos y compras del día"
    }

    fn pattern(&self) -> &str {
        r"cierre\s+(?:de\s+(?:la\s+)?caja|diario|del\s+d[ií]a)|cuadrar\s+(?:la\s+)?caja|cerrar\s+(?:la\s+)?caja"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        let api = turn.api();
        let (ventas, gastos, compras) = tokio::join!(
            api.sales_summary(Period::Hoy),
            api.expenses_summary(Period::Hoy),
            api.purchases_summary(Period::Hoy),
        );

        match (ventas, gastos, compras) {
            (Ok(ventas), Ok(gastos), Ok(compras)) => {
                let closing = DailyClosing::reconcile(ventas, gastos, compras);
                tracing::info!("Cierre de caja: balance {:.2}", closing.balance);
                turn.emit(closing.render());
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                turn.fail("calcular el cierre de caja", &e);
            }
        }
    }
}
