//! Resúmenes de ventas, gastos y compras

use super::{CommandArgs, CommandHandler};
use crate::api::Period;
use crate::assistant::normalizer::normalize;
use crate::assistant::responses::money;
use crate::assistant::turn::Turn;

async fn report_sales(period: Period, turn: &mut Turn<'_>) {
    match turn.api().sales_summary(period).await {
        Ok(summary) => {
            let phrase = period.phrase();
            if summary.cantidad == 0 {
                turn.emit(format!("📉 No hay ventas registradas {}.", phrase));
            } else {
                turn.emit(format!(
                    "💰 Ventas de {}: {} en {} ventas.",
                    phrase,
                    money(summary.total),
                    summary.cantidad
                ));
            }
        }
        Err(e) => turn.fail("consultar las ventas", &e),
    }
}

pub struct VentasHoyCommand;

#[async_trait::async_trait]
impl CommandHandler for VentasHoyCommand {
    fn name(&self) -> &str {
        "ventasHoy"
    }

    fn description(&self) -> &str {
        "Total vendido hoy"
    }

    fn pattern(&self) -> &str {
        r"(?:cu[aá]nto|qu[eé])\s+(?:se\s+)?(?:ha\s+|hemos\s+)?vend(?:i[oó]|ido|imos)\s+hoy|ventas\s+de\s+hoy|ventas\s+del\s+d[ií]a"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        report_sales(Period::Hoy, turn).await;
    }
}

pub struct VentasPeriodoCommand;

#[async_trait::async_trait]
impl CommandHandler for VentasPeriodoCommand {
    fn name(&self) -> &str {
        "ventasPeriodo"
    }

    fn description(&self) -> &str {
        "Total vendido en la semana o el mes"
    }

    fn pattern(&self) -> &str {
        r"(?:ventas|vend(?:i[oó]|ido|imos))\s+(?:de\s+|del\s+)?(?:la\s+|esta\s+|este\s+|el\s+)?(semana|mes)\b"
    }

    async fn execute(&self, args: &CommandArgs, turn: &mut Turn<'_>) {
        let period = match args.get(1).map(normalize).as_deref() {
            Some("semana") => Period::Semana,
            _ => Period::Mes,
        };
        report_sales(period, turn).await;
    }
}

pub struct GastosHoyCommand;

#[async_trait::async_trait]
impl CommandHandler for GastosHoyCommand {
    fn name(&self) -> &str {
        "gastosHoy"
    }

    fn description(&self) -> &str {
        "Total gastado hoy"
    }

    fn pattern(&self) -> &str {
        r"cu[aá]nto\s+(?:se\s+)?(?:ha\s+|hemos\s+)?gast(?:[oó]|ado|amos)\s+hoy|gastos\s+de\s+hoy|gastos\s+del\s+d[ií]a"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        match turn.api().expenses_summary(Period::Hoy).await {
            Ok(summary) if summary.cantidad == 0 => {
                turn.emit("💸 Hoy no se han registrado gastos.");
            }
            Ok(summary) => turn.emit(format!(
                "💸 Gastos de hoy: {} en {} movimientos.",
                money(summary.total),
                summary.cantidad
            )),
            Err(e) => turn.fail("consultar los gastos", &e),
        }
    }
}

pub struct ComprasHoyCommand;

#[async_trait::async_trait]
impl CommandHandler for ComprasHoyCommand {
    fn name(&self) -> &str {
        "comprasHoy"
    }

    fn description(&self) -> &str {
        "Compras a proveedores registradas hoy"
    }

    fn pattern(&self) -> &str {
        r"compras\s+de\s+hoy|compras\s+del\s+d[ií]a|cu[aá]nto\s+(?:se\s+)?(?:ha\s+|hemos\s+)?compr(?:[oó]|ado|amos)\s+hoy"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        match turn.api().purchases_summary(Period::Hoy).await {
            Ok(summary) if summary.cantidad == 0 => {
                turn.emit("🧾 Hoy no se han registrado compras.");
            }
            Ok(summary) => turn.emit(format!(
                "🧾 Compras de hoy: {} compras por {}.",
                summary.cantidad,
                money(summary.total)
            )),
            Err(e) => turn.fail("consultar las compras", &e),
        }
    }
}
