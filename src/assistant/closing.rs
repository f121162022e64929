//! Cierre diario de caja: ventas menos gastos y compras del día

use super::responses::money;
use crate::api::Summary;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyClosing {
    pub ventas: Summary,
    pub gastos: Summary,
    pub compras: Summary,
    pub balance: f64,
}

impl DailyClosing {
    pub fn reconcile(ventas: Summary, gastos: Summary, compras: Summary) -> Self {
        let balance = ventas.total - gastos.total - compras.total;
        Self {
            ventas,
            gastos,
            compras,
            balance,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.balance >= 0.0
    }

    pub fn render(&self) -> String {
        let verdict = if self.is_positive() {
            "✅ La caja cierra con saldo a favor."
        } else {
            "⚠️ La caja cierra en negativo."
        };

        format!(
            "📒 Cierre de caja de hoy:\n\
             • Ventas: {} ({} movimientos)\n\
             • Gastos: {} ({} movimientos)\n\
             • Compras: {} ({} movimientos)\n\
             • Balance: {}\n{}",
            money(self.ventas.total),
            self.ventas.cantidad,
            money(self.gastos.total),
            self.gastos.cantidad,
            money(self.compras.total),
            self.compras.cantidad,
            money(self.balance),
            verdict
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total: f64, cantidad: u64) -> Summary {
        Summary { total, cantidad }
    }

    #[test]
    fn test_balance() {
        let closing = DailyClosing::reconcile(summary(1000.0, 12), summary(150.0, 2), summary(300.0, 1));
        assert_eq!(closing.balance, 550.0);
        assert!(closing.is_positive());
        assert!(closing.render().contains("Balance: $550.00"));
    }

    #[test]
    fn test_negative_day() {
        let closing = DailyClosing::reconcile(summary(100.0, 1), summary(0.0, 0), summary(400.0, 3));
        assert_eq!(closing.balance, -300.0);
        assert!(!closing.is_positive());
        assert!(closing.render().contains("negativo"));
    }

    #[test]
    fn test_empty_day_is_zero() {
        let closing = DailyClosing::reconcile(Summary::default(), Summary::default(), Summary::default());
        assert_eq!(closing.balance, 0.0);
        assert!(closing.is_positive());
    }
}
