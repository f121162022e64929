//! Textos fijos del asistente y formato de cifras

pub const NOT_UNDERSTOOD: &str =
    "🤔 No entendí ese comando. Di «ayuda» para ver lo que puedo hacer.";

pub const CANCELLED: &str = "🛑 Listo, cancelé la operación en curso.";

pub const FAREWELL: &str = "👋 ¡Hasta luego! Cerrando el asistente.";

pub const GREETING: &str = "👋 ¡Hola! ¿En qué te ayudo? Puedes decir «ayuda» para ver los comandos.";

pub const HELP: &str = "Esto es lo que puedo hacer:\n\
• «¿Cuánto se vendió hoy?» o «ventas de la semana / del mes»\n\
• «Gastos de hoy», «compras de hoy»\n\
• «Cierre de caja» para cuadrar el día\n\
• «Stock bajo» para ver lo que falta reponer\n\
• «Ver producto <nombre>» o «stock de <nombre>»\n\
• «Registrar producto», «registrar venta», «generar reporte»\n\
• «Cancelar» detiene lo que estemos haciendo; «cerrar asistente» para salir";

/// Monto con dos decimales, p. ej. `$1500.00`
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Cantidad sin decimales superfluos: `2`, `2.5`, `0.25`
pub fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.3}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(1500.0), "$1500.00");
        assert_eq!(money(12.5), "$12.50");
    }

    #[test]
    fn test_quantity() {
        assert_eq!(quantity(2.0), "2");
        assert_eq!(quantity(2.5), "2.5");
        assert_eq!(quantity(0.25), "0.25");
    }
}
