//! Normalización de texto para comparar comandos y sugerencias

/// Caracteres que se descartan antes de comparar
const STRIPPED: [char; 7] = ['-', '.', ',', '!', '?', '¡', '¿'];

/// Pasa a minúsculas, quita la puntuación de [`STRIPPED`] y colapsa espacios.
///
/// Es total e idempotente: `normalize(&normalize(x)) == normalize(x)`.
///
/// ```
/// use asistente::assistant::normalize;
///
/// assert_eq!(normalize("  ¿Cuánto   se vendió HOY?  "), "cuánto se vendió hoy");
/// ```
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_case() {
        assert_eq!(normalize("¡Registrar Producto!"), "registrar producto");
        assert_eq!(normalize("coca-cola, 1.5 lt"), "cocacola 15 lt");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("\tventas   de\n hoy "), "ventas de hoy");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_keeps_accents() {
        assert_eq!(normalize("PORCIÓN"), "porción");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "¿Cuánto se vendió hoy?",
            "  - - ¡¡Hola!!  ",
            "12:Bebidas Frías",
            "ÑANDÚ   ,,, ..",
            "İstanbul",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "no idempotente para {:?}", sample);
        }
    }

    #[test]
    fn test_separator_between_words_is_removed_not_spaced() {
        // "a - b" keeps the surrounding spaces, then they collapse
        assert_eq!(normalize("a - b"), "a b");
    }
}
