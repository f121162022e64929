//! Resolución de una entrada libre contra una lista de sugerencias

use super::normalizer::normalize;
use super::state::Suggestion;

/// Busca la sugerencia que coincide con `input`.
///
/// Las pasadas van de la más estricta a la más laxa y gana la primera
/// que encuentra algo: etiqueta tal cual, etiqueta normalizada, id, forma
/// compuesta `id:etiqueta` y, al final, un número suelto ("2") que elige
/// la opción en esa posición de la lista.
pub fn resolve<'a>(input: &str, candidates: &'a [Suggestion]) -> Option<&'a Suggestion> {
    let wanted = normalize(input);
    if wanted.is_empty() {
        return None;
    }
    let raw = input.trim();

    candidates
        .iter()
        .find(|c| c.label == raw)
        .or_else(|| candidates.iter().find(|c| normalize(&c.label) == wanted))
        .or_else(|| {
            candidates
                .iter()
                .find(|c| c.id.as_deref().is_some_and(|id| normalize(id) == wanted))
        })
        .or_else(|| {
            candidates.iter().find(|c| match &c.id {
                Some(id) => normalize(&format!("{}:{}", id, c.label)) == wanted,
                None => false,
            })
        })
        .or_else(|| by_ordinal(&wanted, candidates))
}

fn by_ordinal<'a>(wanted: &str, candidates: &'a [Suggestion]) -> Option<&'a Suggestion> {
    let position: usize = wanted
        .trim_start_matches("opción ")
        .trim_start_matches("opcion ")
        .trim_start_matches("la ")
        .parse()
        .ok()?;
    position.checked_sub(1).and_then(|idx| candidates.get(idx))
}

/// Lista numerada de las opciones, una por línea
pub fn enumerate(candidates: &[Suggestion]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| format!("{}. {}", idx + 1, candidate.label))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Suggestion> {
        vec![
            Suggestion::with_id("3", "Bebidas"),
            Suggestion::with_id("8", "Postres"),
            Suggestion::new("Sin categoría"),
        ]
    }

    #[test]
    fn test_every_candidate_resolves_to_itself() {
        let candidates = categories();
        for candidate in &candidates {
            assert_eq!(resolve(&candidate.label, &candidates), Some(candidate));
        }
    }

    #[test]
    fn test_matches_label_id_and_composite() {
        let candidates = categories();
        assert_eq!(resolve("¡BEBIDAS!", &candidates).unwrap().label, "Bebidas");
        assert_eq!(resolve("8", &candidates).unwrap().label, "Postres");
        assert_eq!(resolve("3:bebidas", &candidates).unwrap().label, "Bebidas");
    }

    #[test]
    fn test_ordinal_selects_position() {
        let candidates = vec![Suggestion::new("Tomate"), Suggestion::new("Tomate cherry")];
        assert_eq!(resolve("2", &candidates).unwrap().label, "Tomate cherry");
        assert_eq!(resolve("opción 1", &candidates).unwrap().label, "Tomate");
        assert!(resolve("3", &candidates).is_none());
        assert!(resolve("0", &candidates).is_none());
    }

    #[test]
    fn test_ids_win_over_ordinals() {
        // "3" is the id of Bebidas, not the third entry
        let candidates = categories();
        assert_eq!(resolve("3", &candidates).unwrap().label, "Bebidas");
    }

    #[test]
    fn test_labels_differing_only_in_case_resolve_to_themselves() {
        let candidates = vec![
            Suggestion::with_id("10", "Tomate"),
            Suggestion::with_id("11", "TOMATE"),
        ];
        assert_eq!(resolve("TOMATE", &candidates).unwrap().id.as_deref(), Some("11"));
        assert_eq!(resolve("Tomate", &candidates).unwrap().id.as_deref(), Some("10"));
        // anything else still falls back to the first normalized match
        assert_eq!(resolve("tomate", &candidates).unwrap().id.as_deref(), Some("10"));
    }

    #[test]
    fn test_label_wins_over_other_candidate_id() {
        let candidates = vec![Suggestion::with_id("7", "Pan"), Suggestion::new("7")];
        let chosen = resolve("7", &candidates).unwrap();
        assert_eq!(chosen.label, "7");
        assert!(chosen.id.is_none());
        assert_eq!(resolve("pan", &candidates).unwrap().id.as_deref(), Some("7"));
    }

    #[test]
    fn test_no_match() {
        let candidates = categories();
        assert!(resolve("carnes", &candidates).is_none());
        assert!(resolve("   ", &candidates).is_none());
        assert!(resolve("bebidas", &[]).is_none());
    }

    #[test]
    fn test_enumerate() {
        assert_eq!(
            enumerate(&categories()),
            "1. Bebidas\n2. Postres\n3. Sin categoría"
        );
    }
}
