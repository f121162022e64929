//! Consultas de inventario

use super::{CommandArgs, CommandHandler};
use crate::api::{Product, Unit};
use crate::assistant::normalizer::normalize;
use crate::assistant::responses::{money, quantity};
use crate::assistant::state::Suggestion;
use crate::assistant::suggestions::enumerate;
use crate::assistant::turn::Turn;
use std::collections::HashSet;

/// Máximo de coincidencias que se ofrecen como sugerencias
const MAX_SUGGESTIONS: usize = 5;

fn unit_suffix(product: &Product) -> String {
    product
        .unidad
        .as_deref()
        .map(|u| match Unit::from_code(u) {
            Some(unit) => format!(" {}", unit.code()),
            None => format!(" {}", u),
        })
        .unwrap_or_default()
}

pub(crate) fn describe_product(product: &Product) -> String {
    let unit = unit_suffix(product);
    let mut text = format!(
        "📦 {}: stock {}{}, precio {}.",
        product.nombre,
        quantity(product.stock),
        unit,
        money(product.precio)
    );
    if product.stock_minimo > 0.0 && product.stock < product.stock_minimo {
        text.push_str(&format!(
            "\n⚠️ Está bajo el mínimo ({}{}).",
            quantity(product.stock_minimo),
            unit
        ));
    }
    if !product.activo {
        text.push_str("\nEste producto está desactivado.");
    }
    text
}

/// Productos cuyo nombre normalizado contiene la consulta, sin repetir
/// nombres que sólo difieren en mayúsculas o signos
pub(crate) fn similar_products<'p>(query: &str, products: &'p [Product]) -> Vec<&'p Product> {
    let wanted = normalize(query);
    if wanted.is_empty() {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| {
            let name = normalize(&p.nombre);
            (name.contains(&wanted) || wanted.contains(&name)) && seen.insert(name)
        })
        .collect()
}

/// Sugerencia que, al elegirse, vuelve a consultar el producto
pub(crate) fn lookup_suggestion(product: &Product) -> Suggestion {
    Suggestion::with_id(product.id.clone(), product.nombre.clone())
        .replaying(format!("ver producto {}", product.nombre))
}

pub struct StockBajoCommand;

#[async_trait::async_trait]
impl CommandHandler for StockBajoCommand {
    fn name(&self) -> &str {
        "stockBajo"
    }

    fn description(&self) -> &str {
        "Productos bajo el stock mínimo"
    }

    fn pattern(&self) -> &str {
        r"stock\s+bajo|bajo\s+stock|poco\s+stock|por\s+agotarse|qu[eé]\s+(?:me\s+|nos\s+)?falta\s+comprar"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        match turn.api().low_stock().await {
            Ok(products) if products.is_empty() => {
                turn.emit("✅ Ningún producto está bajo el stock mínimo.");
            }
            Ok(products) => {
                let lines: Vec<String> = products
                    .iter()
                    .map(|p| {
                        let unit = unit_suffix(p);
                        format!(
                            "• {}: {}{} (mínimo {}{})",
                            p.nombre,
                            quantity(p.stock),
                            unit,
                            quantity(p.stock_minimo),
                            unit
                        )
                    })
                    .collect();
                turn.emit(format!("⚠️ Productos con stock bajo:\n{}", lines.join("\n")));
            }
            Err(e) => turn.fail("consultar el stock", &e),
        }
    }
}

pub struct VerProductoCommand;

#[async_trait::async_trait]
impl CommandHandler for VerProductoCommand {
    fn name(&self) -> &str {
        "verProducto"
    }

    fn description(&self) -> &str {
        "Detalle de un producto por nombre"
    }

    fn pattern(&self) -> &str {
        r"(?:ver|buscar|mostrar|muestra|busca)\s+(?:el\s+)?producto\s+(.+)|stock\s+del?\s+(.+)|cu[aá]nto\s+(?:queda|hay)\s+del?\s+(.+)"
    }

    async fn execute(&self, args: &CommandArgs, turn: &mut Turn<'_>) {
        let Some(query) = args.first().map(str::to_string) else {
            turn.emit("¿Qué producto quieres ver?");
            return;
        };

        let products = match turn.api().list_products().await {
            Ok(products) => products,
            Err(e) => {
                turn.fail("consultar los productos", &e);
                return;
            }
        };

        let wanted = normalize(&query);
        if let Some(exact) = products.iter().find(|p| normalize(&p.nombre) == wanted) {
            turn.emit(describe_product(exact));
            return;
        }

        let matches = similar_products(&query, &products);
        match matches.as_slice() {
            [] => turn.emit(format!("🔍 No encontré productos que coincidan con «{}».", query)),
            [only] => turn.emit(describe_product(only)),
            many => {
                let suggestions: Vec<Suggestion> = many
                    .iter()
                    .take(MAX_SUGGESTIONS)
                    .map(|p| lookup_suggestion(p))
                    .collect();
                turn.emit(format!(
                    "Encontré varios productos parecidos a «{}»:\n{}\n¿Cuál quieres ver?",
                    query,
                    enumerate(&suggestions)
                ));
                turn.set_suggestions(Some(suggestions));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, nombre: &str) -> Product {
        Product {
            id: id.to_string(),
            nombre: nombre.to_string(),
            tipo: None,
            categoria_id: None,
            unidad: Some("kg".to_string()),
            stock: 2.0,
            stock_minimo: 5.0,
            precio: 1200.0,
            activo: true,
        }
    }

    #[test]
    fn test_similar_products_both_directions() {
        let products = vec![product("1", "Tomate"), product("2", "Tomate cherry"), product("3", "Pan")];
        let names: Vec<&str> = similar_products("tomate", &products)
            .iter()
            .map(|p| p.nombre.as_str())
            .collect();
        assert_eq!(names, vec!["Tomate", "Tomate cherry"]);

        // the query may be longer than the stored name
        assert_eq!(similar_products("pan amasado", &products).len(), 1);
        assert!(similar_products("", &products).is_empty());
    }

    #[test]
    fn test_similar_products_skips_repeated_names() {
        let products = vec![
            product("10", "Tomate"),
            product("11", "TOMATE"),
            product("12", "Tomate cherry"),
        ];
        let ids: Vec<&str> = similar_products("tomat", &products)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["10", "12"]);
    }

    #[test]
    fn test_describe_product_warns_below_minimum() {
        let text = describe_product(&product("1", "Harina"));
        assert!(text.starts_with("📦 Harina: stock 2 kg"));
        assert!(text.contains("bajo el mínimo (5 kg)"));
    }

    #[test]
    fn test_lookup_suggestion_replays_command() {
        let suggestion = lookup_suggestion(&product("9", "Tomate cherry"));
        assert_eq!(suggestion.id.as_deref(), Some("9"));
        assert_eq!(suggestion.replay_text(), "ver producto Tomate cherry");
    }
}
