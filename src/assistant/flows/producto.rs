//! Registro de productos: nombre → confirmación → tipo → categoría →
//! unidad → (sugerencias de inventario)

use super::{
    choose, commit, match_alias, parse_confirmation, store_options, stored_options, FlowHandler,
    OPTIONS,
};
use crate::api::{NewProduct, ProductType, Unit};
use crate::assistant::commands::clean_argument;
use crate::assistant::commands::inventario::{lookup_suggestion, similar_products};
use crate::assistant::state::{ActiveFlow, FlowKind, FlowStep, Suggestion};
use crate::assistant::suggestions::enumerate;
use crate::assistant::turn::Turn;

const MAX_SIMILAR: usize = 5;

const TYPE_ALIASES: [(&str, ProductType); 10] = [
    ("insumo", ProductType::Insumo),
    ("insumos", ProductType::Insumo),
    ("materia prima", ProductType::Insumo),
    ("elaborado", ProductType::Elaborado),
    ("elaborada", ProductType::Elaborado),
    ("preparado", ProductType::Elaborado),
    ("plato", ProductType::Elaborado),
    ("bebida", ProductType::Bebida),
    ("bebestible", ProductType::Bebida),
    ("trago", ProductType::Bebida),
];

const UNIT_ALIASES: [(&str, Unit); 18] = [
    ("unidad", Unit::Unidad),
    ("unidades", Unit::Unidad),
    ("por unidad", Unit::Unidad),
    ("kg", Unit::Kilogramo),
    ("kilo", Unit::Kilogramo),
    ("kilos", Unit::Kilogramo),
    ("kilogramo", Unit::Kilogramo),
    ("kilogramos", Unit::Kilogramo),
    ("g", Unit::Gramo),
    ("gramo", Unit::Gramo),
    ("gramos", Unit::Gramo),
    ("litro", Unit::Litro),
    ("litros", Unit::Litro),
    ("ml", Unit::Mililitro),
    ("mililitros", Unit::Mililitro),
    ("porción", Unit::Porcion),
    ("porcion", Unit::Porcion),
    ("porciones", Unit::Porcion),
];

const TYPE_PROMPT: &str = "¿Qué tipo de producto es? Puede ser insumo, elaborado o bebida.";

const UNIT_PROMPT: &str =
    "¿En qué unidad se mide? unidad, kilogramo, gramo, litro, mililitro o porción.";

fn confirm_prompt(name: &str) -> String {
    format!("¿Confirmas registrar el producto «{}»? (sí / no)", name)
}

/// Inicia el registro; si ya viene el nombre, salta a la confirmación
pub fn start(turn: &mut Turn<'_>, name: Option<&str>) {
    let flow = ActiveFlow::start(FlowKind::Producto);
    match name.map(clean_argument).filter(|n| !n.is_empty()) {
        Some(name) => {
            let flow = flow.with("nombre", name);
            if commit(turn, flow.advance()) {
                turn.emit(confirm_prompt(name));
            }
        }
        None => {
            turn.set_flow(Some(flow));
            turn.emit("📝 Vamos a registrar un producto. ¿Cómo se llama?");
        }
    }
}

pub struct ProductoFlow;

impl ProductoFlow {
    async fn offer_categories(&self, flow: ActiveFlow, turn: &mut Turn<'_>) {
        match turn.api().list_categories().await {
            Ok(categories) if !categories.is_empty() => {
                let options: Vec<Suggestion> = categories
                    .into_iter()
                    .map(|c| Suggestion::with_id(c.id, c.nombre))
                    .collect();
                let name = flow.get_str("nombre").unwrap_or_default().to_string();
                let mut next = flow.with_step(FlowStep::Categoria);
                if let Ok(flow) = next.as_mut() {
                    store_options(flow, &options);
                }
                if commit(turn, next) {
                    turn.emit(format!(
                        "¿En qué categoría va «{}»?\n{}",
                        name,
                        enumerate(&options)
                    ));
                }
            }
            Ok(_) => {
                turn.finish();
                turn.emit("❌ No hay categorías creadas; crea una antes de registrar productos.");
            }
            Err(e) => {
                turn.finish();
                turn.fail("cargar las categorías", &e);
            }
        }
    }

    async fn check_inventory(&self, flow: ActiveFlow, turn: &mut Turn<'_>) {
        let name = flow.get_str("nombre").unwrap_or_default().to_string();
        let products = match turn.api().list_products().await {
            Ok(products) => products,
            Err(e) => {
                // the similarity check is advisory; creation still goes ahead
                tracing::warn!("No se pudo revisar el inventario: {}", e);
                Vec::new()
            }
        };

        let similar: Vec<Suggestion> = similar_products(&name, &products)
            .into_iter()
            .take(MAX_SIMILAR)
            .map(lookup_suggestion)
            .collect();

        if similar.is_empty() {
            self.create(flow, turn).await;
            return;
        }

        if commit(turn, flow.with_step(FlowStep::SugerenciaInventario)) {
            turn.emit(format!(
                "Ya hay productos parecidos a «{}» en inventario:\n{}\n\
                 Di el nombre de uno para verlo, o «crear» para registrar «{}» igual.",
                name,
                enumerate(&similar),
                name
            ));
            turn.set_suggestions(Some(similar));
        }
    }

    async fn create(&self, flow: ActiveFlow, turn: &mut Turn<'_>) {
        let product = (|| {
            Some(NewProduct {
                nombre: flow.get_str("nombre")?.to_string(),
                tipo: flow.get("tipo")?,
                categoria_id: flow.get::<Suggestion>("categoria")?.id?,
                unidad: flow.get("unidad")?,
            })
        })();

        // the flow ends here whatever the backend answers
        turn.finish();

        let Some(product) = product else {
            tracing::error!("flujo de producto incompleto: {:?}", flow.data());
            turn.emit("❌ Faltan datos del producto; empecemos de nuevo con «registrar producto».");
            return;
        };

        match turn.api().create_product(&product).await {
            Ok(created) => {
                tracing::info!("Producto registrado: {} ({})", created.nombre, created.id);
                turn.emit(format!(
                    "✅ Producto «{}» registrado como {} ({}).",
                    created.nombre,
                    product.tipo.label(),
                    product.unidad.label()
                ));
            }
            Err(e) => turn.fail("registrar el producto", &e),
        }
    }
}

#[async_trait::async_trait]
impl FlowHandler for ProductoFlow {
    fn kind(&self) -> FlowKind {
        FlowKind::Producto
    }

    async fn handle(&self, raw: &str, mut flow: ActiveFlow, turn: &mut Turn<'_>) {
        match flow.step() {
            FlowStep::Nombre => {
                let name = clean_argument(raw);
                if name.is_empty() {
                    turn.emit("¿Cómo se llama el producto?");
                    return;
                }
                flow.set("nombre", name);
                if commit(turn, flow.advance()) {
                    turn.emit(confirm_prompt(name));
                }
            }
            FlowStep::Confirmacion => match parse_confirmation(raw) {
                Some(true) => {
                    if commit(turn, flow.advance()) {
                        turn.emit(TYPE_PROMPT);
                    }
                }
                Some(false) => {
                    turn.finish();
                    turn.emit("Registro de producto cancelado.");
                }
                None => {
                    let name = flow.get_str("nombre").unwrap_or_default();
                    turn.emit(format!("Responde «sí» o «no». {}", confirm_prompt(name)));
                }
            },
            FlowStep::Tipo => match match_alias(raw, &TYPE_ALIASES) {
                Some(tipo) => {
                    flow.set_typed("tipo", &tipo);
                    self.offer_categories(flow, turn).await;
                }
                None => turn.emit(format!("No reconocí el tipo. {}", TYPE_PROMPT)),
            },
            FlowStep::Categoria => {
                let options = stored_options(&flow);
                match choose(raw, &options) {
                    Some(category) => {
                        flow.set_typed("categoria", &category);
                        flow.remove(OPTIONS);
                        if commit(turn, flow.advance()) {
                            turn.emit(UNIT_PROMPT);
                        }
                    }
                    None => turn.emit(format!(
                        "No reconocí esa categoría. Elige una:\n{}",
                        enumerate(&options)
                    )),
                }
            }
            FlowStep::Unidad => match match_alias(raw, &UNIT_ALIASES) {
                Some(unit) => {
                    flow.set_typed("unidad", &unit);
                    self.check_inventory(flow, turn).await;
                }
                None => turn.emit(format!("No reconocí la unidad. {}", UNIT_PROMPT)),
            },
            FlowStep::SugerenciaInventario => match parse_confirmation(raw) {
                Some(true) => self.create(flow, turn).await,
                Some(false) => {
                    turn.finish();
                    turn.emit("Registro de producto cancelado.");
                }
                None => {
                    let listed = turn.suggestions().map(enumerate).unwrap_or_default();
                    let name = flow.get_str("nombre").unwrap_or_default();
                    turn.emit(format!(
                        "No encontré esa opción. Productos parecidos:\n{}\n\
                         Di el nombre de uno, «crear» para registrar «{}» igual o «cancelar».",
                        listed, name
                    ));
                }
            },
            other => {
                tracing::error!("paso {} fuera del flujo de producto", other);
                turn.finish();
                turn.emit("❌ Se perdió el hilo del registro. Empecemos de nuevo.");
            }
        }
    }
}
