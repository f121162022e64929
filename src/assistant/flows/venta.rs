//! Registro de ventas: categoría → producto → cantidad → medio de pago

use super::{
    choose, commit, match_alias, parse_quantity, store_options, stored_options, FlowHandler,
    OPTIONS,
};
use crate::api::{NewSale, PaymentMethod, Product};
use crate::assistant::responses::{money, quantity};
use crate::assistant::state::{ActiveFlow, FlowKind, FlowStep, Suggestion};
use crate::assistant::suggestions::enumerate;
use crate::assistant::turn::Turn;

const PRODUCTS: &str = "productos";

const PAYMENT_ALIASES: [(&str, PaymentMethod); 9] = [
    ("efectivo", PaymentMethod::Efectivo),
    ("cash", PaymentMethod::Efectivo),
    ("contado", PaymentMethod::Efectivo),
    ("tarjeta", PaymentMethod::Tarjeta),
    ("débito", PaymentMethod::Tarjeta),
    ("debito", PaymentMethod::Tarjeta),
    ("crédito", PaymentMethod::Tarjeta),
    ("transferencia", PaymentMethod::Transferencia),
    ("transferido", PaymentMethod::Transferencia),
];

const PAYMENT_PROMPT: &str = "¿Cómo pagó? efectivo, tarjeta o transferencia.";

fn category_options(categories: Vec<crate::api::Category>) -> Vec<Suggestion> {
    categories
        .into_iter()
        .map(|c| Suggestion::with_id(c.id, c.nombre))
        .collect()
}

/// Inicia la venta ofreciendo las categorías
pub async fn start(turn: &mut Turn<'_>) {
    match turn.api().list_categories().await {
        Ok(categories) if !categories.is_empty() => {
            let options = category_options(categories);
            let mut flow = ActiveFlow::start(FlowKind::Venta);
            store_options(&mut flow, &options);
            turn.set_flow(Some(flow));
            turn.emit(format!(
                "🛒 Registremos una venta. ¿De qué categoría es el producto?\n{}",
                enumerate(&options)
            ));
        }
        Ok(_) => turn.emit("❌ No hay categorías creadas; no puedo registrar ventas todavía."),
        Err(e) => turn.fail("cargar las categorías", &e),
    }
}

pub struct VentaFlow;

impl VentaFlow {
    async fn pick_category(&self, raw: &str, mut flow: ActiveFlow, turn: &mut Turn<'_>) {
        let options = stored_options(&flow);
        let Some(category) = choose(raw, &options) else {
            turn.emit(format!(
                "No reconocí esa categoría. Elige una:\n{}",
                enumerate(&options)
            ));
            return;
        };
        let Some(category_id) = category.id.as_deref() else {
            turn.emit(format!("Elige una categoría de la lista:\n{}", enumerate(&options)));
            return;
        };

        let products: Vec<Product> = match turn.api().products_by_category(category_id).await {
            Ok(products) => products.into_iter().filter(|p| p.activo).collect(),
            Err(e) => {
                turn.finish();
                turn.fail("cargar los productos", &e);
                return;
            }
        };

        if products.is_empty() {
            turn.emit(format!(
                "No hay productos activos en {}. Elige otra categoría:\n{}",
                category.label,
                enumerate(&options)
            ));
            return;
        }

        let product_options: Vec<Suggestion> = products
            .iter()
            .map(|p| Suggestion::with_id(p.id.clone(), p.nombre.clone()))
            .collect();
        flow.set_typed(PRODUCTS, &products);
        store_options(&mut flow, &product_options);

        if commit(turn, flow.advance()) {
            turn.emit(format!(
                "¿Qué producto de {}?\n{}",
                category.label,
                enumerate(&product_options)
            ));
        }
    }

    fn pick_product(&self, raw: &str, mut flow: ActiveFlow, turn: &mut Turn<'_>) {
        let options = stored_options(&flow);
        let products: Vec<Product> = flow.get(PRODUCTS).unwrap_or_default();
        let chosen = choose(raw, &options)
            .and_then(|s| s.id)
            .and_then(|id| products.into_iter().find(|p| p.id == id));

        let Some(product) = chosen else {
            turn.emit(format!(
                "No reconocí ese producto. Elige uno:\n{}",
                enumerate(&options)
            ));
            return;
        };

        flow.set_typed("producto", &product);
        flow.remove(PRODUCTS);
        flow.remove(OPTIONS);
        if commit(turn, flow.advance()) {
            turn.emit(format!(
                "¿Cuántas unidades de {}? (precio {})",
                product.nombre,
                money(product.precio)
            ));
        }
    }

    async fn register(&self, flow: ActiveFlow, method: PaymentMethod, turn: &mut Turn<'_>) {
        let product: Option<Product> = flow.get("producto");
        let amount = flow.get_f64("cantidad");

        turn.finish();

        let (Some(product), Some(amount)) = (product, amount) else {
            tracing::error!("flujo de venta incompleto: {:?}", flow.data());
            turn.emit("❌ Faltan datos de la venta; empecemos de nuevo con «registrar venta».");
            return;
        };

        let sale = NewSale {
            producto_id: product.id.clone(),
            cantidad: amount,
            precio_unitario: product.precio,
            total: product.precio * amount,
            metodo_pago: method,
        };

        match turn.api().create_sale(&sale).await {
            Ok(created) => {
                tracing::info!("Venta registrada: {} ({})", created.id, money(sale.total));
                turn.emit(format!(
                    "✅ Venta registrada: {} × {} = {} ({}).",
                    quantity(amount),
                    product.nombre,
                    money(sale.total),
                    method.label()
                ));
            }
            Err(e) => turn.fail("registrar la venta", &e),
        }
    }
}

#[async_trait::async_trait]
impl FlowHandler for VentaFlow {
    fn kind(&self) -> FlowKind {
        FlowKind::Venta
    }

    async fn handle(&self, raw: &str, mut flow: ActiveFlow, turn: &mut Turn<'_>) {
        match flow.step() {
            FlowStep::Categoria => self.pick_category(raw, flow, turn).await,
            FlowStep::Producto => self.pick_product(raw, flow, turn),
            FlowStep::Cantidad => match parse_quantity(raw).filter(|q| *q > 0.0) {
                Some(amount) => {
                    let price = flow
                        .get::<Product>("producto")
                        .map(|p| p.precio)
                        .unwrap_or_default();
                    flow.set("cantidad", amount);
                    if commit(turn, flow.advance()) {
                        turn.emit(format!(
                            "Total {}. {}",
                            money(price * amount),
                            PAYMENT_PROMPT
                        ));
                    }
                }
                None => turn.emit("Dime una cantidad mayor que cero, por ejemplo «3» o «media docena»."),
            },
            FlowStep::Pago => match match_alias(raw, &PAYMENT_ALIASES) {
                Some(method) => self.register(flow, method, turn).await,
                None => turn.emit(format!("No reconocí el medio de pago. {}", PAYMENT_PROMPT)),
            },
            other => {
                tracing::error!("paso {} fuera del flujo de venta", other);
                turn.finish();
                turn.emit("❌ Se perdió el hilo de la venta. Empecemos de nuevo.");
            }
        }
    }
}
