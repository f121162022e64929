//! Tests de integración: el backend falla
//!
//! Cada fallo del backend termina en un único mensaje "❌" y deja la sesión
//! sin flujo activo, salvo la revisión de inventario, que es sólo un aviso.

mod common;

use asistente::assistant::{
    CommandArgs, CommandHandler, CommandTable, Route, Session, Suggestion, Turn,
};
use common::{processor, processor_with_reports, processor_with_table, Call, FakeBackend};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_failed_queries_report_error() {
    let cases = [
        ("cuánto se vendió hoy", "ventasHoy", "❌ No pude consultar las ventas"),
        ("gastos de hoy", "gastosHoy", "❌ No pude consultar los gastos"),
        ("compras de hoy", "comprasHoy", "❌ No pude consultar las compras"),
        ("stock bajo", "stockBajo", "❌ No pude consultar el stock"),
        ("ver producto tomate", "verProducto", "❌ No pude consultar los productos"),
        ("cierre de caja", "cierreCaja", "❌ No pude calcular el cierre de caja"),
    ];

    for (phrase, command, expected) in cases {
        let (processor, _backend) = processor(FakeBackend::new().failing_reads());
        let mut session = Session::new();

        let report = processor.process(&mut session, phrase).await;

        assert_eq!(report.route, Route::Command(command.to_string()), "{}", phrase);
        assert_eq!(report.replies.len(), 1, "{}", phrase);
        assert!(report.replies[0].starts_with(expected), "{}", report.replies[0]);
        assert!(session.flow().is_none());
        assert!(session.suggestions().is_none());
    }
}

#[tokio::test]
async fn test_closing_fails_if_any_summary_fails() {
    let (processor, backend) = processor(FakeBackend::new().failing_on("expenses_summary"));
    let mut session = Session::new();

    let report = processor.process(&mut session, "cuadrar la caja").await;

    assert_eq!(report.route, Route::Command("cierreCaja".to_string()));
    assert_eq!(report.replies.len(), 1);
    assert!(report.replies[0].starts_with("❌ No pude calcular el cierre de caja"));
    assert!(!report.replies[0].contains("Balance"));
    // the three summaries are still requested together
    assert_eq!(backend.calls().len(), 3);
}

#[tokio::test]
async fn test_sale_cannot_start_without_categories() {
    let (processor, _backend) = processor(FakeBackend::new().failing_on("list_categories"));
    let mut session = Session::new();

    let report = processor.process(&mut session, "registrar venta").await;

    assert!(session.flow().is_none());
    assert!(report.replies[0].starts_with("❌ No pude cargar las categorías"));
}

#[tokio::test]
async fn test_sale_abandoned_when_products_fail_to_load() {
    let (processor, _backend) =
        processor(FakeBackend::new().failing_on("products_by_category"));
    let mut session = Session::new();

    processor.process(&mut session, "nueva venta").await;
    assert!(session.flow().is_some());

    let report = processor.process(&mut session, "bebidas").await;

    assert!(session.flow().is_none());
    assert_eq!(report.replies.len(), 1);
    assert!(report.replies[0].starts_with("❌ No pude cargar los productos"));
}

#[tokio::test]
async fn test_sale_abandoned_when_backend_rejects_it() {
    let (processor, backend) = processor(FakeBackend::new().failing_writes());
    let mut session = Session::new();

    for answer in ["nueva venta", "bebidas", "jugo natural", "2"] {
        processor.process(&mut session, answer).await;
    }
    let report = processor.process(&mut session, "efectivo").await;

    assert!(session.flow().is_none());
    assert_eq!(backend.count(|c| matches!(c, Call::CreateSale(_))), 1);
    assert_eq!(report.replies.len(), 1);
    assert!(report.replies[0].starts_with("❌ No pude registrar la venta"));
}

#[tokio::test]
async fn test_report_export_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let reports = dir.path().join("reportes");
    let (processor, backend) = processor_with_reports(
        FakeBackend::new().failing_on("export_report"),
        reports.clone(),
    );
    let mut session = Session::new();

    for answer in ["generar reporte de ventas", "diario", "excel"] {
        processor.process(&mut session, answer).await;
    }
    let report = processor.process(&mut session, "sí").await;

    assert!(session.flow().is_none());
    assert_eq!(backend.count(|c| matches!(c, Call::ExportReport(_))), 1);
    assert!(report.replies[0].starts_with("❌ No pude generar el reporte"));
    assert!(!reports.exists());
}

#[tokio::test]
async fn test_repeated_exports_keep_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let (processor, _backend) =
        processor_with_reports(FakeBackend::new(), dir.path().to_path_buf());
    let mut session = Session::new();

    for _ in 0..2 {
        for answer in ["generar reporte de gastos", "mensual", "pdf", "sí"] {
            processor.process(&mut session, answer).await;
        }
    }

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn test_inventory_check_failure_still_creates_product() {
    let (processor, backend) = processor(FakeBackend::new().failing_on("list_products"));
    let mut session = Session::new();

    for answer in ["registrar producto Tomate", "sí", "insumo", "Verduras"] {
        processor.process(&mut session, answer).await;
    }
    let report = processor.process(&mut session, "en kilos").await;

    assert!(session.flow().is_none());
    assert!(session.suggestions().is_none());
    assert_eq!(backend.count(|c| matches!(c, Call::CreateProduct(_))), 1);
    assert!(report.replies[0].starts_with("✅ Producto «Tomate» registrado"));
}

/// Comando que vuelve a ofrecerse a sí mismo como sugerencia
struct EcoCommand {
    runs: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl CommandHandler for EcoCommand {
    fn name(&self) -> &str {
        "eco"
    }

    fn description(&self) -> &str {
        "Se ofrece de nuevo al terminar"
    }

    fn pattern(&self) -> &str {
        r"^eco$"
    }

    async fn execute(&self, _args: &CommandArgs, turn: &mut Turn<'_>) {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        turn.emit(format!("eco {}", run));
        turn.set_suggestions(Some(vec![Suggestion::new("eco")]));
    }
}

#[tokio::test]
async fn test_self_suggesting_command_runs_once_per_turn() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut table = CommandTable::empty();
    table
        .register(Box::new(EcoCommand { runs: runs.clone() }))
        .unwrap();
    let (processor, _backend) = processor_with_table(FakeBackend::new(), table);
    let mut session = Session::new();

    processor.process(&mut session, "eco").await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let report = processor.process(&mut session, "eco").await;

    assert_eq!(report.route, Route::Command("eco".to_string()));
    assert_eq!(report.replies, vec!["eco 2".to_string()]);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(session.suggestions().map(|s| s.len()), Some(1));
}
