//! Exportación de reportes: módulo → subreporte → formato → confirmación

use super::{
    choose, commit, match_alias, parse_confirmation, store_options, stored_options, FlowHandler,
    OPTIONS,
};
use crate::api::{ReportFormat, ReportModule, ReportRequest};
use crate::assistant::state::{ActiveFlow, FlowKind, FlowStep, Suggestion};
use crate::assistant::suggestions::enumerate;
use crate::assistant::turn::Turn;
use chrono::Local;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const MODULE_ALIASES: [(&str, ReportModule); 11] = [
    ("ventas", ReportModule::Ventas),
    ("venta", ReportModule::Ventas),
    ("compras", ReportModule::Compras),
    ("compra", ReportModule::Compras),
    ("gastos", ReportModule::Gastos),
    ("gasto", ReportModule::Gastos),
    ("inventario", ReportModule::Inventario),
    ("stock", ReportModule::Inventario),
    ("cierre", ReportModule::Cierre),
    ("cierres", ReportModule::Cierre),
    ("caja", ReportModule::Cierre),
];

const FORMAT_ALIASES: [(&str, ReportFormat); 5] = [
    ("pdf", ReportFormat::Pdf),
    ("excel", ReportFormat::Excel),
    ("xlsx", ReportFormat::Excel),
    ("planilla", ReportFormat::Excel),
    ("hoja de cálculo", ReportFormat::Excel),
];

const MODULE_PROMPT: &str =
    "¿De qué módulo? ventas, compras, gastos, inventario o cierre de caja.";

const FORMAT_PROMPT: &str = "¿En qué formato lo quieres? PDF o Excel.";

fn subreport_options(module: ReportModule) -> Vec<Suggestion> {
    module
        .subreports()
        .iter()
        .map(|(slug, label)| Suggestion::with_id(*slug, *label))
        .collect()
}

/// Pasa al subreporte del módulo elegido
fn select_module(turn: &mut Turn<'_>, mut flow: ActiveFlow, module: ReportModule) {
    let options = subreport_options(module);
    flow.set_typed("modulo", &module);
    store_options(&mut flow, &options);
    if commit(turn, flow.with_step(FlowStep::Subreporte)) {
        turn.emit(format!(
            "¿Qué reporte de {}?\n{}",
            module.as_str(),
            enumerate(&options)
        ));
    }
}

/// Inicia el flujo; si ya se nombró el módulo, pregunta directo el subreporte
pub fn start(turn: &mut Turn<'_>, hint: Option<&str>) {
    let flow = ActiveFlow::start(FlowKind::Reporte);
    match hint.and_then(|h| match_alias(h, &MODULE_ALIASES)) {
        Some(module) => select_module(turn, flow, module),
        None => {
            turn.set_flow(Some(flow));
            turn.emit(format!("📊 Generemos un reporte. {}", MODULE_PROMPT));
        }
    }
}

fn confirm_prompt(flow: &ActiveFlow) -> String {
    let module = flow
        .get::<ReportModule>("modulo")
        .map(|m| m.as_str())
        .unwrap_or_default();
    let subreport = flow.get_str("subreporteNombre").unwrap_or_default();
    let format = flow
        .get::<ReportFormat>("formato")
        .map(|f| f.as_str().to_uppercase())
        .unwrap_or_default();
    format!(
        "¿Genero el reporte de {} ({}) en {}? (sí / no)",
        module, subreport, format
    )
}

pub struct ReporteFlow;

impl ReporteFlow {
    async fn export(&self, flow: ActiveFlow, turn: &mut Turn<'_>) {
        let request = (|| {
            Some(ReportRequest {
                modulo: flow.get("modulo")?,
                subreporte: flow.get_str("subreporte")?.to_string(),
                formato: flow.get("formato")?,
            })
        })();

        turn.finish();

        let Some(request) = request else {
            tracing::error!("flujo de reporte incompleto: {:?}", flow.data());
            turn.emit("❌ Faltan datos del reporte; empecemos de nuevo con «generar reporte».");
            return;
        };

        let bytes = match turn.api().export_report(&request).await {
            Ok(bytes) => bytes,
            Err(e) => {
                turn.fail("generar el reporte", &e);
                return;
            }
        };

        let dir = turn.reports_dir().to_path_buf();
        let path = report_path(&dir, &request);

        match save(&dir, &path, &bytes).await {
            Ok(()) => {
                tracing::info!("Reporte guardado en {}", path.display());
                turn.emit(format!(
                    "✅ Reporte guardado en {} ({:.1} KB)",
                    path.display(),
                    bytes.len() as f64 / 1024.0
                ));
            }
            Err(e) => turn.fail("guardar el reporte", &e),
        }
    }
}

/// Ruta única por exportación: marca de tiempo al milisegundo y un sufijo
/// aleatorio, así dos exportaciones iguales nunca se pisan
fn report_path(dir: &Path, request: &ReportRequest) -> PathBuf {
    let tag = Uuid::new_v4().simple().to_string();
    dir.join(format!(
        "{}-{}-{}",
        Local::now().format("%Y%m%d-%H%M%S%3f"),
        &tag[..8],
        request.file_name()
    ))
}

async fn save(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, bytes).await
}

#[async_trait::async_trait]
impl FlowHandler for ReporteFlow {
    fn kind(&self) -> FlowKind {
        FlowKind::Reporte
    }

    async fn handle(&self, raw: &str, mut flow: ActiveFlow, turn: &mut Turn<'_>) {
        match flow.step() {
            FlowStep::Modulo => match match_alias(raw, &MODULE_ALIASES) {
                Some(module) => select_module(turn, flow, module),
                None => turn.emit(format!("No reconocí el módulo. {}", MODULE_PROMPT)),
            },
            FlowStep::Subreporte => {
                let options = stored_options(&flow);
                match choose(raw, &options) {
                    Some(Suggestion {
                        id: Some(slug),
                        label,
                        ..
                    }) => {
                        flow.set("subreporte", slug);
                        flow.set("subreporteNombre", label);
                        flow.remove(OPTIONS);
                        if commit(turn, flow.advance()) {
                            turn.emit(FORMAT_PROMPT);
                        }
                    }
                    _ => turn.emit(format!(
                        "No reconocí ese reporte. Elige uno:\n{}",
                        enumerate(&options)
                    )),
                }
            }
            FlowStep::Formato => match match_alias(raw, &FORMAT_ALIASES) {
                Some(format) => {
                    flow.set_typed("formato", &format);
                    let prompt = confirm_prompt(&flow);
                    if commit(turn, flow.advance()) {
                        turn.emit(prompt);
                    }
                }
                None => turn.emit(format!("No reconocí el formato. {}", FORMAT_PROMPT)),
            },
            FlowStep::Confirmacion => match parse_confirmation(raw) {
                Some(true) => self.export(flow, turn).await,
                Some(false) => {
                    turn.finish();
                    turn.emit("Reporte descartado.");
                }
                None => turn.emit(format!("Responde «sí» o «no». {}", confirm_prompt(&flow))),
            },
            other => {
                tracing::error!("paso {} fuera del flujo de reporte", other);
                turn.finish();
                turn.emit("❌ Se perdió el hilo del reporte. Empecemos de nuevo.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_aliases() {
        assert_eq!(match_alias("ventas", &MODULE_ALIASES), Some(ReportModule::Ventas));
        assert_eq!(match_alias("el de stock", &MODULE_ALIASES), Some(ReportModule::Inventario));
        assert_eq!(match_alias("cierre de caja", &MODULE_ALIASES), Some(ReportModule::Cierre));
        assert_eq!(match_alias("recetas", &MODULE_ALIASES), None);
    }

    #[test]
    fn test_subreport_options_use_slugs() {
        let options = subreport_options(ReportModule::Ventas);
        let chosen = choose("por producto", &options).unwrap();
        assert_eq!(chosen.id.as_deref(), Some("por-producto"));
    }

    #[test]
    fn test_report_paths_never_repeat() {
        let request = ReportRequest {
            modulo: ReportModule::Ventas,
            subreporte: "diario".to_string(),
            formato: ReportFormat::Pdf,
        };
        let dir = Path::new("reportes");
        let first = report_path(dir, &request);
        let second = report_path(dir, &request);
        assert_ne!(first, second);
        assert!(first.starts_with(dir));
        assert!(first.to_string_lossy().ends_with("-ventas-diario.pdf"));
    }

    #[test]
    fn test_format_aliases() {
        assert_eq!(match_alias("en PDF", &FORMAT_ALIASES), Some(ReportFormat::Pdf));
        assert_eq!(match_alias("una planilla", &FORMAT_ALIASES), Some(ReportFormat::Excel));
        assert_eq!(match_alias("word", &FORMAT_ALIASES), None);
    }
}
