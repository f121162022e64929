//! Bitácora de turnos en disco
//!
//! Cada turno procesado queda como una línea `TURNO {json}` con la entrada,
//! la ruta, las respuestas y la latencia. `log_info!` y `log_error!` agregan
//! líneas sueltas del binario. Mientras no se abra el archivo con
//! [`open_journal`], escribir es un no-op.

use crate::assistant::{Route, TurnReport};
use chrono::Local;
use lazy_static::lazy_static;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

lazy_static! {
    static ref JOURNAL: Mutex<Option<File>> = Mutex::new(None);
}

/// Registro de un turno tal como se escribe en la bitácora
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TurnRecord<'a> {
    sesion: &'a Uuid,
    entrada: &'a str,
    ruta: &'a Route,
    respuestas: &'a [String],
    duracion_ms: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    cierre: bool,
}

/// Ruta de la bitácora en el directorio de datos del usuario
pub fn journal_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("asistente").join("turnos.log"),
        None => PathBuf::from("turnos.log"),
    }
}

/// Abre (o crea) la bitácora y marca el inicio de una ejecución
pub fn open_journal() -> anyhow::Result<PathBuf> {
    let path = journal_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "\n--- {} ---", Local::now().format("%Y-%m-%d %H:%M:%S"))?;

    *JOURNAL
        .lock()
        .map_err(|_| anyhow::anyhow!("bitácora bloqueada"))? = Some(file);
    Ok(path)
}

fn append(line: &str) {
    if let Ok(mut journal) = JOURNAL.lock() {
        if let Some(file) = journal.as_mut() {
            let _ = writeln!(file, "{}", line).and_then(|_| file.flush());
        }
    }
}

/// Línea con marca de tiempo y nivel
pub fn note(level: &str, message: &str) {
    append(&format!(
        "[{}] {}: {}",
        Local::now().format("%H:%M:%S%.3f"),
        level,
        message
    ));
}

fn turn_line(session: &Uuid, input: &str, report: &TurnReport) -> String {
    let record = TurnRecord {
        sesion: session,
        entrada: input,
        ruta: &report.route,
        respuestas: &report.replies,
        duracion_ms: report.duration_ms,
        cierre: report.close_requested,
    };
    match serde_json::to_string(&record) {
        Ok(json) => format!("TURNO {}", json),
        Err(e) => format!("TURNO sin serializar ({}): {:?}", e, record),
    }
}

/// Escribe un turno procesado
pub fn record_turn(session: &Uuid, input: &str, report: &TurnReport) {
    append(&turn_line(session, input, report));
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::note("INFO", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::note("ERROR", &format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_line_is_one_json_record() {
        let session = Uuid::new_v4();
        let report = TurnReport {
            route: Route::Command("ventasHoy".to_string()),
            replies: vec!["💰 Ventas de hoy: $100.00 en 1 ventas.".to_string()],
            duration_ms: 12,
            close_requested: false,
        };

        let line = turn_line(&session, "cuánto se vendió hoy", &report);
        assert!(!line.contains('\n'));

        let json: serde_json::Value =
            serde_json::from_str(line.strip_prefix("TURNO ").unwrap()).unwrap();
        assert_eq!(json["sesion"], session.to_string());
        assert_eq!(json["entrada"], "cuánto se vendió hoy");
        assert_eq!(json["ruta"]["ruta"], "command");
        assert_eq!(json["ruta"]["detalle"], "ventasHoy");
        assert_eq!(json["duracionMs"], 12);
        assert_eq!(json["respuestas"].as_array().unwrap().len(), 1);
        assert!(json.get("cierre").is_none());
    }

    #[test]
    fn test_multiline_replies_stay_on_one_line() {
        let report = TurnReport {
            route: Route::Closed,
            replies: vec!["uno\ndos".to_string()],
            duration_ms: 0,
            close_requested: true,
        };
        let line = turn_line(&Uuid::nil(), "cerrar asistente", &report);
        assert!(!line.contains('\n'));
        assert!(line.contains("\"cierre\":true"));
    }

    #[test]
    fn test_journal_lives_under_asistente() {
        assert!(journal_path().ends_with("turnos.log"));
    }
}
