//! Estado de la conversación: transcripción, flujo activo y sugerencias

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Dominio dueño de un flujo de varios turnos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Producto,
    Venta,
    Reporte,
}

impl FlowKind {
    /// Secuencia de pasos declarada para este tipo de flujo
    pub fn steps(&self) -> &'static [FlowStep] {
        match self {
            Self::Producto => &[
                FlowStep::Nombre,
                FlowStep::Confirmacion,
                FlowStep::Tipo,
                FlowStep::Categoria,
                FlowStep::Unidad,
                FlowStep::SugerenciaInventario,
            ],
            Self::Venta => &[
                FlowStep::Categoria,
                FlowStep::Producto,
                FlowStep::Cantidad,
                FlowStep::Pago,
            ],
            Self::Reporte => &[
                FlowStep::Modulo,
                FlowStep::Subreporte,
                FlowStep::Formato,
                FlowStep::Confirmacion,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producto => "producto",
            Self::Venta => "venta",
            Self::Reporte => "reporte",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Punto de la secuencia en el que está un flujo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowStep {
    Nombre,
    Confirmacion,
    Tipo,
    Categoria,
    Unidad,
    SugerenciaInventario,
    Producto,
    Cantidad,
    Pago,
    Modulo,
    Subreporte,
    Formato,
}

impl FlowStep {
    /// Pasos en los que una lista de sugerencias pendiente tiene prioridad
    pub const DISAMBIGUATION: [FlowStep; 4] = [
        Self::SugerenciaInventario,
        Self::Categoria,
        Self::Unidad,
        Self::Tipo,
    ];

    pub fn accepts_suggestions(&self) -> bool {
        Self::DISAMBIGUATION.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nombre => "nombre",
            Self::Confirmacion => "confirmacion",
            Self::Tipo => "tipo",
            Self::Categoria => "categoria",
            Self::Unidad => "unidad",
            Self::SugerenciaInventario => "sugerenciaInventario",
            Self::Producto => "producto",
            Self::Cantidad => "cantidad",
            Self::Pago => "pago",
            Self::Modulo => "modulo",
            Self::Subreporte => "subreporte",
            Self::Formato => "formato",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("step {step} does not belong to the {kind} flow")]
    InvalidStep { kind: FlowKind, step: FlowStep },
    #[error("the {kind} flow has no step after {step}")]
    NoNextStep { kind: FlowKind, step: FlowStep },
}

/// Interacción de varios turnos en curso.
///
/// El paso siempre pertenece a la secuencia de `kind`: solo se construye con
/// [`ActiveFlow::start`] y se mueve con [`ActiveFlow::advance`] o
/// [`ActiveFlow::with_step`], que validan la pertenencia.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFlow {
    kind: FlowKind,
    step: FlowStep,
    data: Map<String, Value>,
}

impl ActiveFlow {
    /// Nuevo flujo en el primer paso de su secuencia
    pub fn start(kind: FlowKind) -> Self {
        Self {
            kind,
            step: kind.steps()[0],
            data: Map::new(),
        }
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Mueve el flujo a `step`, que debe estar en la secuencia del tipo
    pub fn with_step(mut self, step: FlowStep) -> Result<Self, FlowError> {
        if !self.kind.steps().contains(&step) {
            return Err(FlowError::InvalidStep {
                kind: self.kind,
                step,
            });
        }
        self.step = step;
        Ok(self)
    }

    pub fn next_step(&self) -> Option<FlowStep> {
        let steps = self.kind.steps();
        steps
            .iter()
            .position(|s| *s == self.step)
            .and_then(|idx| steps.get(idx + 1))
            .copied()
    }

    /// Avanza al siguiente paso de la secuencia
    pub fn advance(self) -> Result<Self, FlowError> {
        match self.next_step() {
            Some(next) => self.with_step(next),
            None => Err(FlowError::NoNextStep {
                kind: self.kind,
                step: self.step,
            }),
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.data.insert(field.to_string(), value.into());
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Guarda cualquier valor serializable (enums, structs)
    pub fn set_typed<T: Serialize>(&mut self, field: &str, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            self.data.insert(field.to_string(), json);
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.data.remove(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(Value::as_f64)
    }

    pub fn get<T: DeserializeOwned>(&self, field: &str) -> Option<T> {
        self.data
            .get(field)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Opción ofrecida al usuario para desambiguar una entrada
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    /// Texto que se reprocesa al elegir la opción (por defecto, la etiqueta)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay: Option<String>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            replay: None,
        }
    }

    pub fn with_id(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
            replay: None,
        }
    }

    pub fn replaying(mut self, text: impl Into<String>) -> Self {
        self.replay = Some(text.into());
        self
    }

    pub fn replay_text(&self) -> &str {
        self.replay.as_deref().unwrap_or(&self.label)
    }
}

/// Autor de una entrada de la transcripción
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Usuario,
    Asistente,
}

/// Entrada de la transcripción
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub tipo: MessageKind,
    pub texto: String,
    pub timestamp: DateTime<Utc>,
    /// Latencia de la respuesta, solo en mensajes del asistente
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duracion_ms: Option<u64>,
}

impl Message {
    pub fn usuario(texto: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tipo: MessageKind::Usuario,
            texto: texto.into(),
            timestamp: Utc::now(),
            duracion_ms: None,
        }
    }

    pub fn asistente(texto: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tipo: MessageKind::Asistente,
            texto: texto.into(),
            timestamp: Utc::now(),
            duracion_ms: None,
        }
    }
}

/// Sesión de conversación con un operador
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    messages: Vec<Message>,
    flow: Option<ActiveFlow>,
    suggestions: Option<Vec<Suggestion>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            flow: None,
            suggestions: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn flow(&self) -> Option<&ActiveFlow> {
        self.flow.as_ref()
    }

    /// Reemplaza el flujo activo; solo puede haber uno
    pub fn set_flow(&mut self, flow: Option<ActiveFlow>) {
        self.flow = flow;
    }

    pub fn suggestions(&self) -> Option<&[Suggestion]> {
        self.suggestions.as_deref()
    }

    /// Una lista vacía equivale a no tener sugerencias
    pub fn set_suggestions(&mut self, suggestions: Option<Vec<Suggestion>>) {
        self.suggestions = suggestions.filter(|s| !s.is_empty());
    }

    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.tipo == MessageKind::Asistente)
    }

    /// Asigna `duracion_ms` al mensaje del asistente más reciente sin
    /// duración, buscando hacia atrás desde el final hasta `from`.
    pub fn attach_duration(&mut self, from: usize, duration_ms: u64) -> bool {
        let from = from.min(self.messages.len());
        match self.messages[from..]
            .iter_mut()
            .rev()
            .find(|m| m.tipo == MessageKind::Asistente && m.duracion_ms.is_none())
        {
            Some(message) => {
                message.duracion_ms = Some(duration_ms);
                true
            }
            None => false,
        }
    }
}
