use crate::logger::{ApiLogger, LogArgs};
use crate::sink::LogType;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Event target of this crate; its events never re-enter the layer.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Whether `target` is this crate or one of its modules. A crate whose
/// name merely starts with the same text is not ours.
fn is_own_target(target: &str) -> bool {
    match target.strip_prefix(OWN_TARGET) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

/// `tracing_subscriber` layer that turns `tracing` events into API log
/// calls on an [`ApiLogger`].
///
/// The event message becomes `message`, a string field named `details`
/// becomes `details`, and every other field is attached as metadata.
/// `TRACE` events are skipped since they have no wire severity.
pub struct ApiLogLayer {
    logger: ApiLogger,
}

impl ApiLogLayer {
    pub fn new(logger: ApiLogger) -> Self {
        Self { logger }
    }
}

fn log_type_for(level: &Level) -> Option<LogType> {
    match *level {
        Level::ERROR => Some(LogType::Error),
        Level::WARN => Some(LogType::Warn),
        Level::INFO => Some(LogType::Info),
        Level::DEBUG => Some(LogType::Debug),
        _ => None,
    }
}

/// Build the positional arguments of an API log call from an event.
pub(crate) fn event_args(event: &Event<'_>) -> LogArgs {
    let mut fields = Map::new();
    let mut message: Option<String> = None;
    let mut details: Option<String> = None;

    let mut visitor = FieldVisitor {
        fields: &mut fields,
        message: &mut message,
        details: &mut details,
    };
    event.record(&mut visitor);

    let message = message.unwrap_or_else(|| event.metadata().name().to_string());
    let mut args = vec![Value::String(message)];
    if let Some(details) = details {
        args.push(Value::String(details));
    }
    if !fields.is_empty() {
        let metadata = fields
            .into_iter()
            .map(|(name, value)| {
                let mut entry = Map::new();
                entry.insert("value".to_string(), value);
                (name, Value::Object(entry))
            })
            .collect();
        args.push(Value::Object(metadata));
    }
    LogArgs::from(args)
}

impl<S> Layer<S> for ApiLogLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if is_own_target(meta.target()) {
            return;
        }
        let Some(log_type) = log_type_for(meta.level()) else {
            return;
        };

        // The layer cannot report through tracing without re-entering itself.
        if let Err(e) = self.logger.log(log_type, event_args(event)) {
            eprintln!("api log layer dropped event: {}", e);
        }
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Map<String, Value>,
    pub message: &'a mut Option<String>,
    pub details: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => *self.message = Some(value.to_string()),
            "details" => *self.details = Some(value.to_string()),
            name => {
                self.fields.insert(name.to_string(), Value::String(value.to_string()));
            }
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{:?}", value);
        match field.name() {
            "message" => *self.message = Some(text),
            "details" => *self.details = Some(text),
            name => {
                self.fields.insert(name.to_string(), Value::String(text));
            }
        }
    }
}
