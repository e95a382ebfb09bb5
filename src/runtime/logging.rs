#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Emits a `[Crawl]` event. The optional context is attached as a JSON field.
pub fn log_event(level: LogLevel, message: &str, context: Option<serde_json::Value>) {
    let context = context.map(|value| value.to_string());
    let context = context.as_deref().unwrap_or("");
    let severity = level.as_str();
    match level {
        LogLevel::Info => tracing::info!(severity, context, "[Crawl] {}", message),
        LogLevel::Warn => tracing::warn!(severity, context, "[Crawl] {}", message),
        LogLevel::Error => tracing::error!(severity, context, "[Crawl] {}", message),
    }
}
