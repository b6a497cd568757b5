/// Liveness probe. Plain text on purpose; monitoring doesn't need an envelope.
pub async fn health_check() -> &'static str {
    "ok"
}
