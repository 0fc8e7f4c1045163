/// Traces a backend call: entry, exit and how long the block took.
#[macro_export]
macro_rules! log_fn {
    ($name:expr, $body:block) => {{
        let name = $name;
        let started = chrono::Utc::now();
        log::debug!("-> {name}");
        let result = { $body };
        log::debug!(
            "<- {name} ({} ms)",
            (chrono::Utc::now() - started).num_milliseconds()
        );
        result
    }};
}
