use crate::host::CorrelationTag;

// Defaults shared by the demo firmware revisions this crate replaces.
const DEFAULT_SEND_PERIOD_MS: u32 = 30_000;
const DEFAULT_DEAD_TIME_MS: u32 = 15_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;
const DEFAULT_RESOURCE_BASE: &str = "https://jsonplaceholder.typicode.com/todos";
const DEFAULT_ITEM_COUNT: u32 = 9;
const DEFAULT_MAX_LOGGED_HEADERS: u32 = 10;

/// Session behavior knobs.
///
/// One configuration value replaces the constants that would otherwise be
/// duplicated across firmware builds: request cadence, the dead-time
/// budget, buffer-facing timeouts, and the resource rotation.
///
/// ## Parameters
///
/// - **`send_period_ms`**
///   How often a new request cycle starts. Defaults to 30 s.
///
/// - **`dead_time_ms`**
///   Maximum time a channel may stay open without observed activity before
///   it is force-closed. Defaults to 15 s.
///
/// - **`request_timeout_ms`**
///   Per-request timeout handed to the supervisor. Defaults to 10 s.
///
/// - **`resource_base`** / **`item_count`**
///   The target URI is `<resource_base>/<item>` with `item` rotating
///   through `1..=item_count` (default 9), advancing on every send attempt.
///
/// - **`reset_item_on_not_found`**
///   Whether a 404 response restarts the rotation at item 1, treating the
///   404 as "resource series exhausted". On by default.
///
/// - **`max_logged_headers`**
///   Upper bound on response headers logged per response. Defaults to 10.
#[derive(Debug, Copy, Clone)]
pub struct SessionConfig {
    pub(crate) send_period_ms: u32,
    pub(crate) dead_time_ms: u32,
    pub(crate) request_timeout_ms: u32,
    pub(crate) resource_base: &'static str,
    pub(crate) endpoint: &'static str,
    pub(crate) tag: CorrelationTag,
    pub(crate) item_count: u32,
    pub(crate) reset_item_on_not_found: bool,
    pub(crate) max_logged_headers: u32,
}

impl SessionConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            send_period_ms: DEFAULT_SEND_PERIOD_MS,
            dead_time_ms: DEFAULT_DEAD_TIME_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            resource_base: DEFAULT_RESOURCE_BASE,
            endpoint: "",
            tag: CorrelationTag::new(0),
            item_count: DEFAULT_ITEM_COUNT,
            reset_item_on_not_found: true,
            max_logged_headers: DEFAULT_MAX_LOGGED_HEADERS,
        }
    }

    /// Sets the request cadence in milliseconds.
    #[must_use]
    pub const fn send_period(mut self, milliseconds: u32) -> Self {
        self.send_period_ms = milliseconds;
        self
    }

    /// Sets the dead-time budget in milliseconds.
    #[must_use]
    pub const fn dead_time(mut self, milliseconds: u32) -> Self {
        self.dead_time_ms = milliseconds;
        self
    }

    /// Sets the per-request timeout in milliseconds.
    #[must_use]
    pub const fn request_timeout(mut self, milliseconds: u32) -> Self {
        self.request_timeout_ms = milliseconds;
        self
    }

    /// Sets the resource base URI the rotating item index is appended to.
    #[must_use]
    pub const fn resource_base(mut self, base: &'static str) -> Self {
        self.resource_base = base;
        self
    }

    /// Sets the channel endpoint selector. Empty for HTTP channels.
    #[must_use]
    pub const fn endpoint(mut self, endpoint: &'static str) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Sets the correlation tag the channel is opened with.
    #[must_use]
    pub const fn correlation_tag(mut self, tag: CorrelationTag) -> Self {
        self.tag = tag;
        self
    }

    /// Sets the width of the resource rotation (`1..=count`).
    #[must_use]
    pub const fn item_count(mut self, count: u32) -> Self {
        self.item_count = count;
        self
    }

    /// Sets whether a 404 response restarts the rotation at item 1.
    #[must_use]
    pub const fn reset_item_on_not_found(mut self, reset: bool) -> Self {
        self.reset_item_on_not_found = reset;
        self
    }

    /// Sets the upper bound on headers logged per response.
    #[must_use]
    pub const fn max_logged_headers(mut self, count: u32) -> Self {
        self.max_logged_headers = count;
        self
    }

    /// The configured dead-time budget in milliseconds.
    #[must_use]
    pub const fn dead_time_ms(&self) -> u32 {
        self.dead_time_ms
    }

    /// The configured request cadence in milliseconds.
    #[must_use]
    pub const fn send_period_ms(&self) -> u32 {
        self.send_period_ms
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let config = SessionConfig::new();
        assert_eq!(config.send_period_ms, 30_000);
        assert_eq!(config.dead_time_ms, 15_000);
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.item_count, 9);
        assert!(config.reset_item_on_not_found);
    }

    #[test]
    fn builder_overrides() {
        let config = SessionConfig::new()
            .send_period(1_000)
            .dead_time(500)
            .item_count(3)
            .reset_item_on_not_found(false);

        assert_eq!(config.send_period_ms(), 1_000);
        assert_eq!(config.dead_time_ms(), 500);
        assert_eq!(config.item_count, 3);
        assert!(!config.reset_item_on_not_found);
    }
}
