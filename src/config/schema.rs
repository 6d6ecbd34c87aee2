use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "organization": { "type": "string" },
            "base_url": { "type": "string", "format": "uri" },
            "poll_interval_secs": { "type": "integer", "minimum": 1 },
            "refresh_interval_secs": { "type": "integer", "minimum": 1 },
            "max_inline_recommendations": { "type": "integer", "minimum": 1 },
            "max_consecutive_poll_errors": { "type": "integer", "minimum": 0 },
            "poll_timeout_secs": { "type": "integer", "minimum": 0 },
            "notification_ttl_secs": { "type": "integer", "minimum": 1 }
        }
    })
});
