//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                 |
//! |----------------|--------------------|-----------------------------|
//! | `config_store` | ConfigPort         | JSON file / postcard blob   |
//! | `inbox`        | (none)             | Local notification list     |
//! | `log_sink`     | EventSink          | `log` facade                |
//! | `memory_store` | RealtimeStore      | In-process JSON tree        |
//! | `push`         | NotificationPort   | Log output + local inbox    |
//! | `time`         | TimePort           | Host clock / pinned clock   |

pub mod config_store;
pub mod inbox;
pub mod log_sink;
pub mod memory_store;
pub mod push;
pub mod time;
