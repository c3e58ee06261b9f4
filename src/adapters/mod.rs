//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements   | Connects to                     |
//! |----------------|--------------|---------------------------------|
//! | `hardware`     | SensorPort   | Linux GPIO (sysfs / gpioget)    |
//! | `tank_http`    | TankPort     | Tank controller status page     |
//! | `csv_log`      | EventSink    | Append-only CSV file            |
//! | `log_sink`     | EventSink    | `log` output                    |
//! | `time`         | TimePort     | System wall clock               |
//! | `config_file`  | ConfigPort   | JSON config file                |
//! | `status_file`  | (none)       | JSON snapshot for dashboards    |

pub mod config_file;
pub mod csv_log;
pub mod hardware;
pub mod log_sink;
pub mod status_file;
pub mod tank_http;
pub mod time;
