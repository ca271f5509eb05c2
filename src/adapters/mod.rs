//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements       | Connects to                 |
//! |----------------|------------------|-----------------------------|
//! | `config_file`  | ConfigPort       | JSON file on disk           |
//! | `indicators`   | IndicatorPort    | PWM animator thread         |
//! | `log_display`  | DisplayPort      | Log output                  |
//! | `serial`       | TelegramPort     | UART (`serialport`) or log  |
//! | `sim`          | TemperaturePort  | Simulated room              |
//! |                | SetDutyCycle     | Simulated PWM pin           |
//! | `time`         | ClockPort        | Host local time (`chrono`)  |

pub mod config_file;
pub mod indicators;
pub mod log_display;
pub mod serial;
pub mod sim;
pub mod time;
