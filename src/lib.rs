pub mod error;
pub mod record;
pub mod sink;
pub mod stacktrace;
pub mod logger;

pub mod env;
pub mod config;
pub mod schema;
pub mod transport;
pub mod middleware;

pub mod facade;
pub mod console;
pub mod layer;
pub mod init;
pub mod noop_sink;

pub use error::{ContractError, DeliveryError};
pub use facade::{use_fallback, Logger};
pub use logger::{ApiLogger, LogArgs};
pub use middleware::ApiLogMiddleware;
#[cfg(feature = "http")]
pub use middleware::use_api_logger;
pub use record::{ApiLog, Metadata, MetadataValue};
pub use sink::{Done, LogSink, LogType, LoggerMiddleware};
