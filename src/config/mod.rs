//! Layered settings
//!
//! Settings are resolved from packaged defaults, the user settings file,
//! runtime system facts and command-line flags, in that order of precedence
//! (later wins). Tables are merged key by key; anything else is replaced.

pub mod args;
pub mod error;
pub mod loader;
pub mod merge;
pub mod overrides;
pub mod paths;
pub mod resolved;
pub mod resolver;
pub mod settings;
pub mod view;
pub mod writeback;

pub use args::{parse_known_args, ParsedArgs, SettingsArgs};
pub use error::{Result, SettingsError};
pub use loader::{load, read_optional, ConfigSource, SourceLocation, SourceOrigin, SourceRecord};
pub use merge::{fill_missing, merge, merge_layers, RawConfig};
pub use overrides::CliOverrides;
pub use resolved::{ResolvedSettings, VERSION_EXIT_CODE};
pub use resolver::{resolve_sources, Resolver, PACKAGED_DEFAULTS};
pub use settings::{LogLevel, LoggerSettings, Settings, SystemSettings};
pub use view::SettingsView;
pub use writeback::{packaged_defaults, write_missing_defaults};
