//! # Labelgate - Label Template Print Console
//!
//! Labelgate drives a label gateway that prints parameterized templates on
//! networked label printers. It provides:
//!
//! - **Variable state**: per-template values seeded from defaults, tracked
//!   edits, and overrides remembered between sessions
//! - **Rapid entry**: one input mirrored into a chosen primary variable
//! - **Printer media**: size presets, color and type catalogs, and media updates
//! - **Gateway client**: template, printer, and print endpoints over HTTP
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelgate::{Config, Console, HttpApi, store::{FileStore, OverrideStore}};
//!
//! # async fn demo() -> Result<(), labelgate::LabelgateError> {
//! let config = Config::default();
//! let api = HttpApi::new(&config.api_base)?;
//! let store = OverrideStore::new(FileStore::open(&config.state_file));
//! let mut console = Console::new(config.catalog(), store);
//!
//! console.refresh_printers(&api).await?;
//! console.load_template(&api, "shelf-label").await?;
//! if let Some(session) = console.session_mut() {
//!     session.mirror_edit("SKU-1042");
//! }
//!
//! let outcome = console.print(&api).await?;
//! println!("{}", outcome.receipt);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`variables`] | Default resolution and the per-template variable session |
//! | [`store`] | Key-value persistence of overrides, settings, and printer choice |
//! | [`template`] | Template records and list filtering |
//! | [`printer`] | Printer records and media updates |
//! | [`catalog`] | Label size presets, colors, and types |
//! | [`print`] | Print request and receipt |
//! | [`api`] | Label gateway client |
//! | [`console`] | Selection state tying the above together |
//! | [`config`] | Startup settings |
//! | [`error`] | Error types |

pub mod api;
pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod print;
pub mod printer;
pub mod store;
pub mod template;
pub mod variables;

// Re-exports for convenience
pub use api::{HttpApi, LabelApi};
pub use catalog::PresetCatalog;
pub use config::Config;
pub use console::Console;
pub use error::LabelgateError;
pub use store::OverrideStore;
pub use variables::VariableSession;
