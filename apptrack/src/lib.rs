#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod cli;
pub use cli::{Cli, Commands, FilterArgs, ImportModeArg, OrderArg, OwnerArg, ScopeArgs, ViewArgs};

mod config;
pub use config::{AppConfig, ListingConfig};

mod run;
pub use run::{AddInput, run};
