//! Fleet orchestration for Bedrock and Java game servers.
//!
//! [`FleetManager`] owns the set of [`ServerInstance`]s, their ports and the
//! manifest. Each instance drives one server process through install,
//! start, stop, update, backup and content changes.

mod config_store;
mod content_import;
mod error;
mod fleet_manager;
mod fleet_settings;
mod fs_util;
mod instance_layout;
mod lan_beacon;
mod launch_command;
mod line_reassembler;
mod manifest_entry;
mod manifest_file;
mod new_server_options;
mod port_allocator;
mod port_reservation;
mod process_supervisor;
mod server_instance;
mod setting;

pub mod edition;
pub mod toolchain;

#[cfg(test)]
mod tests;

pub use config_store::ConfigStore;
pub use content_import::{
    FALLBACK_CONTENT_NAME, MAX_CONTENT_NAME_LEN, has_world_extension, sanitize_content_name,
    validate_content_name,
};
pub use edition::{BedrockEdition, EditionProfile, EditionRuntime, JavaEdition};
pub use error::{ProcessError, ProcessResult};
pub use fleet_manager::FleetManager;
pub use fleet_settings::FleetSettings;
pub use instance_layout::InstanceLayout;
pub use lan_beacon::LanBeacon;
pub use launch_command::LaunchCommand;
pub use line_reassembler::LineReassembler;
pub use manifest_entry::ManifestEntry;
pub use manifest_file::{MANIFEST_FILENAME, ManifestFile};
pub use new_server_options::NewServerOptions;
pub use port_allocator::PortAllocator;
pub use port_reservation::PortReservation;
pub use process_supervisor::{ExitNotice, ProcessSupervisor};
pub use server_instance::ServerInstance;
pub use setting::Setting;
