pub mod address;
pub mod builders;
pub mod catalog;
pub mod error;
pub mod host;
pub mod midi;
pub mod midi_io;
pub mod model;
pub mod nrpn;
pub mod store;
pub mod sync;
pub mod sysex;
mod util;

pub use catalog::ParameterCatalog;
pub use sync::SyncController;
