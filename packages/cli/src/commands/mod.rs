pub mod export;
pub mod fragments;
pub mod init;
pub mod profiles;

pub use export::{export, ExportArgs};
pub use fragments::{fragments, FragmentsCommand};
pub use init::{init, InitArgs};
pub use profiles::profiles;
