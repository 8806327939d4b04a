//! # Folio HTML Export
//!
//! Turns article HTML into a fully inlined variant that survives a
//! restrictive third-party renderer.
//!
//! ## Pipeline
//!
//! ```text
//! document HTML
//!     ↓ retag_containers     div[style|class] → section, margin prefix
//!     ↓ rewrite_code_blocks  pre → themed pre > reset code
//!     ↓ inline_styles        box model + tag default + own style (rem → px)
//!     ↓ strip_classes        no class attributes survive
//!     ↓ wrap_shell           font stack + background
//! platform HTML
//! ```
//!
//! Step order matters: later steps assume earlier ones ran. The transform is
//! total; malformed input is repaired by the HTML parser.

mod compiler;
pub mod profile;


pub use compiler::{
    export, inline_styles, retag_containers, rewrite_code_blocks, strip_classes, wrap_shell,
    CONTAINER_TAG, FORCED_BOX_MODEL, RETAG_PREFIX,
};
pub use profile::{BackgroundCatalog, BackgroundDescriptor, CodeTheme, PlatformProfile};
