//! # Folio Style
//!
//! Presentation state for runs and containers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ style_map: "k: v; k: v" ⇄ StyleMap          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ merge: StyleMap + StyleUpdates → outcome    │
//! │  - set / clear properties                   │
//! │  - highlight companion cleanup              │
//! │  - alignment and font-size helpers          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **StyleMap is source of truth**: the `style` string is a derived view
//! 2. **Keys are normalized**: `"Color "` and `"color"` are the same property
//! 3. **Order is meaningful**: serialization follows insertion order

pub mod length;
pub mod merge;
pub mod style_map;

pub use length::{format_px, parse_px, rem_to_px, REM_PX};
pub use merge::{
    alignment_updates, apply_run_style, apply_style_updates, font_size_updates,
    is_clear_sentinel, Alignment, FontSizeStep, MergeOutcome, StyleUpdates,
};
pub use style_map::{normalize_key, StyleMap};
