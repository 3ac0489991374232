//! The internals of timm-core.

pub mod status_table;
