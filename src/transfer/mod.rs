//! Cross-account import and export.
//!
//! - `PortableBundle`: the plaintext bundle format (`bundle`)
//! - `export` / `import`: vault <-> bundle transfers (`service`)

pub mod bundle;
pub mod service;

pub use bundle::PortableBundle;
pub use service::{export, export_to, import, ImportSummary};
