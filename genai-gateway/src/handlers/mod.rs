//! HTTP handlers for the generation gateway.

pub mod docs;
pub mod fallback;
pub mod generate;
pub mod health;
pub mod metrics;

pub use docs::index;
pub use fallback::{method_not_allowed, not_found};
pub use generate::{generate_image, generate_text};
pub use health::health_check;
pub use metrics::metrics;
