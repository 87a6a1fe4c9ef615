pub mod enrich;
pub mod events;
pub mod geo;
pub mod io;
pub mod metrics;
pub mod plot;
pub mod signal;

pub use enrich::*;
pub use events::*;
pub use metrics::*;
pub use signal::*;
