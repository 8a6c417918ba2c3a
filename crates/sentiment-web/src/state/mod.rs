pub mod app_state;
pub mod controller;
pub mod event_bus;
pub mod model_loader;
pub mod store;

pub use app_state::*;
pub use controller::*;
pub use event_bus::*;
pub use model_loader::*;
pub use store::*;
