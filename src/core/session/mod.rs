pub mod session;
pub mod session_params;
pub mod state;
pub mod tile_manager;
pub mod work_queue;

pub use session::*;
pub use session_params::*;
pub use state::*;
pub use tile_manager::*;
pub use work_queue::*;
