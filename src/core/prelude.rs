pub use crate::core::base::*;
pub use crate::core::error::*;
pub use crate::core::geometry::*;
pub use crate::core::spectrum::*;
