pub mod cookie;
pub mod response;
pub mod upload;

pub use cookie::*;
pub use response::*;
pub use upload::*;
