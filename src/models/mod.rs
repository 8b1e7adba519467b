pub mod club;
pub mod member;
pub mod payment_method;
pub mod user;

pub use club::*;
pub use member::*;
pub use payment_method::*;
pub use user::*;
