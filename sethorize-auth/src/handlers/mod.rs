pub mod authorize;
pub mod client;
pub mod login;
pub mod logout;
pub mod password;
pub mod register;
pub mod session;
pub mod token;

pub use authorize::authorize;
pub use client::client;
pub use login::login;
pub use logout::logout;
pub use password::change_password;
pub use register::register;
pub use session::session;
pub use token::token;
