mod connection;
mod remote_mailbox;
mod script;
mod session;
mod tag_generator;

pub use connection::ShellConnection;
pub use session::ExchangeOnline;
