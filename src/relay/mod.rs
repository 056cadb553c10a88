mod http;
mod server;

pub use server::RelayServer;
