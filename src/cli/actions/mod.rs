pub mod server;

/// Actions the binary can execute after argument parsing.
pub enum Action {
    Server(server::Args),
}
