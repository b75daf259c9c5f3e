pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        base_url: String,
        session_ttl: i64,
        remember_ttl: i64,
    },
}
