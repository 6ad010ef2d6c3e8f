pub mod generate;
pub mod send_report;
pub mod server;
