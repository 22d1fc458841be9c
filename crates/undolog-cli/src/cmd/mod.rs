pub mod config;
pub mod group;
pub mod init;
pub mod replay;
pub mod subject;
pub mod team;
pub mod user;
