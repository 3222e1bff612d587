pub mod assets;
pub mod init;
pub mod values;
