pub mod chapters;
pub mod images;
pub mod init;
