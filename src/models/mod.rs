pub mod heat;
pub mod template;
pub mod tls;
