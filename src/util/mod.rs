pub mod fs;
pub mod ident;
