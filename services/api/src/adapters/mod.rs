pub mod db;
pub mod hasher;

pub use db::DbAdapter;
pub use hasher::Argon2Hasher;
