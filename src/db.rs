pub mod comercial_repo;
pub use comercial_repo::{ComercialRepository, FunilStore};
