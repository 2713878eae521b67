pub mod comercial_service;
pub mod funil_service;

pub use comercial_service::ComercialService;
pub use funil_service::FunilService;
