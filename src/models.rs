pub mod comercial;
pub mod funil;
