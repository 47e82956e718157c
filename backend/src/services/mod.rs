pub mod gate;
pub mod locations;
pub mod profiles;
pub mod proximity;
pub mod social;
