#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Reactions;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;
