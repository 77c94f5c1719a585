// Library exports for the hashem operator tool
// This allows testing of internal modules

pub mod commands;
pub mod desk;
