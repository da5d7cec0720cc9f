pub mod bmp;
pub mod coe;
