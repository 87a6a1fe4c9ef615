pub mod dispersion;
