pub mod ephemeris;
pub mod weather;
