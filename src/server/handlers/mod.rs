pub mod geography;
pub mod health;
pub mod records;
