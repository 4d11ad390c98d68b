pub mod health;
pub mod rankings;
