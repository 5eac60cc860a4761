pub mod backup;
pub mod collect;
pub mod health;
