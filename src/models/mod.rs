// src/models/mod.rs

pub mod company;
pub mod employee;
pub mod session;
pub mod user;
