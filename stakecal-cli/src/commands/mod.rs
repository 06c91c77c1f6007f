pub mod appointments;
pub mod balance;
pub mod calendar;
pub mod config;
pub mod login;
pub mod schedule;
pub mod settle;
pub mod view;
pub mod withdraw;
