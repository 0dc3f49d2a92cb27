//! HTTP request handlers

pub mod health;
pub mod largefile;
pub mod mock;
