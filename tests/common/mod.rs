#![allow(dead_code)]

pub mod fixtures;
pub mod http_server;
pub mod services;
