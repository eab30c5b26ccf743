mod pending;
mod service;
