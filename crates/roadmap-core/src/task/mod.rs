//! Task service: nested add, delete, edit, status and comment operations.

mod service;
