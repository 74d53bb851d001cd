pub mod expiry_service;
