pub mod inmemory_repo;
pub mod scan;
