pub mod db;
pub mod local {
    pub mod file_storage;
}
pub mod remote {
    pub mod entity;
    pub mod memory;
    pub mod postgres;
}
