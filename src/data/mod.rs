pub mod index;
pub mod record;
pub mod registry;
pub mod table;
pub mod validate;
