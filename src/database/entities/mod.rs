pub mod blocks;
pub mod districts;
pub mod divisions;
pub mod grampanchayats;
pub mod vle_details;
