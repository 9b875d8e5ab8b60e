pub mod buffer;
pub mod dynamic_list;
pub mod list;
pub mod packed_bool_list;
pub mod sequence;
pub mod small_list;
pub mod storage;
