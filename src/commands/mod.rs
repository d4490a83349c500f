pub mod align;
pub mod trim;
