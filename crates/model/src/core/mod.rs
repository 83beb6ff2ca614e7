pub mod semantic_type;
pub mod value;
