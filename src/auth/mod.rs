pub mod extractor;
pub mod jwt;
pub mod supabase;
