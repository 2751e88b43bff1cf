/// Element tree and serializer.
pub mod document;
