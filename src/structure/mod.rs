pub mod id;
pub mod id_generator;
pub mod index;
pub mod schema;
pub mod accessor;
pub mod indexes_factory;
pub mod structure;
pub mod serializer;
pub mod builder;
