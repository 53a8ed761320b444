mod fixtures;

mod factory;
mod member_resolution;
mod properties;
mod supertypes;
