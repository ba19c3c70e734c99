pub mod field;
pub mod form;
pub mod site;

pub use field::FieldSpec;
pub use form::{FormKind, FormSpec};
pub use site::{
    ChefSpec, ConfigError, CounterSpec, ImageSpec, MenuItemSpec, SectionSpec, SiteConfig,
    TestimonialSpec, Timings,
};
