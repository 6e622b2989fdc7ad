//! Declarative configuration resolution: conditional attributes and
//! elements, owner references, condition expressions and tile selectors,
//! read from parsed XML with every element and attribute validated.

pub mod checker;
pub mod common;
pub mod condition;
pub mod conditional;
pub mod context;
pub mod errors;
pub mod owner;
pub mod traits;
pub mod variant_set;
pub mod xml_conv;

pub use checker::Checker;
pub use common::{IntSetAttrs, Lookup};
pub use condition::evaluate_condition;
pub use conditional::{
    get_attribute_value, get_bool_attribute, get_enum_attribute_value, parse_unique_element,
    visit_element_children, visit_layout_config_named_attributes, visit_named_element_children,
};
pub use context::ParseContext;
pub use owner::{
    parse_owner, parse_owner_exists, parse_owner_type, parse_team_exists, OwnerExists, OwnerRef,
};
pub use traits::{parse_tile, parse_tile_selector_and, parse_tile_selector_or};
pub use variant_set::parse_variant_set;
