//! core::catalog::schema
//!
//! TOML schema for catalog files.
//!
//! # Example
//!
//! ```toml
//! [[types]]
//! name = "Order"
//! implements = ["Entity"]
//! accessors = true
//! fields = [
//!     { name = "id", type = "uuid" },
//!     { name = "lines", type = "Lines" },
//! ]
//!
//! [[types]]
//! name = "Lines"
//! kind = "list"
//! element = "OrderLine"
//!
//! [[types]]
//! name = "Status"
//! kind = "enum"
//! variants = ["New", "Paid"]
//! ```

use serde::{Deserialize, Serialize};

use super::TypeCatalogBuilder;

/// Kind of a declared type. Defaults to `record`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KindName {
    #[default]
    Record,
    List,
    Enum,
    Interface,
}

/// A field entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// An accessor method entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MethodEntry {
    pub method: String,
    pub field: String,
}

/// One declared type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TypeEntry {
    pub name: String,
    pub kind: KindName,
    /// Supertypes (records and interfaces)
    pub implements: Vec<String>,
    /// Record fields
    pub fields: Vec<FieldEntry>,
    /// Explicit getters
    pub getters: Vec<MethodEntry>,
    /// Explicit setters
    pub setters: Vec<MethodEntry>,
    /// Generate `get_<field>` / `set_<field>` for every field
    pub accessors: bool,
    /// List element type
    pub element: Option<String>,
    /// Enum variants
    pub variants: Vec<String>,
}

/// A whole catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogFile {
    pub types: Vec<TypeEntry>,
}

impl CatalogFile {
    /// Convert the parsed file into a catalog builder.
    ///
    /// A list entry without `element` is passed through with an empty element
    /// name, which `build()` rejects as an invalid type name.
    pub fn into_builder(self) -> TypeCatalogBuilder {
        self.types
            .into_iter()
            .fold(TypeCatalogBuilder::default(), |builder, entry| match entry.kind {
                KindName::List => builder.list(entry.name, entry.element.unwrap_or_default()),
                KindName::Enum => builder.enumeration(entry.name, entry.variants),
                KindName::Interface => builder.interface(entry.name, entry.implements),
                KindName::Record => builder.record(entry.name, |mut r| {
                    for f in entry.fields {
                        r = r.field(f.name, f.ty);
                    }
                    for g in entry.getters {
                        r = r.getter(g.method, g.field);
                    }
                    for s in entry.setters {
                        r = r.setter(s.method, s.field);
                    }
                    for sup in entry.implements {
                        r = r.implements(sup);
                    }
                    if entry.accessors {
                        r = r.accessors();
                    }
                    r
                }),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CatalogError, Reflector, TypeKind};
    use crate::core::types::TypeKey;

    const SHOP: &str = r#"
[[types]]
name = "Entity"
kind = "interface"

[[types]]
name = "Order"
implements = ["Entity"]
accessors = true
fields = [
    { name = "id", type = "uuid" },
    { name = "lines", type = "Lines" },
    { name = "status", type = "Status" },
]

[[types]]
name = "OrderLine"
fields = [{ name = "sku", type = "string" }]
getters = [{ method = "sku", field = "sku" }]

[[types]]
name = "Lines"
kind = "list"
element = "OrderLine"

[[types]]
name = "Status"
kind = "enum"
variants = ["New", "Paid"]
"#;

    #[test]
    fn parses_and_builds() {
        let file: CatalogFile = toml::from_str(SHOP).unwrap();
        let catalog = file.into_builder().build().unwrap();

        let order = TypeKey::new("Order").unwrap();
        let desc = catalog.describe(&order).unwrap();
        assert_eq!(desc.kind, TypeKind::Record);
        assert_eq!(desc.fields.len(), 3);
        assert!(catalog.method(&order, "set_lines").is_some());
        assert!(catalog.is_assignable(&order, &TypeKey::new("Entity").unwrap()));

        let lines = catalog.describe(&TypeKey::new("Lines").unwrap()).unwrap();
        assert!(matches!(&lines.kind, TypeKind::List { element } if element.as_str() == "OrderLine"));

        let line = TypeKey::new("OrderLine").unwrap();
        assert!(catalog.method(&line, "sku").is_some());
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<CatalogFile, _> = toml::from_str(
            r#"
[[types]]
name = "A"
colour = "blue"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn list_without_element_fails_build() {
        let file: CatalogFile = toml::from_str(
            r#"
[[types]]
name = "Xs"
kind = "list"
"#,
        )
        .unwrap();
        assert!(matches!(
            file.into_builder().build(),
            Err(CatalogError::InvalidName(_))
        ));
    }
}
